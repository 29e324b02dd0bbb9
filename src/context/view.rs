use super::Context;
use crate::log::{error_io, error_not_found, error_pattern, Error, NotFoundContext};
use regex::{Regex, RegexBuilder};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

impl Context<'_> {
    /// Read the view `name` and parse it with the optional `data`.
    ///
    /// The name is normalized before lookup: its first character is lowercased,
    /// `.`, `\` and `/` all separate directories, and the configured view
    /// extension is appended. `admin.users` becomes `admin/users.html`.
    ///
    /// The primary view directory is tried first. When the file is missing
    /// there and the first segment of the name is a registered view location,
    /// the rest of the name is tried inside that location.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound(StandardView)` [`Error`] carrying the last path tried
    /// when no file exists, or an `Io` error when it cannot be read.
    pub fn standard_view(&mut self, name: &str, data: Option<&Value>) -> Result<String, Error> {
        let text = self.read_view(name)?;

        self.parse(&text, data)
    }

    /// Parse the view `name` with the optional `data` and append it to the page
    /// content.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound(View)` [`Error`] when the view renders to an empty
    /// string, in addition to the errors of
    /// [`standard_view`][`Context::standard_view`].
    pub fn view(&mut self, name: &str, data: Option<&Value>) -> Result<(), Error> {
        let output = self.standard_view(name, data)?;
        if output.is_empty() {
            return Err(error_not_found(NotFoundContext::View, Path::new(name)));
        }
        self.content.push_str(&output);

        Ok(())
    }

    /// Render the menu view `menu` with the entry linking to `select` marked as
    /// active.
    ///
    /// `select` is a path below the base URL and defaults to
    /// `controller/method` of the request. When no entry links to it, the entry
    /// linking to its first segment is marked instead. The marked menu is
    /// returned, and also appended to the page content if `add_to_content`.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the menu view cannot be read.
    pub fn active_page_select(
        &mut self,
        menu: &str,
        select: Option<&str>,
        add_to_content: bool,
    ) -> Result<String, Error> {
        let select = match select {
            Some(select) => select.to_string(),
            None => format!("{}/{}", self.request.controller(), self.request.method()),
        };
        let view = self.standard_view(menu, None)?;
        let base = self.engine.settings().base_url.as_str();

        let mut pattern = active_pattern(&format!("{base}{select}"))?;
        if !pattern.is_match(&view) {
            let section = select.split('/').next().unwrap_or_default();
            debug!("no menu entry for {select}, trying {section}");
            pattern = active_pattern(&format!("{base}{section}"))?;
        }
        let marked = pattern
            .replace_all(
                &view,
                r#"<li${1} class="active"><a${2}href="${3}"${4}>${5}</li>"#,
            )
            .into_owned();

        if add_to_content {
            self.content.push_str(&marked);
        }

        Ok(marked)
    }

    /// Read the raw text of the view `name`.
    pub(super) fn read_view(&self, name: &str) -> Result<String, Error> {
        debug!("calling standard view: {name}");
        let path = self.resolve_view(name)?;

        std::fs::read_to_string(&path).map_err(|e| error_io(&path, e))
    }

    fn resolve_view(&self, name: &str) -> Result<PathBuf, Error> {
        let settings = self.engine.settings();
        let normalized = normalize(name, &settings.view_extension);
        let segments: Vec<&str> = normalized.split('/').collect();

        let mut path: PathBuf = settings.view_directory.join(to_path(&segments));
        debug!("trying view location: {}", path.display());
        if path.is_file() {
            return Ok(path);
        }

        if let Some((key, rest)) = segments.split_first() {
            if let Some(location) = self.engine.view_location(key) {
                path = location.join(to_path(rest));
                debug!("trying view location {key}: {}", path.display());
            }
        }
        if path.is_file() {
            return Ok(path);
        }

        Err(error_not_found(NotFoundContext::StandardView, &path))
    }
}

/// Normalize a view name into a `/` separated relative path with `extension`.
fn normalize(name: &str, extension: &str) -> String {
    let mut chars = name.chars();
    let lowered: String = match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    };
    let separated = lowered.replace(['.', '\\'], "/");

    format!("{}.{extension}", separated.trim_end_matches('/'))
}

fn to_path(segments: &[&str]) -> PathBuf {
    segments.iter().collect()
}

/// Match a menu entry `<li><a href="url">` on a single line.
fn active_pattern(url: &str) -> Result<Regex, Error> {
    let source = format!(
        r#"<li(.*)><a(.*)href="({})"(.*)>(.*)</li>"#,
        regex::escape(url)
    );

    RegexBuilder::new(&source)
        .case_insensitive(true)
        .build()
        .map_err(|e| error_pattern(url, &e))
}

#[cfg(test)]
mod tests {
    use super::normalize;
    use crate::{data::json, Engine, ErrorKind, NotFoundContext, Request, Settings};
    use std::fs;
    use tempfile::TempDir;

    fn engine(dir: &TempDir) -> Engine {
        Engine::new(Settings {
            view_directory: dir.path().join("views"),
            ..Default::default()
        })
    }

    fn write(dir: &TempDir, path: &str, text: &str) {
        let path = dir.path().join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Admin.Users", "html"), "admin/Users.html");
        assert_eq!(normalize("blog\\post/", "html"), "blog/post.html");
        assert_eq!(normalize("nav", "tpl"), "nav.tpl");
    }

    #[test]
    fn test_standard_view() {
        let dir = TempDir::new().unwrap();
        write(&dir, "views/admin/users.html", "{LOOP}<li>{NAME}</li>{/LOOP}");
        let engine = engine(&dir);
        let mut context = engine.context(Request::new());

        let output = context
            .standard_view("Admin.users", Some(&json!([{"NAME": "a"}, {"NAME": "b"}])))
            .unwrap();
        assert_eq!(output, "<li>a</li><li>b</li>");
    }

    #[test]
    fn test_standard_view_location() {
        let dir = TempDir::new().unwrap();
        write(&dir, "plugins/blog/post.html", "<article>{TITLE}</article>");
        let engine = engine(&dir)
            .with_view_location("blog", dir.path().join("plugins/blog"))
            .unwrap();
        let mut context = engine.context(Request::new());
        context.set("TITLE", "Hello");

        assert_eq!(
            context.standard_view("blog.post", None).unwrap(),
            "<article>Hello</article>"
        );
    }

    #[test]
    fn test_standard_view_not_found() {
        let dir = TempDir::new().unwrap();
        let engine = engine(&dir);
        let mut context = engine.context(Request::new());
        let error = context.standard_view("missing.view", None).unwrap_err();

        assert_eq!(
            *error.kind(),
            ErrorKind::NotFound(NotFoundContext::StandardView)
        );
        assert!(error.get_name().is_some_and(|name| name.ends_with("view.html")));
    }

    #[test]
    fn test_view_appends_content() {
        let dir = TempDir::new().unwrap();
        write(&dir, "views/one.html", "one");
        write(&dir, "views/two.html", "two");
        let engine = engine(&dir);
        let mut context = engine.context(Request::new());

        context.view("one", None).unwrap();
        context.view("two", None).unwrap();
        assert_eq!(context.content(), "onetwo");
    }

    #[test]
    fn test_view_empty() {
        let dir = TempDir::new().unwrap();
        write(&dir, "views/empty.html", "");
        let engine = engine(&dir);
        let mut context = engine.context(Request::new());
        let error = context.view("empty", None).unwrap_err();

        assert_eq!(*error.kind(), ErrorKind::NotFound(NotFoundContext::View));
        assert!(context.content().is_empty());
    }

    #[test]
    fn test_pagination_view() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "views/pagination.html",
            "<ul>{LOOP}<li{ACTIVEPAGE}><a href=\"?page={PAGENUMBER}\">{LABEL}</a></li>{/LOOP}</ul>",
        );
        let engine = engine(&dir);
        let mut context = engine.context(Request::new().with_param("page", "2").with_param("results", "10"));
        context.pagination_mut().update_results(30);

        assert_eq!(
            context.parse("<nav>{PAGINATION}</nav>", None).unwrap(),
            "<nav><ul><li><a href=\"?page=1\">1</a></li>\
            <li class=\"active\"><a href=\"?page=2\">2</a></li>\
            <li><a href=\"?page=3\">Last</a></li></ul></nav>"
        );
    }

    #[test]
    fn test_active_page_select() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "views/nav.html",
            "<ul>\n<li><a href=\"{BASE}home/index\">Home</a></li>\n\
            <li><a href=\"{BASE}blog\">Blog</a></li>\n</ul>",
        );
        let engine = engine(&dir);
        let mut context = engine.context(Request::new().with_route("home", "index"));

        let marked = context.active_page_select("nav", None, false).unwrap();
        assert!(marked.contains("<li class=\"active\"><a href=\"/home/index\">Home</a></li>"));
        assert!(marked.contains("<li><a href=\"/blog\">Blog</a></li>"));
        assert!(context.content().is_empty());

        let marked = context
            .active_page_select("nav", Some("blog/archive"), true)
            .unwrap();
        assert!(marked.contains("<li class=\"active\"><a href=\"/blog\">Blog</a></li>"));
        assert_eq!(context.content(), marked);
    }
}
