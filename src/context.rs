mod template;
mod view;

use crate::{
    engine::Engine,
    filter::Filters,
    forms::Forms,
    issues::{IssueKind, Issues},
    log::Error,
    pagination::Pagination,
    render::Renderer,
    Store,
};
use serde::Serialize;
use serde_json::{to_value, Value};
use std::{collections::HashMap, path::PathBuf};
use tracing::{debug, info};

/// The inputs of one request that a [`Context`] reads.
///
/// # Examples
///
/// ```
/// use tempus::Request;
///
/// let request = Request::new()
///     .with_param("page", "2")
///     .with_route("blog", "index");
///
/// assert_eq!(request.param("page"), Some("2"));
/// assert_eq!(request.controller(), "blog");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Request {
    params: HashMap<String, String>,
    token: Option<String>,
    controller: String,
    method: String,
}

impl Request {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the query parameter `name`.
    pub fn with_param<K, V>(mut self, name: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.params.insert(name.into(), value.into());

        self
    }

    /// Set the form token exposed to templates as `{TOKEN}`.
    pub fn with_token<T>(mut self, token: T) -> Self
    where
        T: Into<String>,
    {
        self.token = Some(token.into());

        self
    }

    /// Set the names of the controller and method handling the request.
    pub fn with_route<C, M>(mut self, controller: C, method: M) -> Self
    where
        C: Into<String>,
        M: Into<String>,
    {
        self.controller = controller.into();
        self.method = method.into();

        self
    }

    #[inline]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    #[inline]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[inline]
    pub fn controller(&self) -> &str {
        &self.controller
    }

    #[inline]
    pub fn method(&self) -> &str {
        &self.method
    }
}

/// The rendering state of one request.
///
/// A `Context` owns the components, filters, option selections, pagination and
/// issues of a request, along with the page content collected so far. It is
/// created by [`Engine::context`] and dropped when the request ends.
///
/// # Examples
///
/// ```
/// use tempus::{data::json, Engine, Request};
///
/// let engine = Engine::default();
/// let mut context = engine.context(Request::new());
/// context.set("TITLE", "Posts");
///
/// let output = context
///     .parse(
///         "<h1>{TITLE}</h1>{LOOP}<p>{BODY}</p>{/LOOP}",
///         Some(&json!([{"BODY": "one"}, {"BODY": "two"}])),
///     )
///     .unwrap();
///
/// assert_eq!(output, "<h1>Posts</h1><p>one</p><p>two</p>");
/// ```
pub struct Context<'engine> {
    engine: &'engine Engine,
    request: Request,
    components: Store,
    filters: Filters,
    forms: Forms,
    pagination: Pagination,
    issues: Issues,
    /// Output of the views added so far, exposed to the shell as `{CONTENT}`.
    content: String,
    /// Path of the selected template shell.
    template: Option<PathBuf>,
    index: bool,
    follow: bool,
}

impl<'engine> Context<'engine> {
    /// Create a new [`Context`] for `request`, with the baseline components
    /// `TITLE`, `PAGE_DESCRIPTION`, `TOKEN`, `BASE` and `ROBOT` set.
    pub fn new(engine: &'engine Engine, request: Request) -> Self {
        let settings = engine.settings();
        let pagination = Pagination::new(
            settings.pagination,
            request.param("page"),
            request.param("results"),
        );
        let components = Store::new()
            .with("TITLE", "")
            .with("PAGE_DESCRIPTION", "")
            .with("TOKEN", request.token().unwrap_or_default())
            .with("BASE", settings.base_url.as_str());

        let mut context = Self {
            engine,
            request,
            components,
            filters: Filters::new(),
            forms: Forms::new(),
            pagination,
            issues: Issues::new(),
            content: String::new(),
            template: None,
            index: true,
            follow: true,
        };
        context.build_robot();

        context
    }

    #[inline]
    pub fn engine(&self) -> &'engine Engine {
        self.engine
    }

    #[inline]
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Set the component `name` to `value`.
    ///
    /// Returns false and logs when `name` is invalid.
    #[inline]
    pub fn set<S, T>(&mut self, name: S, value: T) -> bool
    where
        S: Into<String>,
        T: Serialize,
    {
        self.components.set(name, value)
    }

    #[inline]
    pub fn components(&self) -> &Store {
        &self.components
    }

    #[inline]
    pub fn components_mut(&mut self) -> &mut Store {
        &mut self.components
    }

    #[inline]
    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    #[inline]
    pub fn filters_mut(&mut self) -> &mut Filters {
        &mut self.filters
    }

    #[inline]
    pub fn forms(&self) -> &Forms {
        &self.forms
    }

    /// Mark `<option value='value'>` as selected in `<select>` markup that
    /// carries an `{OPTION=...}` marker.
    #[inline]
    pub fn select_option(&mut self, value: &str) -> bool {
        self.forms.select_option(value)
    }

    /// Check one of a true/false radio pair.
    ///
    /// Sets `{name_T}` to `checked="checked"` and `{name_F}` to an empty string
    /// when `checked` is true, and the reverse otherwise.
    pub fn select_true_false(&mut self, name: &str, checked: bool) -> bool {
        let (on, off) = if checked { ("T", "F") } else { ("F", "T") };

        self.components
            .set(format!("{name}_{on}"), "checked=\"checked\"")
            && self.components.set(format!("{name}_{off}"), "")
    }

    #[inline]
    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    #[inline]
    pub fn pagination_mut(&mut self) -> &mut Pagination {
        &mut self.pagination
    }

    #[inline]
    pub fn issues(&self) -> &Issues {
        &self.issues
    }

    /// Add `messages` to the issue list for `kind`, parsing each one first
    /// when `parse` is true.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when parsing a message fails.
    pub fn add_issue<I, S>(&mut self, kind: IssueKind, messages: I, parse: bool) -> Result<(), Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for message in messages {
            let mut message = message.into();
            if parse {
                message = self.parse(&message, None)?;
            }
            debug!("adding {kind} issue");
            self.issues.push(kind, message);
        }

        Ok(())
    }

    /// Return the page content collected so far.
    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Mark the page as excluded from search indexes, or not.
    pub fn no_index(&mut self, enabled: bool) {
        self.index = !enabled;
        self.build_robot();
    }

    /// Ask search engines not to follow the links of the page, or not.
    pub fn no_follow(&mut self, enabled: bool) {
        self.follow = !enabled;
        self.build_robot();
    }

    /// Rebuild the `ROBOT` meta tag component.
    fn build_robot(&mut self) {
        let content = match (self.index, self.follow) {
            (false, false) => Some("noindex,nofollow"),
            (false, true) => Some("noindex"),
            (true, false) => Some("nofollow"),
            (true, true) => None,
        };
        let robot = content
            .map(|content| format!("<meta name=\"robots\" content=\"{content}\">"))
            .unwrap_or_default();

        self.components.set("ROBOT", robot);
    }

    /// Return a [`Renderer`] over the current state of this `Context`.
    pub fn renderer(&self) -> Renderer<'_> {
        Renderer::new(&self.components, &self.forms, &self.filters)
            .with_dates(self.engine.settings().dates.as_ref())
    }

    /// Resolve every tag of `template`, expanding its `{LOOP}` block against
    /// `data`.
    ///
    /// A template that mentions `{PAGINATION}` has the page list built first.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the page list is needed and the `pagination`
    /// view cannot be read.
    pub fn parse(&mut self, template: &str, data: Option<&Value>) -> Result<String, Error> {
        if template.contains("{PAGINATION}") {
            self.paginate()?;
        }

        Ok(self.renderer().render(template, data))
    }

    /// Build the `PAGINATION` component from the current page range.
    ///
    /// Without more than one page the component is `<lb>`.
    fn paginate(&mut self) -> Result<(), Error> {
        let links = match self.pagination.total_pages() {
            Some(total) if total > 1 => self.pagination.links(),
            _ => None,
        };
        let Some(links) = links else {
            info!("pagination: single page, skipping page list");
            self.components.set("PAGINATION", "<lb>");
            return Ok(());
        };

        let data = to_value(&links).map_err(|e| {
            Error::build("page list cannot be serialized").with_help(e.to_string())
        })?;
        let text = self.read_view("pagination")?;
        let list = self.renderer().render(&text, Some(&data));
        self.components.set("PAGINATION", list);

        Ok(())
    }
}
