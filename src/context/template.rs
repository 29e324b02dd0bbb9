use super::Context;
use crate::log::{error_config, error_io, error_not_found, error_write, Error, NotFoundContext};
use std::{
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

impl Context<'_> {
    /// Select the template shell `name` for [`render`][`Context::render`].
    ///
    /// The name is lowercased and `.` becomes `_`. The shell is
    /// `<name>/<name>.tpl` inside the template directory, or `<name>.tpl` inside
    /// one of the additional template locations, tried in order. The
    /// `<name>.inc.toml` loader next to the shell is then applied with
    /// [`load_template`][`Context::load_template`].
    ///
    /// # Errors
    ///
    /// Returns a `NotFound(Template)` [`Error`] when no shell exists, or the
    /// errors of `load_template`.
    pub fn set_template(&mut self, name: &str) -> Result<(), Error> {
        debug!("setting template: {name}");
        let name = name.replace('.', "_").to_lowercase();
        let file = format!("{name}.tpl");

        let engine = self.engine;
        let primary = engine.settings().template_directory.join(&name);
        let candidates =
            std::iter::once(primary).chain(engine.template_locations().iter().cloned());

        let mut tried = PathBuf::new();
        for directory in candidates {
            tried = directory.join(&file);
            if tried.is_file() {
                self.template = Some(tried);
                return self.load_template(&directory, &name);
            }
        }

        Err(error_not_found(NotFoundContext::Template, &tried))
    }

    /// Apply the loader `<name>.inc.toml` found in `directory`.
    ///
    /// The loader is a flat TOML table whose keys are set as components.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound(TemplateLoader)` [`Error`] when the loader does not
    /// exist, or an [`Error`] when it cannot be read or decoded.
    pub fn load_template(&mut self, directory: &Path, name: &str) -> Result<(), Error> {
        let path = directory.join(format!("{name}.inc.toml"));
        if !path.is_file() {
            return Err(error_not_found(NotFoundContext::TemplateLoader, &path));
        }

        info!("loading template loader: {}", path.display());
        let text = std::fs::read_to_string(&path).map_err(|e| error_io(&path, e))?;
        let table: toml::Table = toml::from_str(&text).map_err(|e| error_config(&path, e))?;
        for (key, value) in table {
            match value {
                toml::Value::Datetime(datetime) => {
                    debug!("loader value {key} is a datetime, storing it as text");
                    self.components.set(key, datetime.to_string())
                }
                value => self.components.set(key, value),
            };
        }

        Ok(())
    }

    /// Return the path of the selected template shell, if any.
    #[inline]
    pub fn template(&self) -> Option<&Path> {
        self.template.as_deref()
    }

    /// Write the finished page to `out`.
    ///
    /// The page content becomes the `{CONTENT}` component, the configured
    /// default shell is selected if none was, and the shell is parsed and
    /// written in a single call. Nothing is written when rendering is disabled
    /// in the [`Settings`][`crate::Settings`].
    ///
    /// Each call writes the page again, so it should be called once per
    /// request.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the shell cannot be selected or read, parsing
    /// fails, or `out` cannot be written.
    pub fn render<W>(&mut self, out: &mut W) -> Result<(), Error>
    where
        W: Write,
    {
        self.components.set("CONTENT", self.content.as_str());
        if self.template.is_none() {
            let default = self.engine.settings().default_template.clone();
            self.set_template(&default)?;
        }
        if !self.engine.settings().render_enabled {
            info!("rendering disabled, skipping output");
            return Ok(());
        }

        let Some(path) = self.template.clone() else {
            return Ok(());
        };
        let shell = std::fs::read_to_string(&path).map_err(|e| error_io(&path, e))?;
        let page = self.parse(&shell, None)?;

        out.write_all(page.as_bytes()).map_err(error_write)
    }
}
