use crate::{
    config::Settings,
    context::{Context, Request},
    log::{Error, INVALID_NAME},
    store::is_simple_name,
};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Holds the [`Settings`] and file locations shared by every request.
///
/// An `Engine` is set up once and then only read. Each request gets its own
/// [`Context`] from [`Engine::context`].
#[derive(Debug, Clone, Default)]
pub struct Engine {
    settings: Settings,
    /// Additional view directories, keyed by the view name segment that
    /// selects them.
    view_locations: HashMap<String, PathBuf>,
    /// Additional directories searched for template shells, in order.
    template_locations: Vec<PathBuf>,
}

impl Engine {
    /// Create a new [`Engine`] with the given [`Settings`].
    #[inline]
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            view_locations: HashMap::new(),
            template_locations: vec![],
        }
    }

    /// Return the [`Settings`] of this `Engine`.
    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Register `directory` as an additional view location.
    ///
    /// A view named `key.rest` that is missing from the primary view directory
    /// is looked up as `rest` inside `directory`.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when `key` is not a simple name, or a location
    /// with the same key is already registered.
    ///
    /// # Examples
    ///
    /// ```
    /// use tempus::Engine;
    ///
    /// let mut engine = Engine::default();
    /// assert!(engine.add_view_location("blog", "plugins/blog/views").is_ok());
    /// assert!(engine.add_view_location("blog", "elsewhere").is_err());
    /// ```
    pub fn add_view_location<P>(&mut self, key: &str, directory: P) -> Result<(), Error>
    where
        P: Into<PathBuf>,
    {
        if !is_simple_name(key) {
            return Err(Error::build(INVALID_NAME)
                .with_name(key)
                .with_help("view location keys may only use letters, digits, `-` and `_`"));
        }
        if self.view_locations.contains_key(key) {
            return Err(Error::build(INVALID_NAME).with_name(key).with_help(format!(
                "view location with key `{key}` already exists in engine"
            )));
        }

        let directory = directory.into();
        debug!("adding view location {key}: {}", directory.display());
        self.view_locations.insert(key.to_string(), directory);

        Ok(())
    }

    /// Register `directory` as an additional view location.
    ///
    /// Returns the [`Engine`], so additional methods may be chained.
    ///
    /// # Errors
    ///
    /// See [`Engine::add_view_location`].
    #[inline]
    pub fn with_view_location<P>(mut self, key: &str, directory: P) -> Result<Self, Error>
    where
        P: Into<PathBuf>,
    {
        self.add_view_location(key, directory)?;
        Ok(self)
    }

    /// Return the directory registered for `key`, if any.
    #[inline]
    pub fn view_location(&self, key: &str) -> Option<&Path> {
        self.view_locations.get(key).map(PathBuf::as_path)
    }

    /// Add `directory` to the additional template locations.
    ///
    /// Locations are searched in the order they were added, after the
    /// configured template directory.
    pub fn add_template_location<P>(&mut self, directory: P)
    where
        P: Into<PathBuf>,
    {
        let directory = directory.into();
        debug!("adding template location: {}", directory.display());
        self.template_locations.push(directory);
    }

    /// Add `directory` to the additional template locations.
    ///
    /// Returns the [`Engine`], so additional methods may be chained.
    #[inline]
    pub fn with_template_location<P>(mut self, directory: P) -> Self
    where
        P: Into<PathBuf>,
    {
        self.add_template_location(directory);
        self
    }

    /// Return the additional template locations.
    #[inline]
    pub fn template_locations(&self) -> &[PathBuf] {
        &self.template_locations
    }

    /// Create a new [`Context`] for `request`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tempus::{Engine, Request};
    ///
    /// let engine = Engine::default();
    /// let mut context = engine.context(Request::new().with_token("abc"));
    ///
    /// assert_eq!(context.parse("{token}", None).unwrap(), "abc");
    /// ```
    #[inline]
    pub fn context(&self, request: Request) -> Context<'_> {
        Context::new(self, request)
    }
}

#[cfg(test)]
mod tests {
    use crate::{config::Settings, engine::Engine, log::INVALID_NAME};
    use std::path::Path;

    #[test]
    fn test_add_view_location() {
        let mut engine = Engine::default();
        engine.add_view_location("blog", "plugins/blog").unwrap();

        assert_eq!(engine.view_location("blog"), Some(Path::new("plugins/blog")));
        assert!(engine.view_location("ghost").is_none())
    }

    #[test]
    fn test_add_view_location_fluent() {
        assert!(Engine::default()
            .with_view_location("blog", "plugins/blog")
            .unwrap()
            .view_location("blog")
            .is_some());
    }

    #[test]
    fn test_add_view_location_duplicate() {
        let result = Engine::default()
            .with_view_location("blog", "a")
            .unwrap()
            .with_view_location("blog", "b");

        assert!(result.is_err_and(|e| e.reason() == INVALID_NAME));
    }

    #[test]
    fn test_add_view_location_invalid() {
        assert!(Engine::default()
            .with_view_location("bad key", "a")
            .is_err());
    }

    #[test]
    fn test_template_locations_ordered() {
        let engine = Engine::new(Settings::default())
            .with_template_location("one")
            .with_template_location("two");
        let locations: Vec<_> = engine
            .template_locations()
            .iter()
            .map(|p| p.to_str().unwrap())
            .collect();

        assert_eq!(locations, vec!["one", "two"]);
    }
}
