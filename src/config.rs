use crate::log::{error_config, error_io, Error};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings shared by every request rendered through an
/// [`Engine`][`crate::Engine`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Address prepended to links, exposed to templates as `{BASE}`.
    pub base_url: String,
    /// Primary directory searched for views.
    pub view_directory: PathBuf,
    /// Directory holding one sub-directory per template shell.
    pub template_directory: PathBuf,
    /// Extension appended to view names, without the leading dot.
    pub view_extension: String,
    /// Shell used by `render` when none was selected.
    pub default_template: String,
    /// When false, `render` returns without producing output.
    pub render_enabled: bool,
    pub pagination: PaginationSettings,
    /// Optional formatting for `{DTC}` blocks. Values pass through unchanged
    /// when absent.
    pub dates: Option<DateSettings>,
}

/// Bounds used by [`Pagination`][`crate::Pagination`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PaginationSettings {
    /// Hard cap on results displayed per page.
    pub max_per_page: u64,
    /// Hard cap on results retrieved by a single query.
    pub max_query: u64,
    pub default_per_page: u64,
}

/// Formats applied to Unix timestamps inside `{DTC}` blocks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DateSettings {
    /// `chrono` format string used when the block flags mention `date`.
    pub date_format: String,
    /// `chrono` format string used when the block flags mention `time`.
    pub time_format: String,
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

/// Default configuration, matching [`Settings::default`].
pub const DEFAULT_CONFIG: &str = r#"
base_url = "/"
view_directory = "views"
template_directory = "templates"
view_extension = "html"
default_template = "default"
render_enabled = true

[pagination]
max_per_page = 50
max_query = 100
default_per_page = 5
"#;

impl Settings {
    /// Decode [`Settings`] from a TOML document. Missing keys take their
    /// default values.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the document is not valid TOML or a key has
    /// the wrong type.
    ///
    /// # Examples
    ///
    /// ```
    /// use tempus::Settings;
    ///
    /// let settings = Settings::from_toml("base_url = \"https://example.com/\"").unwrap();
    /// assert_eq!(settings.base_url, "https://example.com/");
    /// assert_eq!(settings.pagination.max_per_page, 50);
    /// ```
    pub fn from_toml(text: &str) -> Result<Self, Error> {
        toml::from_str(text).map_err(|e| error_config(Path::new("<inline>"), e))
    }

    /// Read and decode [`Settings`] from the TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the file cannot be read or decoded.
    pub fn load<P>(path: P) -> Result<Self, Error>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        tracing::info!("loading settings from: {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|e| error_io(path, e))?;

        toml::from_str(&text).map_err(|e| error_config(path, e))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "/".into(),
            view_directory: PathBuf::from("views"),
            template_directory: PathBuf::from("templates"),
            view_extension: "html".into(),
            default_template: "default".into(),
            render_enabled: true,
            pagination: PaginationSettings::default(),
            dates: None,
        }
    }
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            max_per_page: 50,
            max_query: 100,
            default_per_page: 5,
        }
    }
}
