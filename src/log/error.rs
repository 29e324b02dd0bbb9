use super::{RED, RESET};
use std::fmt::{Debug, Display, Formatter, Result};

/// The place a missing resource was requested from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundContext {
    /// A view appended to the page content with `view`.
    View,
    /// A view resolved with `standard_view`.
    StandardView,
    /// A template shell selected with `set_template`.
    Template,
    /// The loader file that accompanies a template shell.
    TemplateLoader,
}

impl Display for NotFoundContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let name = match self {
            NotFoundContext::View => "view",
            NotFoundContext::StandardView => "standardView",
            NotFoundContext::Template => "template",
            NotFoundContext::TemplateLoader => "templateLoader",
        };

        write!(f, "{name}")
    }
}

/// Broad category of an [`Error`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// General, non-specific error.
    General,
    /// A view, template shell or loader file does not exist.
    NotFound(NotFoundContext),
    /// Reading a file or writing output failed.
    Io,
    /// A regular expression could not be compiled.
    Pattern,
    /// A configuration or loader document could not be decoded.
    Config,
}

/// Describes an error, and allows adding a contextual help text.
///
/// # Examples
///
/// ```
/// use tempus::{Error, ErrorKind, NotFoundContext};
///
/// let error = Error::build("view not found")
///     .with_kind(ErrorKind::NotFound(NotFoundContext::StandardView))
///     .with_name("views/home.html")
///     .with_help("create the file or register an additional view location");
///
/// assert!(error.is_not_found());
/// ```
///
/// When printed with `println!("{:#}", error)` the [`Error`] produces this output:
///
/// ```text
/// error: view not found
///   --> views/home.html
///   = help: create the file or register an additional view location
/// ```
pub struct Error {
    /// Category of the [`Error`].
    kind: ErrorKind,
    /// Describes the cause of the [`Error`].
    reason: String,
    /// Additional information to display with the [`Error`].
    help: Option<String>,
    /// The name of the file or item that the [`Error`] comes from.
    name: Option<String>,
}

impl Error {
    /// Create a new [`Error`] with the given reason text.
    ///
    /// The additional fields may be populated using the various methods
    /// defined on `Error`.
    pub fn build<T>(reason: T) -> Self
    where
        T: Into<String>,
    {
        Error {
            kind: ErrorKind::General,
            reason: reason.into(),
            help: None,
            name: None,
        }
    }

    /// Set the [`ErrorKind`].
    pub fn with_kind(mut self, kind: ErrorKind) -> Self {
        self.kind = kind;

        self
    }

    /// Set the reason text, which is a short summary of the [`Error`].
    pub fn with_reason<T>(mut self, text: T) -> Self
    where
        T: Into<String>,
    {
        self.reason = text.into();

        self
    }

    /// Set the name text, usually the path of the file that the [`Error`]
    /// is related to.
    pub fn with_name<T>(mut self, text: T) -> Self
    where
        T: Into<String>,
    {
        self.name = Some(text.into());

        self
    }

    /// Set the help text, which is contextual information to accompany the
    /// reason text.
    pub fn with_help<T>(mut self, text: T) -> Self
    where
        T: Into<String>,
    {
        self.help = Some(text.into());

        self
    }

    /// Return the [`ErrorKind`].
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Return the reason text.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Return the name of the item that the error is related to.
    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Return true if this error describes a missing view, template or loader.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound(_))
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        if !f.alternate() {
            writeln!(f, "{self:#}")?;
        }
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("reason", &self.reason)
            .field("name", &self.name)
            .field("help", &self.help)
            .finish()
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let header = format!("{RED}error{RESET}");
        write!(f, "{header}: {}", self.reason)?;

        if f.alternate() {
            if let Some(name) = &self.name {
                write!(f, "\n  --> {name}")?;
            }
            if let Some(help) = &self.help {
                write!(f, "\n  = help: {help}")?;
            }
        }

        Ok(())
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.reason == other.reason
            && self.help == other.help
            && self.name == other.name
    }
}

impl std::error::Error for Error {}
