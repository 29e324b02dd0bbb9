use super::{Error, ErrorKind, NotFoundContext};
use std::path::Path;

pub const INVALID_NAME: &str = "invalid name";
pub const INVALID_PATTERN: &str = "invalid pattern";
pub const INVALID_CONFIG: &str = "invalid config";

/// Return an [`Error`] describing a view, template or loader file that
/// could not be found at `path`.
pub fn error_not_found(context: NotFoundContext, path: &Path) -> Error {
    let help = match context {
        NotFoundContext::View => "the view rendered to an empty string, check that it has content",
        NotFoundContext::StandardView => {
            "check the view directory, or register an additional view location"
        }
        NotFoundContext::Template => {
            "check the template directory, or register an additional template location"
        }
        NotFoundContext::TemplateLoader => {
            "every template shell needs a `<name>.inc.toml` loader next to it"
        }
    };

    Error::build(format!("{context} not found"))
        .with_kind(ErrorKind::NotFound(context))
        .with_name(path.display().to_string())
        .with_help(help)
}

/// Return an [`Error`] explaining that reading or writing `path` failed.
pub fn error_io(path: &Path, err: std::io::Error) -> Error {
    Error::build("io failure")
        .with_kind(ErrorKind::Io)
        .with_name(path.display().to_string())
        .with_help(err.to_string())
}

/// Return an [`Error`] explaining that the rendered output could not be written.
pub fn error_write(err: std::io::Error) -> Error {
    Error::build("write failure")
        .with_kind(ErrorKind::Io)
        .with_help(format!("failed to write rendered output: {err}"))
}

/// Return an [`Error`] describing a regular expression that failed to compile.
pub fn error_pattern(name: &str, err: &regex::Error) -> Error {
    Error::build(INVALID_PATTERN)
        .with_kind(ErrorKind::Pattern)
        .with_name(name)
        .with_help(err.to_string())
}

/// Return an [`Error`] describing a TOML document that failed to decode.
pub fn error_config(path: &Path, err: toml::de::Error) -> Error {
    Error::build(INVALID_CONFIG)
        .with_kind(ErrorKind::Config)
        .with_name(path.display().to_string())
        .with_help(err.message().to_string())
}
