use crate::{config::DateSettings, forms::Forms};
use chrono::{DateTime, FixedOffset};
use once_cell::sync::Lazy;
use regex::{Captures, NoExpand, Regex, RegexBuilder};
use std::fmt::Write;
use tracing::warn;

static OPTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)\{OPTION=(.*?)\}").expect("option pattern is valid"));
static DTC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)\{DTC(.*?)\}(.*?)\{/DTC\}").expect("date/time pattern is valid")
});

/// Replace every `{name}` tag in `text`, ignoring case, with `value`.
///
/// `value` is inserted literally, `$` included.
pub fn replace_tag(text: &str, name: &str, value: &str) -> String {
    let tag = regex::escape(&format!("{{{name}}}"));
    match RegexBuilder::new(&tag).case_insensitive(true).build() {
        Ok(pattern) => pattern.replace_all(text, NoExpand(value)).into_owned(),
        Err(e) => {
            warn!("tag `{name}` cannot be matched: {e}");
            text.to_string()
        }
    }
}

/// Apply the option selections of `forms` once each, then remove any
/// `{OPTION=...}` markers that are left.
///
/// Nothing is scanned unless `text` contains `{OPTION=`.
pub fn replace_options(text: String, forms: &Forms) -> String {
    if !text.contains("{OPTION=") {
        return text;
    }
    let mut text = text;
    for (pattern, replacement) in forms.options() {
        text = pattern.replacen(&text, 1, replacement).into_owned();
    }

    OPTION.replace_all(&text, "").into_owned()
}

/// Resolve `{DTC flags}value{/DTC}` blocks.
///
/// Empty values and the literal `null` resolve to an empty string. Other values
/// pass through unchanged, unless `dates` is given and the value is a Unix
/// timestamp, in which case it is formatted.
pub fn replace_dates(text: &str, dates: Option<&DateSettings>) -> String {
    DTC.replace_all(text, |captures: &Captures| {
        let flags = &captures[1];
        let raw = &captures[2];
        if raw.is_empty() || raw == "null" {
            return String::new();
        }

        dates
            .and_then(|dates| format_timestamp(flags, raw, dates))
            .unwrap_or_else(|| raw.to_string())
    })
    .into_owned()
}

/// Format `raw` as a timestamp, choosing the date format when `flags` mention
/// `date`, the time format for `time`, and both otherwise.
fn format_timestamp(flags: &str, raw: &str, dates: &DateSettings) -> Option<String> {
    let seconds = raw.trim().parse::<i64>().ok()?;
    let offset = FixedOffset::east_opt(dates.utc_offset_minutes.checked_mul(60)?)?;
    let moment = DateTime::from_timestamp(seconds, 0)?.with_timezone(&offset);

    let flags = flags.to_ascii_lowercase();
    let format = if flags.contains("date") {
        dates.date_format.clone()
    } else if flags.contains("time") {
        dates.time_format.clone()
    } else {
        format!("{} {}", dates.date_format, dates.time_format)
    };

    let mut output = String::new();
    match write!(output, "{}", moment.format(&format)) {
        Ok(()) => Some(output),
        Err(_) => {
            warn!("invalid date format `{format}`");
            None
        }
    }
}
