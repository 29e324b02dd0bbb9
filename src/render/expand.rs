use super::tag::replace_tag;
use crate::{
    format::{is_blank, to_text},
    region::Region,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::borrow::Cow;
use tracing::warn;

static LOOP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)\{LOOP\}(.*?)\{/LOOP\}").expect("loop pattern is valid"));
static ALT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)\{ALT\}(.*?)\{/ALT\}").expect("alt pattern is valid"));
static SINGLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)\{SINGLE\}(.*?)\{/SINGLE\}").expect("single pattern is valid")
});

/// A template split around its `{LOOP}...{/LOOP}` block.
///
/// Without a loop block the whole template is the body.
#[derive(Debug, PartialEq)]
struct Segments<'t> {
    header: &'t str,
    body: &'t str,
    footer: String,
    /// The footer with `{ALT}` wrappers removed but their contents kept.
    alternative: Option<String>,
}

impl<'t> Segments<'t> {
    fn split(template: &'t str) -> Self {
        let spans = LOOP
            .captures(template)
            .and_then(|captures| Some((captures.get(0)?, captures.get(1)?)));
        let Some((whole, inner)) = spans else {
            return Self {
                header: "",
                body: template,
                footer: String::new(),
                alternative: None,
            };
        };

        let header = template[Region::new(0..whole.start())].trim();
        let body = &template[Region::new(inner.range())];
        let mut footer = template[Region::tail(whole.end(), template)]
            .trim()
            .to_string();

        let mut alternative = None;
        if ALT.is_match(&footer) {
            alternative = Some(ALT.replace_all(&footer, "$1").trim().to_string());
            footer = ALT.replace_all(&footer, "").trim().to_string();
        }

        Self {
            header,
            body,
            footer,
            alternative,
        }
    }
}

/// Expand the `{LOOP}` block of `template` once per record in `data`.
///
/// `data` may be an array of records, an object whose values are records, or a
/// single flat record. Scalar fields replace `{field}` tags case-insensitively;
/// array fields become empty and nested objects are left alone. `{SINGLE}`
/// content is kept for the first record only.
///
/// Without data the `{ALT}` alternative is used when present, otherwise the loop
/// body is shown untouched.
pub fn expand(template: &str, data: Option<&Value>) -> String {
    let Segments {
        header,
        body,
        footer,
        alternative,
    } = Segments::split(template);

    let data = match data {
        Some(data) if !is_blank(data) => data,
        _ => {
            return match alternative.filter(|alt| !alt.is_empty()) {
                Some(alternative) => format!("{header}{alternative}"),
                None => format!("{header}{body}{footer}"),
            };
        }
    };

    let mut body = Cow::Borrowed(body);
    let mut output = String::with_capacity(body.len());
    let mut first = true;

    for instance in instances(data) {
        // A non-record instance means data is itself one flat record.
        let (record, flat) = if instance.is_object() {
            (instance, false)
        } else {
            (data, true)
        };

        output.push_str(&fill(&body, record));

        if first {
            output = SINGLE.replace_all(&output, "$1").into_owned();
            body = Cow::Owned(SINGLE.replace_all(&body, "").into_owned());
            first = false;
        }
        if flat {
            break;
        }
    }

    format!("{header}{output}{footer}")
}

/// Return the instances iterated by a loop over `data`.
fn instances(data: &Value) -> Vec<&Value> {
    match data {
        Value::Array(array) => array.iter().collect(),
        Value::Object(object) => object.values().collect(),
        scalar => {
            warn!("loop data is a scalar, treating it as a single empty record");
            vec![scalar]
        }
    }
}

/// Replace the field tags of `record` within `body`.
fn fill(body: &str, record: &Value) -> String {
    let fields: Vec<(Cow<str>, &Value)> = match record {
        Value::Object(object) => object
            .iter()
            .map(|(key, value)| (Cow::Borrowed(key.as_str()), value))
            .collect(),
        Value::Array(array) => array
            .iter()
            .enumerate()
            .map(|(index, value)| (Cow::Owned(index.to_string()), value))
            .collect(),
        _ => vec![],
    };

    let mut text = body.to_string();
    for (key, value) in fields {
        if value.is_object() {
            continue;
        }
        text = replace_tag(&text, &key, &to_text(value));
    }

    text
}

#[cfg(test)]
mod tests {
    use super::{expand, Segments};
    use serde_json::json;

    #[test]
    fn test_split_without_loop() {
        let segments = Segments::split(" plain {X} ");

        assert_eq!(segments.header, "");
        assert_eq!(segments.body, " plain {X} ");
        assert_eq!(segments.footer, "");
        assert_eq!(segments.alternative, None);
    }

    #[test]
    fn test_split() {
        let segments = Segments::split("<ul>\n{LOOP}<li>{X}</li>{/LOOP}\n<p>{ALT}none{/ALT}</p>");

        assert_eq!(segments.header, "<ul>");
        assert_eq!(segments.body, "<li>{X}</li>");
        assert_eq!(segments.footer, "<p></p>");
        assert_eq!(segments.alternative.as_deref(), Some("<p>none</p>"));
    }

    #[test]
    fn test_loop_with_alt() {
        let template = "A{LOOP}[{X}]{/LOOP}{ALT}none{/ALT}C";

        assert_eq!(expand(template, Some(&json!([{"X": 1}]))), "A[1]C");
        assert_eq!(expand(template, Some(&json!([]))), "AnoneC");
        assert_eq!(expand(template, None), "AnoneC");
    }

    #[test]
    fn test_single_first_only() {
        let template = "{LOOP}{SINGLE}first-only{/SINGLE}[{X}]{/LOOP}";
        let data = json!([{"X": 1}, {"X": 2}]);

        assert_eq!(expand(template, Some(&data)), "first-only[1][2]");
    }

    #[test]
    fn test_single_sees_first_record() {
        let template = "{LOOP}{SINGLE}<h1>{X}</h1>{/SINGLE}[{X}]{/LOOP}";
        let data = json!([{"X": "a"}, {"X": "b"}]);

        assert_eq!(expand(template, Some(&data)), "<h1>a</h1>[a][b]");
    }

    #[test]
    fn test_empty_loop_leaks_tokens() {
        let template = "A {LOOP}[{X}]{/LOOP} B";

        assert_eq!(expand(template, None), "A[{X}]B");
    }

    #[test]
    fn test_case_insensitive_fields() {
        let template = "{loop}{name}/{NAME}/{Name};{/loop}";
        let data = json!([{"Name": "taylor"}]);

        assert_eq!(expand(template, Some(&data)), "taylor/taylor/taylor;");
    }

    #[test]
    fn test_field_values() {
        let template = "{LOOP}{S}|{N}|{T}|{F}|{Z}|{A}|{O}{/LOOP}";
        let data = json!([{
            "S": "text",
            "N": 2.5,
            "T": true,
            "F": false,
            "Z": null,
            "A": [1, 2],
            "O": {"inner": 1}
        }]);

        assert_eq!(expand(template, Some(&data)), "text|2.5|1||||{O}");
    }

    #[test]
    fn test_flat_record() {
        let template = "<p>{TITLE}: {BODY}</p>";
        let data = json!({"TITLE": "Hello", "BODY": "World"});

        assert_eq!(expand(template, Some(&data)), "<p>Hello: World</p>");
    }

    #[test]
    fn test_flat_record_in_loop_runs_once() {
        let template = "{LOOP}<li>{NAME}</li>{/LOOP}";
        let data = json!({"NAME": "one", "OTHER": "two"});

        assert_eq!(expand(template, Some(&data)), "<li>one</li>");
    }

    #[test]
    fn test_keyed_records() {
        let template = "{LOOP}<li>{PAGENUMBER}</li>{/LOOP}";
        let data = json!({"1": {"PAGENUMBER": 1}, "2": {"PAGENUMBER": 2}});

        assert_eq!(expand(template, Some(&data)), "<li>1</li><li>2</li>");
    }

    #[test]
    fn test_empty_alt_falls_back_to_body() {
        let template = "A{LOOP}[{X}]{/LOOP}{ALT}{/ALT}";

        assert_eq!(expand(template, None), "A[{X}]");
    }

    #[test]
    fn test_fields_in_order() {
        let template = "{LOOP}{A}{/LOOP}";
        let data = json!([{"A": "$1 {B}", "B": "b"}]);

        // Earlier fields can introduce tags that later fields fill.
        assert_eq!(expand(template, Some(&data)), "$1 b");
    }
}
