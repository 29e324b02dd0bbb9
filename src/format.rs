use serde_json::Value;
use std::borrow::Cow;

/// Return the text substituted for a tag whose value is `value`.
///
/// Strings are used verbatim and numbers use their display form. `true` becomes
/// `"1"`; `false`, `null`, arrays and objects all become an empty string.
pub fn to_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(string) => Cow::Borrowed(string.as_str()),
        Value::Number(number) => Cow::Owned(number.to_string()),
        Value::Bool(true) => Cow::Borrowed("1"),
        Value::Bool(false) | Value::Null | Value::Array(_) | Value::Object(_) => {
            Cow::Borrowed("")
        }
    }
}

/// Return true if `value` counts as "no data" for a loop: null, `false`, an
/// empty string, an empty array or an empty object.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(bool) => !bool,
        Value::String(string) => string.is_empty(),
        Value::Array(array) => array.is_empty(),
        Value::Object(object) => object.is_empty(),
        Value::Number(_) => false,
    }
}
