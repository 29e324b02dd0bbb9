use serde::Serialize;
use serde_json::{to_value, Map, Value};
use tracing::error;

/// Return true if `name` is a simple name: one or more ASCII letters,
/// digits, dashes or underscores.
pub(crate) fn is_simple_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Provides storage for the components that `{NAME}` tags are replaced with.
///
/// Components are kept in insertion order. Setting an existing name replaces
/// its value in place.
#[derive(Debug, Clone, Default)]
pub struct Store {
    data: Map<String, Value>,
}

impl Store {
    /// Create a new, empty [`Store`].
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the component `name` to `value`.
    ///
    /// Returns false, leaving the `Store` untouched, when `name` is not a
    /// simple name or the value cannot be serialized.
    ///
    /// # Examples
    ///
    /// ```
    /// use tempus::Store;
    ///
    /// let mut store = Store::new();
    ///
    /// assert!(store.set("TITLE", "Home"));
    /// assert!(!store.set("bad name!", "x"));
    /// ```
    pub fn set<S, T>(&mut self, name: S, value: T) -> bool
    where
        S: Into<String>,
        T: Serialize,
    {
        let name = name.into();
        if !is_simple_name(&name) {
            error!("component name invalid: {name}");
            return false;
        }

        match to_value(value) {
            Ok(value) => {
                self.data.insert(name, value);
                true
            }
            Err(e) => {
                error!("component {name} is unserializable: {e}");
                false
            }
        }
    }

    /// Set the component `name` to `value`.
    ///
    /// Returns the `Store`, so additional methods may be chained. Rejected
    /// names are logged and skipped.
    #[inline]
    pub fn with<S, T>(mut self, name: S, value: T) -> Self
    where
        S: Into<String>,
        T: Serialize,
    {
        self.set(name, value);

        self
    }

    /// Returns a reference to the [`Value`] of the component `name`.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    /// Iterate over the components in insertion order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{is_simple_name, Store};
    use serde_json::json;

    #[test]
    fn test_simple_name() {
        assert!(is_simple_name("good-name_1"));
        assert!(!is_simple_name("bad name!"));
        assert!(!is_simple_name(""));
        assert!(!is_simple_name("CHECKED:a=b"));
    }

    #[test]
    fn test_set_and_get() {
        let mut store = Store::new();

        assert!(store.set("one", "two"));
        assert_eq!(store.get("one"), Some(&json!("two")));
    }

    #[test]
    fn test_set_invalid_keeps_previous() {
        let mut store = Store::new().with("good-name_1", "x");

        assert!(!store.set("bad name!", "y"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("good-name_1"), Some(&json!("x")));
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let store = Store::new()
            .with("A", 1)
            .with("B", 2)
            .with("A", 3);
        let order: Vec<_> = store.iter().map(|(k, v)| (k.as_str(), v.clone())).collect();

        assert_eq!(order, vec![("A", json!(3)), ("B", json!(2))]);
    }
}
