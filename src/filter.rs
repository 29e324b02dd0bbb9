//! Contains the filter registry.
//!
//! A filter is a named regular expression with a replacement. Filters are applied to
//! the output of every parse as the very last step, in the order they were added,
//! which lets them unwrap or remove markup left behind by the other passes.
//!
//! Filters start disabled unless requested otherwise, and a disabled filter has no
//! effect on the output at all.
//!
//! # Examples
//!
//! Show the contents of `{ADMIN}...{/ADMIN}` blocks to administrators, and remove them
//! (contents included) for everyone else:
//!
//! ```rust
//! use tempus::Filters;
//!
//! let mut filters = Filters::new();
//! filters.add("admin", r"(?is)\{ADMIN\}(.*?)\{/ADMIN\}", "$1", true);
//! filters.add("admin-hide", r"(?is)\{ADMIN\}.*?\{/ADMIN\}", "", true);
//!
//! assert_eq!(filters.apply("a{ADMIN}b{/ADMIN}c"), "abc");
//!
//! filters.disable("admin");
//! assert_eq!(filters.apply("a{ADMIN}b{/ADMIN}c"), "ac");
//! ```
//!
//! Patterns use the syntax of the [`regex`] crate. Flags are written inline (`(?is)`)
//! and replacements refer to capture groups as `$1` or `${1}`.
use crate::store::is_simple_name;
use regex::Regex;
use tracing::{debug, error};

/// A named regular expression rewrite applied to rendered output.
#[derive(Debug, Clone)]
pub struct Filter {
    name: String,
    pattern: Regex,
    replacement: String,
    enabled: bool,
}

impl Filter {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    #[inline]
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Ordered collection of [`Filter`] instances with unique names.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    filters: Vec<Filter>,
}

impl Filters {
    /// Create a new, empty [`Filters`] registry.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a [`Filter`].
    ///
    /// Returns false without changing the registry when `name` is not a simple
    /// name, a filter with that name already exists, or `pattern` does not
    /// compile.
    pub fn add(&mut self, name: &str, pattern: &str, replacement: &str, enabled: bool) -> bool {
        if !is_simple_name(name) {
            error!("filter name invalid: {name}");
            return false;
        }
        if self.position(name).is_some() {
            error!("filter already exists: {name}");
            return false;
        }
        let pattern = match Regex::new(pattern) {
            Ok(pattern) => pattern,
            Err(e) => {
                error!("filter {name} has an invalid pattern: {e}");
                return false;
            }
        };

        debug!("adding filter: {name}");
        self.filters.push(Filter {
            name: name.to_string(),
            pattern,
            replacement: replacement.to_string(),
            enabled,
        });

        true
    }

    /// Remove the [`Filter`] with the given name.
    ///
    /// Returns false if `name` is invalid or no such filter exists.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.find(name) {
            Some(index) => {
                self.filters.remove(index);
                true
            }
            None => false,
        }
    }

    /// Enable the [`Filter`] with the given name.
    ///
    /// Returns false if `name` is invalid or no such filter exists.
    #[inline]
    pub fn enable(&mut self, name: &str) -> bool {
        self.toggle(name, true)
    }

    /// Disable the [`Filter`] with the given name.
    ///
    /// Returns false if `name` is invalid or no such filter exists.
    #[inline]
    pub fn disable(&mut self, name: &str) -> bool {
        self.toggle(name, false)
    }

    /// Return the [`Filter`] with the given name, if it exists.
    pub fn get(&self, name: &str) -> Option<&Filter> {
        self.position(name).map(|index| &self.filters[index])
    }

    /// Apply every enabled [`Filter`] to `text`, in insertion order.
    ///
    /// Each enabled filter replaces all matches of its pattern and trims the
    /// result, so later filters see the output of earlier ones.
    pub fn apply(&self, text: &str) -> String {
        let mut output = text.to_string();
        for filter in self.filters.iter().filter(|f| f.enabled) {
            output = filter
                .pattern
                .replace_all(&output, filter.replacement.as_str())
                .trim()
                .to_string();
        }

        output
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    fn toggle(&mut self, name: &str, enabled: bool) -> bool {
        match self.find(name) {
            Some(index) => {
                self.filters[index].enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Validate `name` and return the index of its filter, logging why when
    /// there is none.
    fn find(&self, name: &str) -> Option<usize> {
        if !is_simple_name(name) {
            error!("filter name invalid: {name}");
            return None;
        }
        let position = self.position(name);
        if position.is_none() {
            error!("filter does not exist: {name}");
        }

        position
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.filters.iter().position(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::Filters;

    #[test]
    fn test_add() {
        let mut filters = Filters::new();

        assert!(filters.add("strip", "x", "", false));
        assert!(filters.get("strip").is_some_and(|f| !f.is_enabled()));
        assert!(filters.get("ghost").is_none());
    }

    #[test]
    fn test_add_duplicate() {
        let mut filters = Filters::new();
        filters.add("strip", "x", "", false);

        assert!(!filters.add("strip", "y", "z", true));
        assert_eq!(filters.len(), 1);
        assert_eq!(filters.get("strip").unwrap().pattern(), "x");
    }

    #[test]
    fn test_add_invalid() {
        let mut filters = Filters::new();

        assert!(!filters.add("bad name", "x", "", true));
        assert!(!filters.add("broken", "(unclosed", "", true));
        assert!(filters.is_empty());
    }

    #[test]
    fn test_missing_filter() {
        let mut filters = Filters::new();

        assert!(!filters.enable("ghost"));
        assert!(!filters.disable("ghost"));
        assert!(!filters.remove("ghost"));
        assert!(!filters.remove("bad name!"));
    }

    #[test]
    fn test_disabled_is_inert() {
        let mut filters = Filters::new();
        filters.add("digits", "[0-9]", "", false);

        assert_eq!(filters.apply("  a1b2  "), "  a1b2  ");
    }

    #[test]
    fn test_apply_trims() {
        let mut filters = Filters::new();
        filters.add("digits", "[0-9]", "", true);

        assert_eq!(filters.apply("  a1b2  "), "ab");
    }

    #[test]
    fn test_order_and_toggle() {
        let mut filters = Filters::new();
        filters.add("a", r"(?i)\{A\}(.*?)\{/A\}", "[$1]", true);
        filters.add("b", r"\[(.*?)\]", "<$1>", true);

        // b sees the output of a.
        assert_eq!(filters.apply("{A}x{/A}"), "<x>");

        filters.disable("b");
        assert_eq!(filters.apply("{A}x{/A}"), "[x]");

        filters.enable("b");
        filters.remove("a");
        assert_eq!(filters.apply("{A}x{/A}"), "{A}x{/A}");
    }
}
