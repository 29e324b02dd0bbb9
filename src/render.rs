mod expand;
mod tag;

pub use expand::expand;
pub use tag::{replace_dates, replace_options, replace_tag};

use crate::{config::DateSettings, filter::Filters, format::to_text, forms::Forms, Store};
use serde_json::Value;

/// Render `template` against the components in `store`.
///
/// Provides a shortcut when no filters, option selections or date formats are
/// needed. A [`Context`][`crate::Context`] is preferred for full requests.
///
/// # Examples
///
/// ```
/// use tempus::{render, Store};
///
/// let store = Store::new().with("NAME", "taylor");
/// let output = render("hello, {name}!", &store);
///
/// assert_eq!(output, "hello, taylor!");
/// ```
pub fn render(template: &str, store: &Store) -> String {
    let forms = Forms::new();
    let filters = Filters::new();

    Renderer::new(store, &forms, &filters).render(template, None)
}

/// Runs the substitution passes over template text.
///
/// The passes run in a fixed order:
///
/// 1. the `{LOOP}` block is expanded against the data records,
/// 2. `{NAME}` tags are replaced with components,
/// 3. `{OPTION=...}` selections are applied,
/// 4. `{DTC}` blocks are resolved,
/// 5. filters are applied.
pub struct Renderer<'context> {
    /// Components that `{NAME}` tags resolve to.
    store: &'context Store,
    /// Option menu selections.
    forms: &'context Forms,
    /// Filters applied last.
    filters: &'context Filters,
    /// Formats for `{DTC}` timestamps, if any.
    dates: Option<&'context DateSettings>,
}

impl<'context> Renderer<'context> {
    /// Create a new Renderer.
    pub fn new(
        store: &'context Store,
        forms: &'context Forms,
        filters: &'context Filters,
    ) -> Self {
        Renderer {
            store,
            forms,
            filters,
            dates: None,
        }
    }

    /// Format `{DTC}` timestamps with the given settings.
    pub fn with_dates(mut self, dates: Option<&'context DateSettings>) -> Self {
        self.dates = dates;

        self
    }

    /// Render `template` with the optional loop `data`.
    pub fn render(&self, template: &str, data: Option<&Value>) -> String {
        let mut text = expand(template, data);
        for (name, value) in self.store.iter() {
            text = replace_tag(&text, name, &to_text(value));
        }
        let text = replace_options(text, self.forms);
        let text = replace_dates(&text, self.dates);

        self.filters.apply(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::Renderer;
    use crate::{filter::Filters, forms::Forms, Store};
    use serde_json::json;

    #[test]
    fn test_render_raw() {
        let store = Store::new();
        let (forms, filters) = (Forms::new(), Filters::new());
        let result = Renderer::new(&store, &forms, &filters).render("hello there", None);

        assert_eq!(result, "hello there");
    }

    #[test]
    fn test_component_case_insensitive() {
        let store = Store::new().with("TITLE", "Hello");
        let (forms, filters) = (Forms::new(), Filters::new());
        let result = Renderer::new(&store, &forms, &filters).render("{title} {Title} {TITLE}", None);

        assert_eq!(result, "Hello Hello Hello");
    }

    #[test]
    fn test_records_before_components() {
        let store = Store::new().with("NAME", "component");
        let (forms, filters) = (Forms::new(), Filters::new());
        let result = Renderer::new(&store, &forms, &filters).render(
            "{LOOP}{NAME}{/LOOP}|{NAME}",
            Some(&json!([{"NAME": "record"}])),
        );

        // The loop footer is outside the records' reach.
        assert_eq!(result, "record|component");
    }

    #[test]
    fn test_components_in_order() {
        let store = Store::new().with("A", "{B}").with("B", "b");
        let (forms, filters) = (Forms::new(), Filters::new());

        assert_eq!(
            Renderer::new(&store, &forms, &filters).render("{A}", None),
            "b"
        );
    }

    #[test]
    fn test_filters_run_last() {
        let store = Store::new().with("GREETING", "{B}hi{/B}");
        let forms = Forms::new();
        let mut filters = Filters::new();
        filters.add("bold", r"(?is)\{B\}(.*?)\{/B\}", "<b>$1</b>", true);
        let result = Renderer::new(&store, &forms, &filters).render("{GREETING} {DTC}{/DTC}", None);

        assert_eq!(result, "<b>hi</b>");
    }

    #[test]
    fn test_idempotent() {
        let store = Store::new().with("TITLE", "Home");
        let forms = Forms::new();
        let mut filters = Filters::new();
        filters.add("stars", r"\*", "", true);
        let renderer = Renderer::new(&store, &forms, &filters);
        let template = "<h1>{TITLE}</h1>{LOOP}<i>{X}</i>{/LOOP}{ALT}none{/ALT}";
        let data = json!([{"X": "a*"}, {"X": "b*"}]);

        let once = renderer.render(template, Some(&data));
        assert_eq!(once, "<h1>Home</h1><i>a</i><i>b</i>");
        assert_eq!(renderer.render(&once, None), once);
    }
}
