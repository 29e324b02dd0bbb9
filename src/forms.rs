use regex::Regex;
use tracing::{debug, error};

/// Selections applied to `<select>` markup when the rendered text contains
/// `{OPTION=` markers.
#[derive(Debug, Clone, Default)]
pub struct Forms {
    options: Vec<(Regex, String)>,
}

impl Forms {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the first `<option ... value='value'` in the rendered output as
    /// `selected`.
    ///
    /// Selecting the same value twice keeps a single selection.
    pub fn select_option(&mut self, value: &str) -> bool {
        let source = format!(r"(?s)<option (.*?)value='{}'", regex::escape(value));
        let pattern = match Regex::new(&source) {
            Ok(pattern) => pattern,
            Err(e) => {
                error!("option `{value}` cannot be selected: {e}");
                return false;
            }
        };
        let replacement = format!("<option ${{1}}value='{}' selected", value.replace('$', "$$"));

        debug!("selecting option: {value}");
        match self.options.iter_mut().find(|(p, _)| p.as_str() == source) {
            Some(existing) => existing.1 = replacement,
            None => self.options.push((pattern, replacement)),
        }

        true
    }

    /// Iterate over the registered `(pattern, replacement)` selections.
    pub fn options(&self) -> impl Iterator<Item = (&Regex, &str)> {
        self.options.iter().map(|(p, r)| (p, r.as_str()))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::Forms;

    #[test]
    fn test_select_option() {
        let mut forms = Forms::new();

        assert!(forms.select_option("b"));
        assert!(forms.select_option("b"));
        assert_eq!(forms.options().count(), 1);

        let (pattern, replacement) = forms.options().next().unwrap();
        let text = "<option class='x' value='b'>B</option>";
        assert_eq!(
            pattern.replacen(text, 1, replacement),
            "<option class='x' value='b' selected>B</option>"
        );
    }

    #[test]
    fn test_select_option_escapes() {
        let mut forms = Forms::new();
        forms.select_option("$1.00");
        let (pattern, replacement) = forms.options().next().unwrap();

        assert!(!pattern.is_match("<option value='$1x00'>"));
        assert_eq!(
            pattern.replacen("<option value='$1.00'>", 1, replacement),
            "<option value='$1.00' selected>"
        );
    }
}
