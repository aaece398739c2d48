//! Default Renderer
//!
//! Fills `{{ name }}` variables in extracted defaults from the connected-content
//! request parameters.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::ExtractedStrings;

static VARIABLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{[ \t]*(?P<name>[A-Za-z0-9_.\-]+)[ \t]*\}\}").expect("invalid variable regex")
});

// == Render Defaults ==
/// Renders every default, substituting variables found in `params`.
///
/// Variables without a matching parameter are left untouched so Braze can
/// still resolve them at send time.
pub fn render_defaults(
    strings: &ExtractedStrings,
    params: &HashMap<String, String>,
) -> BTreeMap<String, String> {
    strings
        .iter()
        .map(|(key, extracted)| (key.clone(), render(&extracted.default_value, params)))
        .collect()
}

fn render(text: &str, params: &HashMap<String, String>) -> String {
    VARIABLE_REGEX
        .replace_all(text, |caps: &Captures| match params.get(&caps["name"]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::extract;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_substitutes_known_params() {
        let strings = extract(r#"{{ strings.greeting | default:"Hello [[ name ]]!" }}"#).unwrap();
        let rendered = render_defaults(&strings, &params(&[("name", "Ana")]));

        assert_eq!(rendered["greeting"], "Hello Ana!");
    }

    #[test]
    fn test_keeps_unknown_variables() {
        let strings = extract(r#"{{ strings.greeting | default:"Hi [[name]], [[city]]" }}"#).unwrap();
        let rendered = render_defaults(&strings, &params(&[("name", "Ana")]));

        assert_eq!(rendered["greeting"], "Hi Ana, {{city}}");
    }

    #[test]
    fn test_plain_defaults_unchanged() {
        let strings = extract(r#"{{ strings.cta | default:"Buy now" }}"#).unwrap();
        let rendered = render_defaults(&strings, &HashMap::new());

        assert_eq!(rendered["cta"], "Buy now");
    }
}
