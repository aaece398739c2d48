//! Template String Extractor
//!
//! Pulls localizable strings out of Braze email templates. A string is written
//! in the template as
//!
//! ```text
//! {{ strings.greeting | default:"Hello [[name]]" }}<!-- context: "greeting on homepage" -->
//! ```
//!
//! where the trailing comment is optional. Liquid delimiters cannot appear in a
//! default literally, so `[[`/`]]` stand in for `{{`/`}}` and are restored here.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::error::{AppError, Result};

// == Pattern ==
const STRING_PATTERN: &str = concat!(
    r#"\{\{[ \t]*strings\.(?P<key>.+?)[ \t]*\|[ \t]*default:[ \t]*(?:'|")(?P<default>.+?)(?:'|")[ \t]*\}\}"#,
    r#"(?:[ \t]*<!--[ \t]*context:[ \t]*(?:'|")(?P<context>.+?)(?:'|")[ \t]*-->)?"#,
);

// Whole match + key + default + context
const CAPTURE_GROUPS: usize = 4;

static STRING_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(STRING_PATTERN).expect("invalid template string regex"));

// == Extracted String ==
/// A localizable string found in a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedString {
    /// Placeholder identifier, the part after `strings.`
    pub key: String,
    /// Fallback text with escaped delimiters restored
    #[serde(rename = "default")]
    pub default_value: String,
    /// Usage note for translators
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Extracted strings keyed by placeholder identifier.
pub type ExtractedStrings = BTreeMap<String, ExtractedString>;

// == Extract ==
/// Extracts every localizable string from `template`.
///
/// Matches are taken left to right; a key that appears more than once keeps
/// the last occurrence. A template without placeholders yields an empty map.
pub fn extract(template: &str) -> Result<ExtractedStrings> {
    let mut strings = ExtractedStrings::new();

    for captures in STRING_REGEX.captures_iter(template) {
        if captures.len() != CAPTURE_GROUPS {
            return Err(AppError::MalformedTemplate(format!(
                "expected {} capture groups, found {}",
                CAPTURE_GROUPS,
                captures.len()
            )));
        }

        let (key, default) = match (captures.name("key"), captures.name("default")) {
            (Some(key), Some(default)) => (key.as_str(), default.as_str()),
            _ => {
                return Err(AppError::MalformedTemplate(format!(
                    "incomplete string placeholder: {}",
                    &captures[0]
                )))
            }
        };

        let extracted = ExtractedString {
            key: key.to_string(),
            default_value: unescape_delimiters(default),
            context: captures.name("context").map(|c| c.as_str().to_string()),
        };
        strings.insert(extracted.key.clone(), extracted);
    }

    debug!(count = strings.len(), "extracted template strings");
    Ok(strings)
}

fn unescape_delimiters(value: &str) -> String {
    value.replace("[[", "{{").replace("]]", "}}")
}
