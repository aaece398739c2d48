//! Template String Store
//!
//! Keeps the strings most recently extracted from each Braze template.
//! Connected content falls back to them while Braze is unreachable.

use dashmap::DashMap;

use super::ExtractedStrings;

// == Template String Store ==
/// Extracted strings per Braze template id.
#[derive(Debug, Default)]
pub struct TemplateStringStore {
    templates: DashMap<String, ExtractedStrings>,
}

impl TemplateStringStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the strings of `template_id`, replacing any previous extraction.
    pub fn insert(&self, template_id: impl Into<String>, strings: ExtractedStrings) {
        self.templates.insert(template_id.into(), strings);
    }

    /// Returns a copy of the strings extracted for `template_id`.
    pub fn get(&self, template_id: &str) -> Option<ExtractedStrings> {
        self.templates.get(template_id).map(|s| s.value().clone())
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
