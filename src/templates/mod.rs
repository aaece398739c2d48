//! Templates Module
//!
//! Extraction, storage and rendering of localizable strings from Braze templates.

mod extractor;
mod render;
mod store;

pub use extractor::{extract, ExtractedString, ExtractedStrings};
pub use render::render_defaults;
pub use store::TemplateStringStore;
