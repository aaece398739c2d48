//! Cache Key Module
//!
//! Canonical lookup tokens derived from request parameters.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::error::{AppError, Result};

// == Cache Key ==
/// Opaque lookup token for the strings cache.
///
/// Built from a parameter map serialized as compact JSON with sorted field
/// names, so equal maps always yield equal keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Canonicalizes a flat parameter map into a key.
    pub(crate) fn from_params(params: &HashMap<String, String>) -> Result<Self> {
        let sorted: BTreeMap<&str, &str> = params
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();

        serde_json::to_string(&sorted)
            .map(CacheKey)
            .map_err(|e| AppError::KeySerialization(e.to_string()))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
