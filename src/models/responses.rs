//! Response DTOs for the listener API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::templates::ExtractedStrings;

/// Response body for POST /api/v1/taskComplete
#[derive(Debug, Clone, Serialize)]
pub struct TaskCompletedResponse {
    /// Lokalise project that was exported
    pub project_id: String,
    /// Outcome of the export trigger
    pub status: String,
}

impl TaskCompletedResponse {
    /// Creates a response for a successfully triggered export
    pub fn triggered(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            status: "triggered".to_string(),
        }
    }
}

/// Response body for POST /api/v1/braze/parse_template
#[derive(Debug, Clone, Serialize)]
pub struct ParseTemplateResponse {
    /// The parsed template
    pub template_id: String,
    /// Strings found in the template
    pub strings: ExtractedStrings,
}

impl ParseTemplateResponse {
    pub fn new(template_id: impl Into<String>, strings: ExtractedStrings) -> Self {
        Self {
            template_id: template_id.into(),
            strings,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of evicted entries
    pub evictions: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Number of templates with extracted strings
    pub templates: usize,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics
    pub fn new(stats: &CacheStats, templates: usize) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
            templates,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
