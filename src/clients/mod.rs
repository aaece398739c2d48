//! Upstream Clients Module
//!
//! Timeout-bound REST clients for Braze and Lokalise.

mod braze;
mod lokalise;

use std::time::Duration;

pub use braze::{BrazeClient, TemplateInfo};
pub use lokalise::LokaliseClient;

use crate::error::{AppError, Result};

// == HTTP Client ==
/// Builds the HTTP client shared by every upstream client.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {}", e)))
}
