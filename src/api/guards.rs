//! Request Guards
//!
//! Shared-secret checks and path hygiene applied in front of the handlers.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;
use tracing::warn;

use super::handlers::AppState;
use crate::error::{AppError, Result};

/// Header Lokalise puts the webhook secret in
pub const WEBHOOK_SECRET_HEADER: &str = "x-secret";

/// Header Braze connected content sends the API secret in
pub const API_SECRET_HEADER: &str = "x-secret-token";

// == Secret Checks ==
/// Compares two secrets without leaking the position of the first mismatch.
pub fn secrets_match(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Checks the Lokalise webhook secret header.
///
/// Every webhook is refused while no secret is configured.
pub fn verify_webhook_secret(headers: &HeaderMap, expected: Option<&str>) -> Result<()> {
    let expected = expected
        .ok_or_else(|| AppError::Forbidden("webhook secret is not configured".to_string()))?;

    let provided = headers
        .get(WEBHOOK_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if secrets_match(provided, expected) {
        Ok(())
    } else {
        Err(AppError::Forbidden("unable to validate request".to_string()))
    }
}

/// Hides the guarded routes behind a 404 unless `X-Secret-Token` matches.
///
/// Passes everything through when no API secret is configured.
pub async fn require_api_secret(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(expected) = state.api_auth_secret.as_deref() {
        let provided = request
            .headers()
            .get(API_SECRET_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        if !secrets_match(provided, expected) {
            warn!(path = %request.uri().path(), "request secret failed validation");
            return AppError::NotFound(request.uri().path().to_string()).into_response();
        }
    }

    next.run(request).await
}

// == Path Hygiene ==
/// Answers paths that are empty or end in `/` with a 404.
pub async fn reject_directory_paths(request: Request, next: Next) -> Response {
    let path = request.uri().path();
    if path.is_empty() || path.ends_with('/') {
        warn!(path, "rejected directory request");
        return AppError::NotFound(path.to_string()).into_response();
    }

    next.run(request).await
}
