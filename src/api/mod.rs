//! API Module
//!
//! HTTP handlers, guards and routing for the listener.
//!
//! # Endpoints
//! - `POST /api/v1/taskComplete` - Lokalise task completed webhook
//! - `POST /api/v1/braze/parse_template` - Extract strings from a Braze template
//! - `GET|POST /api/v1/strings/braze` - Braze connected content
//! - `GET /braze/template_upload` - Template upload form
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod guards;
pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::{create_router, REQUEST_ID_HEADER};
