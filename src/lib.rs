//! Lokalise Listener - Braze/Lokalise localization bridge
//!
//! Receives Lokalise webhooks, extracts localizable strings from Braze email
//! templates and serves them to Braze connected content through a short-lived
//! response cache.

pub mod api;
pub mod cache;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;
pub mod templates;
pub mod tls;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_eviction_task;
