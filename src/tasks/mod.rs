//! Background Tasks Module
//!
//! Contains background tasks that run for the lifetime of the listener.
//!
//! # Tasks
//! - Cache eviction: sweeps expired connected-content responses

mod eviction;

pub use eviction::spawn_eviction_task;
