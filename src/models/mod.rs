//! Request and Response models for the listener API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{flatten_params, ParseTemplateForm, ProjectRef, TaskCompletedWebhook};
pub use responses::{
    ErrorResponse, HealthResponse, ParseTemplateResponse, StatsResponse, TaskCompletedResponse,
};
