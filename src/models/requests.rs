//! Request DTOs for the listener API
//!
//! Defines the structure of incoming webhook bodies and form parameters.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{AppError, Result};

/// Project reference inside a Lokalise webhook.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectRef {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of the Lokalise "task completed" webhook (POST /api/v1/taskComplete)
///
/// Only the project is used; every other field Lokalise sends is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskCompletedWebhook {
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub project: ProjectRef,
}

impl TaskCompletedWebhook {
    /// Validates the webhook body
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.project.id.is_empty() {
            return Some("project.id cannot be empty".to_string());
        }
        None
    }
}

/// Form body of POST /api/v1/braze/parse_template
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParseTemplateForm {
    /// Braze API identifier of the email template
    #[serde(default)]
    pub template_id: String,
}

impl ParseTemplateForm {
    /// Validates the form
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.template_id.trim().is_empty() {
            return Some("template_id cannot be empty".to_string());
        }
        None
    }
}

/// Collapses decoded query/form pairs into one value per parameter.
///
/// A parameter given more than once is rejected rather than guessed.
pub fn flatten_params(pairs: Vec<(String, String)>) -> Result<HashMap<String, String>> {
    let mut params = HashMap::with_capacity(pairs.len());

    for (name, value) in pairs {
        if params.contains_key(&name) {
            return Err(AppError::InvalidRequest(format!(
                "parameter '{}' has more than one value",
                name
            )));
        }
        params.insert(name, value);
    }

    Ok(params)
}
