//! Braze REST client.
//!
//! Only the email template info endpoint is used: it returns the template
//! body the localizable strings are extracted from.

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::{AppError, Result};

const TEMPLATE_INFO_PATH: &str = "/templates/email/info";

// == Template Info ==
/// Subset of the `templates/email/info` response we rely on.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateInfo {
    /// HTML body of the template
    pub body: String,
    #[serde(default)]
    pub template_name: Option<String>,
}

// == Braze Client ==
/// Client for the Braze template API.
#[derive(Debug, Clone)]
pub struct BrazeClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl BrazeClient {
    // == Constructor ==
    /// Creates a client sharing `http_client`'s connection pool and timeout.
    pub fn new(
        http_client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    // == Template Fetch ==
    /// Fetches template metadata for `template_id`.
    #[instrument(skip(self))]
    pub async fn fetch_template_info(&self, template_id: &str) -> Result<TemplateInfo> {
        if template_id.is_empty() {
            return Err(AppError::InvalidRequest(
                "received empty template_id".to_string(),
            ));
        }

        let url = format!("{}{}", self.base_url, TEMPLATE_INFO_PATH);
        debug!(%url, "requesting Braze template info");

        let info = self
            .http_client
            .get(&url)
            .query(&[("email_template_id", template_id)])
            .bearer_auth(&self.api_key)
            .send()
            .await?
            .error_for_status()?
            .json::<TemplateInfo>()
            .await?;

        debug!(
            template_name = info.template_name.as_deref().unwrap_or_default(),
            body_len = info.body.len(),
            "received Braze template"
        );
        Ok(info)
    }

    /// Fetches only the template body.
    pub async fn fetch_template_body(&self, template_id: &str) -> Result<String> {
        Ok(self.fetch_template_info(template_id).await?.body)
    }
}
