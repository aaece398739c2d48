//! Lokalise REST client.
//!
//! Triggers a `strings` file export with the GitHub integration, which makes
//! Lokalise open a pull request with the finished translations.

use reqwest::Url;
use serde::Serialize;
use tracing::{info, instrument};

use crate::error::{AppError, Result};

// == Request Body ==
#[derive(Debug, Serialize)]
struct DownloadRequest<'a> {
    format: &'a str,
    triggers: [&'a str; 1],
}

// == Lokalise Client ==
/// Client for the Lokalise project API.
#[derive(Debug, Clone)]
pub struct LokaliseClient {
    http_client: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl LokaliseClient {
    // == Constructor ==
    /// Creates a client sharing `http_client`'s connection pool and timeout.
    pub fn new(
        http_client: reqwest::Client,
        base_url: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: api_token.into(),
        }
    }

    // == Strings Export ==
    /// Asks Lokalise to export `project_id` and push it to GitHub.
    #[instrument(skip(self))]
    pub async fn create_strings_pull_request(&self, project_id: &str) -> Result<()> {
        let url = self.download_url(project_id)?;
        let body = DownloadRequest {
            format: "strings",
            triggers: ["github"],
        };

        let response = self
            .http_client
            .post(url)
            .header("x-api-token", &self.api_token)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        info!(status = %response.status(), "triggered Lokalise strings export");
        Ok(())
    }

    /// Builds `{base}/api2/projects/{project_id}/files/download`.
    ///
    /// The project id is a single percent-encoded path segment.
    fn download_url(&self, project_id: &str) -> Result<Url> {
        if project_id.is_empty() || project_id == "." || project_id == ".." {
            return Err(AppError::InvalidRequest(format!(
                "invalid project id {:?}",
                project_id
            )));
        }

        let mut url = Url::parse(&self.base_url)
            .map_err(|e| AppError::Internal(format!("invalid Lokalise API URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Internal("Lokalise API URL cannot have a path".to_string()))?
            .pop_if_empty()
            .extend(["api2", "projects", project_id, "files", "download"]);
        Ok(url)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> LokaliseClient {
        LokaliseClient::new(reqwest::Client::new(), base_url, "token")
    }

    #[test]
    fn test_download_request_shape() {
        let body = DownloadRequest {
            format: "strings",
            triggers: ["github"],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"format": "strings", "triggers": ["github"]})
        );
    }

    #[test]
    fn test_download_url() {
        let url = client("https://api.lokalise.test/").download_url("123.abc").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.lokalise.test/api2/projects/123.abc/files/download"
        );
    }

    #[test]
    fn test_download_url_keeps_base_path() {
        let url = client("http://127.0.0.1:9/proxy").download_url("1").unwrap();
        assert_eq!(url.path(), "/proxy/api2/projects/1/files/download");
    }

    #[test]
    fn test_download_url_encodes_project_id() {
        let url = client("http://127.0.0.1:9")
            .download_url("a/b?c#d")
            .unwrap();
        assert_eq!(url.path(), "/api2/projects/a%2Fb%3Fc%23d/files/download");
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());
    }

    #[test]
    fn test_download_url_rejects_dot_segments() {
        for project_id in ["", ".", ".."] {
            let result = client("http://127.0.0.1:9").download_url(project_id);
            assert!(matches!(result, Err(AppError::InvalidRequest(_))));
        }
    }

    #[tokio::test]
    async fn test_empty_project_id_rejected() {
        let result = client("http://127.0.0.1:9").create_strings_pull_request("").await;
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }
}
