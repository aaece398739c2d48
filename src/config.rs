//! Configuration Module
//!
//! Handles loading and managing listener configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::DEFAULT_TTL_SECS;

/// Default Lokalise API base URL
pub const DEFAULT_LOKALISE_URL: &str = "https://api.lokalise.com";

/// Default Braze REST endpoint
pub const DEFAULT_BRAZE_URL: &str = "https://rest.iad-01.braze.com";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line
    Json,
    /// Human-readable text
    Pretty,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

/// Listener configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Lifetime of a cached connected-content response, in seconds
    pub cache_ttl: u64,
    /// Interval between cache sweeps, in seconds
    pub eviction_interval: u64,
    /// Timeout applied to every upstream request, in seconds
    pub upstream_timeout: u64,
    /// Lokalise API base URL
    pub lokalise_url: String,
    /// Shared secret Lokalise sends in the `x-secret` header
    pub lokalise_webhook_secret: Option<String>,
    /// Read-only Lokalise API token
    pub lokalise_api_token: String,
    /// Braze REST base URL
    pub braze_url: String,
    /// Braze API key with template read access
    pub braze_api_key: String,
    /// Secret expected in `X-Secret-Token` on the connected-content endpoint
    pub api_auth_secret: Option<String>,
    /// PEM certificate chain; HTTPS is served when set with the key
    pub tls_certificate_path: Option<String>,
    /// PEM private key matching the certificate
    pub tls_private_key_path: Option<String>,
    /// Log output format
    pub log_format: LogFormat,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first when present.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `STRINGS_CACHE_TTL` - Cache TTL in seconds (default: 5)
    /// - `EVICTION_INTERVAL` - Sweep frequency in seconds (default: the TTL)
    /// - `UPSTREAM_TIMEOUT` - Upstream request timeout in seconds (default: 10)
    /// - `LOKALISE_API_URL`, `LOKALISE_WEBHOOK_SECRET`, `LOKALISE_READ_ONLY_API_TOKEN`
    /// - `BRAZE_API_URL`, `BRAZE_TEMPLATE_API_KEY`
    /// - `API_AUTHENTICATION_SECRET` - connected-content secret (default: unset)
    /// - `TLS_CERTIFICATE_PATH`, `TLS_PRIVATE_KEY_PATH` - serve HTTPS when both
    ///   are set, plain HTTP otherwise (default: unset)
    /// - `LOG_FORMAT` - `json` or `pretty` (default: json)
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let defaults = Self::default();
        let cache_ttl = parse_var("STRINGS_CACHE_TTL").unwrap_or(defaults.cache_ttl);

        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cache_ttl,
            eviction_interval: parse_var("EVICTION_INTERVAL").unwrap_or(cache_ttl),
            upstream_timeout: parse_var("UPSTREAM_TIMEOUT").unwrap_or(defaults.upstream_timeout),
            lokalise_url: non_empty_var("LOKALISE_API_URL").unwrap_or(defaults.lokalise_url),
            lokalise_webhook_secret: non_empty_var("LOKALISE_WEBHOOK_SECRET"),
            lokalise_api_token: env::var("LOKALISE_READ_ONLY_API_TOKEN").unwrap_or_default(),
            braze_url: non_empty_var("BRAZE_API_URL").unwrap_or(defaults.braze_url),
            braze_api_key: env::var("BRAZE_TEMPLATE_API_KEY").unwrap_or_default(),
            api_auth_secret: non_empty_var("API_AUTHENTICATION_SECRET"),
            tls_certificate_path: non_empty_var("TLS_CERTIFICATE_PATH"),
            tls_private_key_path: non_empty_var("TLS_PRIVATE_KEY_PATH"),
            log_format: env::var("LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or(defaults.log_format),
        }
    }

    /// Cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    /// Sweep interval as a Duration.
    pub fn eviction_interval(&self) -> Duration {
        Duration::from_secs(self.eviction_interval)
    }

    /// Upstream timeout as a Duration.
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout)
    }

    /// Certificate and key paths, only when both are configured.
    pub fn tls_paths(&self) -> Option<(&str, &str)> {
        match (
            self.tls_certificate_path.as_deref(),
            self.tls_private_key_path.as_deref(),
        ) {
            (Some(cert), Some(key)) => Some((cert, key)),
            _ => None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cache_ttl: DEFAULT_TTL_SECS,
            eviction_interval: DEFAULT_TTL_SECS,
            upstream_timeout: 10,
            lokalise_url: DEFAULT_LOKALISE_URL.to_string(),
            lokalise_webhook_secret: None,
            lokalise_api_token: String::new(),
            braze_url: DEFAULT_BRAZE_URL.to_string(),
            braze_api_key: String::new(),
            api_auth_secret: None,
            tls_certificate_path: None,
            tls_private_key_path: None,
            log_format: LogFormat::Json,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}
