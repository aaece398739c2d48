//! API Handlers
//!
//! HTTP request handlers for each listener endpoint.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, HeaderName, HeaderValue},
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use tracing::{debug, error, info, warn};

use super::guards::verify_webhook_secret;
use crate::cache::StringsCache;
use crate::clients::{build_http_client, BrazeClient, LokaliseClient};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{
    flatten_params, HealthResponse, ParseTemplateForm, ParseTemplateResponse, StatsResponse,
    TaskCompletedResponse, TaskCompletedWebhook,
};
use crate::templates::{extract, render_defaults, ExtractedStrings, TemplateStringStore};

/// Marks connected-content responses served from the cache
pub const FROM_CACHE_HEADER: HeaderName = HeaderName::from_static("x-from-cache");

const TEMPLATE_UPLOAD_PAGE: &str = include_str!("../../static/braze/template_upload.html");

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Connected-content response cache
    pub cache: Arc<StringsCache>,
    /// Strings extracted per Braze template
    pub templates: Arc<TemplateStringStore>,
    /// Braze template API
    pub braze: BrazeClient,
    /// Lokalise project API
    pub lokalise: LokaliseClient,
    /// Expected `x-secret` on Lokalise webhooks
    pub webhook_secret: Option<String>,
    /// Expected `X-Secret-Token` on connected-content requests
    pub api_auth_secret: Option<String>,
}

impl AppState {
    /// Creates a new AppState around the given cache and upstream clients.
    ///
    /// Both secrets start unset; see the `with_*` builders.
    pub fn new(cache: StringsCache, braze: BrazeClient, lokalise: LokaliseClient) -> Self {
        Self {
            cache: Arc::new(cache),
            templates: Arc::new(TemplateStringStore::new()),
            braze,
            lokalise,
            webhook_secret: None,
            api_auth_secret: None,
        }
    }

    /// Sets the Lokalise webhook secret.
    pub fn with_webhook_secret(mut self, secret: impl Into<String>) -> Self {
        self.webhook_secret = Some(secret.into());
        self
    }

    /// Sets the connected-content API secret.
    pub fn with_api_auth_secret(mut self, secret: impl Into<String>) -> Self {
        self.api_auth_secret = Some(secret.into());
        self
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http_client = build_http_client(config.upstream_timeout())?;
        let braze = BrazeClient::new(
            http_client.clone(),
            config.braze_url.clone(),
            config.braze_api_key.clone(),
        );
        let lokalise = LokaliseClient::new(
            http_client,
            config.lokalise_url.clone(),
            config.lokalise_api_token.clone(),
        );

        let mut state = Self::new(StringsCache::new(config.cache_ttl()), braze, lokalise);
        state.webhook_secret = config.lokalise_webhook_secret.clone();
        state.api_auth_secret = config.api_auth_secret.clone();
        Ok(state)
    }
}

/// Handler for POST /api/v1/taskComplete
///
/// Lokalise calls this when a translation task closes; the project is then
/// exported to GitHub as a pull request.
pub async fn task_completed_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<TaskCompletedResponse>> {
    verify_webhook_secret(&headers, state.webhook_secret.as_deref())
        .inspect_err(|e| error!(error = %e, "unable to validate webhook secret"))?;

    let webhook: TaskCompletedWebhook = serde_json::from_slice(&body).map_err(|e| {
        error!(error = %e, "failed to unmarshal webhook body");
        AppError::InvalidRequest(format!("invalid webhook body: {}", e))
    })?;

    if let Some(error_msg) = webhook.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let project_id = webhook.project.id;
    info!(
        %project_id,
        event = webhook.event.as_deref().unwrap_or_default(),
        "translation task completed"
    );

    state
        .lokalise
        .create_strings_pull_request(&project_id)
        .await
        .inspect_err(|e| error!(error = %e, %project_id, "failed to create strings pull request"))?;

    Ok(Json(TaskCompletedResponse::triggered(project_id)))
}

/// Handler for POST /api/v1/braze/parse_template
///
/// Fetches a Braze template, extracts its strings and remembers them for
/// connected-content requests.
pub async fn parse_template_handler(
    State(state): State<AppState>,
    Form(form): Form<ParseTemplateForm>,
) -> Result<Json<ParseTemplateResponse>> {
    if let Some(error_msg) = form.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let template_id = form.template_id.trim();
    debug!(template_id, "received parse template request");

    let strings = load_template_strings(&state, template_id).await?;
    info!(template_id, count = strings.len(), "parsed template strings");

    Ok(Json(ParseTemplateResponse::new(template_id, strings)))
}

/// Handler for GET /api/v1/strings/braze
pub async fn strings_query_handler(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response> {
    serve_strings(&state, pairs).await
}

/// Handler for POST /api/v1/strings/braze
pub async fn strings_form_handler(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response> {
    serve_strings(&state, pairs).await
}

/// Answers a Braze connected-content request with the template's strings.
///
/// Responses are cached per parameter combination; a hit refreshes the
/// entry's lifetime and is flagged with `X-From-Cache: 1`. A miss always
/// refetches the template, the last extraction is only used while Braze is
/// unreachable.
async fn serve_strings(state: &AppState, pairs: Vec<(String, String)>) -> Result<Response> {
    let params = flatten_params(pairs)?;
    let template_id = params
        .get("template_id")
        .filter(|id| !id.is_empty())
        .cloned()
        .ok_or_else(|| AppError::InvalidRequest("template_id is required".to_string()))?;

    let key = StringsCache::compute_key(&params)?;

    if let Some(entry) = state.cache.get(&key) {
        state.cache.touch(&key);
        debug!(%key, "cache hit");
        return Ok(json_bytes_response(entry.data, true));
    }
    debug!(%key, "cache miss");

    let strings = match load_template_strings(state, &template_id).await {
        Ok(strings) => strings,
        Err(err @ AppError::Upstream(_)) => match state.templates.get(&template_id) {
            Some(strings) => {
                warn!(error = %err, %template_id, "Braze unavailable, serving last extracted strings");
                strings
            }
            None => return Err(err),
        },
        Err(err) => return Err(err),
    };

    let rendered = render_defaults(&strings, &params);
    let data = serde_json::to_vec(&rendered)
        .map_err(|e| AppError::Internal(format!("failed to serialize strings: {}", e)))?;

    state.cache.store(key, data.clone());
    Ok(json_bytes_response(data, false))
}

/// Fetches, extracts and stores the strings of a Braze template.
async fn load_template_strings(state: &AppState, template_id: &str) -> Result<ExtractedStrings> {
    let body = state
        .braze
        .fetch_template_body(template_id)
        .await
        .inspect_err(|e| error!(error = %e, template_id, "failed to fetch Braze template"))?;

    let strings =
        extract(&body).inspect_err(|e| error!(error = %e, template_id, "failed to parse template"))?;

    state.templates.insert(template_id, strings.clone());
    Ok(strings)
}

fn json_bytes_response(data: Vec<u8>, from_cache: bool) -> Response {
    let mut response = ([(header::CONTENT_TYPE, "application/json")], data).into_response();
    if from_cache {
        response
            .headers_mut()
            .insert(FROM_CACHE_HEADER, HeaderValue::from_static("1"));
    }
    response
}

/// Handler for GET /braze/template_upload
pub async fn template_upload_handler() -> Html<&'static str> {
    Html(TEMPLATE_UPLOAD_PAGE)
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(&state.cache.stats(), state.templates.len()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
