//! API Routes
//!
//! Configures the Axum router with all listener endpoints.

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, Request},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::info_span;

use super::guards::{reject_directory_paths, require_api_secret};
use super::handlers::{
    health_handler, parse_template_handler, stats_handler, strings_form_handler,
    strings_query_handler, task_completed_handler, template_upload_handler, AppState,
};

/// Header carrying the per-request identifier
pub const REQUEST_ID_HEADER: &str = "x-unique-request-id";

const HSTS_VALUE: &str = "max-age=63072000; includeSubDomains";

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /api/v1/taskComplete` - Lokalise task completed webhook
/// - `POST /api/v1/braze/parse_template` - Extract strings from a Braze template
/// - `GET|POST /api/v1/strings/braze` - Braze connected content
/// - `GET /braze/template_upload` - Template upload form
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - Request id: generated per request and echoed on the response
/// - Tracing: one span per request, tagged with the request id
/// - CORS: Allows any origin
/// - HSTS header on every response
/// - Directory-style paths answered with 404
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        let request_id = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");
        info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id
        )
    });

    let connected_content = Router::new()
        .route(
            "/api/v1/strings/braze",
            get(strings_query_handler).post(strings_form_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_secret,
        ));

    Router::new()
        .route("/api/v1/taskComplete", post(task_completed_handler))
        .route("/api/v1/braze/parse_template", post(parse_template_handler))
        .route("/braze/template_upload", get(template_upload_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .merge(connected_content)
        .layer(middleware::from_fn(reject_directory_paths))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static(HSTS_VALUE),
        ))
        .layer(cors)
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(trace)
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .with_state(state)
}
