//! Integration Tests for API Endpoints
//!
//! Drives the full router against an in-process fake of the Braze and
//! Lokalise APIs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{HeaderMap, Request, StatusCode},
    routing::{get, post},
    Json, Router,
};
use lokalise_listener::{
    api::{create_router, FROM_CACHE_HEADER},
    cache::StringsCache,
    clients::{BrazeClient, LokaliseClient},
    AppState,
};
use serde_json::{json, Value};
use tower::ServiceExt;

const WEBHOOK_SECRET: &str = "webhook-s3cret";
const BRAZE_KEY: &str = "braze-key";
const LOKALISE_TOKEN: &str = "lokalise-token";

const WELCOME_TEMPLATE: &str = r#"<html><body>
<h1>{{ strings.greeting | default:"Hello [[name]]" }}<!-- context: "greeting on homepage" --></h1>
<p>{{ strings.body | default:'Thanks for joining.' }}</p>
</body></html>"#;

// == Fake Upstream ==

#[derive(Clone)]
struct Upstream {
    template_fetches: Arc<AtomicUsize>,
    welcome_body: Arc<Mutex<String>>,
    templates_down: Arc<AtomicBool>,
    exported_projects: Arc<Mutex<Vec<String>>>,
}

impl Upstream {
    fn new() -> Self {
        Self {
            template_fetches: Arc::new(AtomicUsize::new(0)),
            welcome_body: Arc::new(Mutex::new(WELCOME_TEMPLATE.to_string())),
            templates_down: Arc::new(AtomicBool::new(false)),
            exported_projects: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn set_welcome_body(&self, body: &str) {
        *self.welcome_body.lock().unwrap() = body.to_string();
    }
}

async fn fake_template_info(
    State(upstream): State<Upstream>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    upstream.template_fetches.fetch_add(1, Ordering::SeqCst);

    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", BRAZE_KEY))
        .unwrap_or(false);
    if !authorized {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "bad key"})));
    }
    if upstream.templates_down.load(Ordering::SeqCst) {
        return (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"message": "down"})));
    }

    match query.get("email_template_id").map(String::as_str) {
        Some("welcome") => {
            let body = upstream.welcome_body.lock().unwrap().clone();
            (
                StatusCode::OK,
                Json(json!({"template_name": "Welcome", "body": body})),
            )
        }
        _ => (StatusCode::NOT_FOUND, Json(json!({"message": "not found"}))),
    }
}

async fn fake_files_download(
    State(upstream): State<Upstream>,
    Path(project_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if headers.get("x-api-token").and_then(|v| v.to_str().ok()) != Some(LOKALISE_TOKEN) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "bad token"})));
    }
    if project_id == "broken" {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({})));
    }
    assert_eq!(body, json!({"format": "strings", "triggers": ["github"]}));

    upstream.exported_projects.lock().unwrap().push(project_id.clone());
    (
        StatusCode::OK,
        Json(json!({"project_id": project_id, "bundle_url": "https://example.test/bundle.zip"})),
    )
}

async fn spawn_upstream() -> (String, Upstream) {
    let upstream = Upstream::new();
    let app = Router::new()
        .route("/templates/email/info", get(fake_template_info))
        .route("/api2/projects/:id/files/download", post(fake_files_download))
        .with_state(upstream.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), upstream)
}

// == Helper Functions ==

fn create_state(base_url: &str, ttl: Duration) -> AppState {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    AppState::new(
        StringsCache::new(ttl),
        BrazeClient::new(http_client.clone(), base_url, BRAZE_KEY),
        LokaliseClient::new(http_client, base_url, LOKALISE_TOKEN),
    )
    .with_webhook_secret(WEBHOOK_SECRET)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn form_request(uri: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

fn webhook_request(secret: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/taskComplete")
        .header("content-type", "application/json")
        .header("x-secret", secret)
        .body(Body::from(body.to_string()))
        .unwrap()
}

// == Connected Content Tests ==

#[tokio::test]
async fn test_connected_content_miss_then_hit() {
    let (base_url, upstream) = spawn_upstream().await;
    let app = create_router(create_state(&base_url, Duration::from_secs(60)));

    let first = app
        .clone()
        .oneshot(get_request("/api/v1/strings/braze?template_id=welcome&name=Ana"))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    assert!(first.headers().get(FROM_CACHE_HEADER).is_none());
    let first_json = body_to_json(first.into_body()).await;
    assert_eq!(
        first_json,
        json!({"greeting": "Hello Ana", "body": "Thanks for joining."})
    );

    let second = app
        .oneshot(get_request("/api/v1/strings/braze?template_id=welcome&name=Ana"))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(second.headers().get(FROM_CACHE_HEADER).unwrap(), "1");
    assert_eq!(body_to_json(second.into_body()).await, first_json);

    assert_eq!(upstream.template_fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_connected_content_param_order_shares_cache_entry() {
    let (base_url, _upstream) = spawn_upstream().await;
    let state = create_state(&base_url, Duration::from_secs(60));
    let app = create_router(state.clone());

    app.clone()
        .oneshot(get_request("/api/v1/strings/braze?template_id=welcome&locale=en"))
        .await
        .unwrap();
    let response = app
        .oneshot(get_request("/api/v1/strings/braze?locale=en&template_id=welcome"))
        .await
        .unwrap();

    assert_eq!(response.headers().get(FROM_CACHE_HEADER).unwrap(), "1");
    assert_eq!(state.cache.len(), 1);
}

#[tokio::test]
async fn test_connected_content_distinct_params_are_distinct_entries() {
    let (base_url, upstream) = spawn_upstream().await;
    let state = create_state(&base_url, Duration::from_secs(60));
    let app = create_router(state.clone());

    app.clone()
        .oneshot(get_request("/api/v1/strings/braze?template_id=welcome&name=Ana"))
        .await
        .unwrap();
    let response = app
        .oneshot(get_request("/api/v1/strings/braze?template_id=welcome&name=Bo"))
        .await
        .unwrap();

    assert!(response.headers().get(FROM_CACHE_HEADER).is_none());
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["greeting"], "Hello Bo");
    assert_eq!(state.cache.len(), 2);
    // Every miss goes back to Braze
    assert_eq!(upstream.template_fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_connected_content_form_post() {
    let (base_url, _upstream) = spawn_upstream().await;
    let app = create_router(create_state(&base_url, Duration::from_secs(60)));

    let response = app
        .oneshot(form_request(
            "/api/v1/strings/braze",
            "template_id=welcome&name=Ana",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["greeting"], "Hello Ana");
}

#[tokio::test]
async fn test_connected_content_duplicate_param() {
    let (base_url, _upstream) = spawn_upstream().await;
    let app = create_router(create_state(&base_url, Duration::from_secs(60)));

    let response = app
        .oneshot(get_request(
            "/api/v1/strings/braze?template_id=welcome&name=Ana&name=Bo",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("name"));
}

#[tokio::test]
async fn test_connected_content_missing_template_id() {
    let (base_url, _upstream) = spawn_upstream().await;
    let app = create_router(create_state(&base_url, Duration::from_secs(60)));

    let response = app
        .oneshot(get_request("/api/v1/strings/braze?locale=en"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_connected_content_unknown_template() {
    let (base_url, _upstream) = spawn_upstream().await;
    let state = create_state(&base_url, Duration::from_secs(60));
    let app = create_router(state.clone());

    let response = app
        .oneshot(get_request("/api/v1/strings/braze?template_id=missing"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(state.cache.is_empty());
}

#[tokio::test]
async fn test_connected_content_expired_entry_regenerated() {
    let (base_url, _upstream) = spawn_upstream().await;
    let state = create_state(&base_url, Duration::from_millis(100));
    let app = create_router(state.clone());

    app.clone()
        .oneshot(get_request("/api/v1/strings/braze?template_id=welcome"))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(state.cache.evict_expired(), 1);

    let response = app
        .oneshot(get_request("/api/v1/strings/braze?template_id=welcome"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(FROM_CACHE_HEADER).is_none());
}

#[tokio::test]
async fn test_connected_content_picks_up_template_edits_after_expiry() {
    let (base_url, upstream) = spawn_upstream().await;
    upstream.set_welcome_body(r#"{{ strings.greeting | default:"OLD" }}"#);
    let state = create_state(&base_url, Duration::from_millis(50));
    let app = create_router(state.clone());

    let before = app
        .clone()
        .oneshot(get_request("/api/v1/strings/braze?template_id=welcome"))
        .await
        .unwrap();
    assert_eq!(body_to_json(before.into_body()).await, json!({"greeting": "OLD"}));

    upstream.set_welcome_body(r#"{{ strings.greeting | default:"NEW" }}"#);
    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(state.cache.evict_expired(), 1);

    let after = app
        .oneshot(get_request("/api/v1/strings/braze?template_id=welcome"))
        .await
        .unwrap();
    assert_eq!(after.status(), StatusCode::OK);
    assert_eq!(body_to_json(after.into_body()).await, json!({"greeting": "NEW"}));
    assert_eq!(upstream.template_fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_connected_content_falls_back_while_braze_is_down() {
    let (base_url, upstream) = spawn_upstream().await;
    let state = create_state(&base_url, Duration::from_millis(50));
    let app = create_router(state.clone());

    app.clone()
        .oneshot(get_request("/api/v1/strings/braze?template_id=welcome"))
        .await
        .unwrap();

    upstream.templates_down.store(true, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(state.cache.evict_expired(), 1);

    let response = app
        .clone()
        .oneshot(get_request("/api/v1/strings/braze?template_id=welcome"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["body"], "Thanks for joining.");

    // Templates never extracted still fail
    let response = app
        .oneshot(get_request("/api/v1/strings/braze?template_id=other"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_connected_content_api_secret() {
    let (base_url, _upstream) = spawn_upstream().await;
    let state = create_state(&base_url, Duration::from_secs(60)).with_api_auth_secret("api-s3cret");
    let app = create_router(state);

    let denied = app
        .clone()
        .oneshot(get_request("/api/v1/strings/braze?template_id=welcome"))
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::NOT_FOUND);

    let allowed = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/strings/braze?template_id=welcome")
                .header("x-secret-token", "api-s3cret")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(allowed.status(), StatusCode::OK);
}

// == Parse Template Tests ==

#[tokio::test]
async fn test_parse_template_success() {
    let (base_url, upstream) = spawn_upstream().await;
    let state = create_state(&base_url, Duration::from_secs(60));
    let app = create_router(state.clone());

    let response = app
        .clone()
        .oneshot(form_request(
            "/api/v1/braze/parse_template",
            "template_id=welcome",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["template_id"], "welcome");
    assert_eq!(json["strings"]["greeting"]["default"], "Hello {{name}}");
    assert_eq!(json["strings"]["greeting"]["context"], "greeting on homepage");
    assert_eq!(json["strings"]["body"]["default"], "Thanks for joining.");
    assert!(json["strings"]["body"].get("context").is_none());

    assert_eq!(upstream.template_fetches.load(Ordering::SeqCst), 1);
    assert_eq!(state.templates.len(), 1);
}

#[tokio::test]
async fn test_parse_template_empty_id() {
    let (base_url, upstream) = spawn_upstream().await;
    let app = create_router(create_state(&base_url, Duration::from_secs(60)));

    let response = app
        .oneshot(form_request("/api/v1/braze/parse_template", "template_id="))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(upstream.template_fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_parse_template_upstream_not_found() {
    let (base_url, _upstream) = spawn_upstream().await;
    let app = create_router(create_state(&base_url, Duration::from_secs(60)));

    let response = app
        .oneshot(form_request(
            "/api/v1/braze/parse_template",
            "template_id=missing",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_to_json(response.into_body()).await;
    assert!(json.get("error").is_some());
}

// == Webhook Tests ==

#[tokio::test]
async fn test_webhook_triggers_export() {
    let (base_url, upstream) = spawn_upstream().await;
    let app = create_router(create_state(&base_url, Duration::from_secs(60)));

    let response = app
        .oneshot(webhook_request(
            WEBHOOK_SECRET,
            json!({"event": "project.task.closed", "project": {"id": "123.abc", "name": "Web"}}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["project_id"], "123.abc");
    assert_eq!(json["status"], "triggered");
    assert_eq!(*upstream.exported_projects.lock().unwrap(), vec!["123.abc".to_string()]);
}

#[tokio::test]
async fn test_webhook_project_id_stays_one_path_segment() {
    let (base_url, upstream) = spawn_upstream().await;
    let app = create_router(create_state(&base_url, Duration::from_secs(60)));

    let response = app
        .oneshot(webhook_request(
            WEBHOOK_SECRET,
            json!({"project": {"id": "team/web?x=1"}}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        *upstream.exported_projects.lock().unwrap(),
        vec!["team/web?x=1".to_string()]
    );
}

#[tokio::test]
async fn test_webhook_wrong_secret() {
    let (base_url, upstream) = spawn_upstream().await;
    let app = create_router(create_state(&base_url, Duration::from_secs(60)));

    let response = app
        .oneshot(webhook_request("nope", json!({"project": {"id": "123.abc"}})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(upstream.exported_projects.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_webhook_missing_project_id() {
    let (base_url, upstream) = spawn_upstream().await;
    let app = create_router(create_state(&base_url, Duration::from_secs(60)));

    let response = app
        .oneshot(webhook_request(WEBHOOK_SECRET, json!({"event": "project.task.closed"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(upstream.exported_projects.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_webhook_invalid_json() {
    let (base_url, _upstream) = spawn_upstream().await;
    let app = create_router(create_state(&base_url, Duration::from_secs(60)));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/taskComplete")
                .header("x-secret", WEBHOOK_SECRET)
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_webhook_upstream_failure() {
    let (base_url, _upstream) = spawn_upstream().await;
    let app = create_router(create_state(&base_url, Duration::from_secs(60)));

    let response = app
        .oneshot(webhook_request(WEBHOOK_SECRET, json!({"project": {"id": "broken"}})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

// == Stats Tests ==

#[tokio::test]
async fn test_stats_reflect_cache_usage() {
    let (base_url, _upstream) = spawn_upstream().await;
    let app = create_router(create_state(&base_url, Duration::from_secs(60)));

    for _ in 0..3 {
        app.clone()
            .oneshot(get_request("/api/v1/strings/braze?template_id=welcome"))
            .await
            .unwrap();
    }

    let response = app.oneshot(get_request("/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["hits"], 2);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["total_entries"], 1);
    assert_eq!(json["templates"], 1);
}
