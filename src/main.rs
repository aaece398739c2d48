//! Lokalise Listener - Braze/Lokalise localization bridge
//!
//! Receives Lokalise webhooks, extracts localizable strings from Braze email
//! templates and serves them to Braze connected content.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use lokalise_listener::api::create_router;
use lokalise_listener::config::LogFormat;
use lokalise_listener::tls::{load_server_config, serve_tls};
use lokalise_listener::{spawn_eviction_task, AppState, Config};

/// Main entry point for the listener.
///
/// # Startup Sequence
/// 1. Load configuration from environment variables
/// 2. Initialize tracing subscriber for logging
/// 3. Create the strings cache and upstream clients
/// 4. Start background cache eviction task
/// 5. Create Axum router with all endpoints
/// 6. Start the server on the configured port, HTTPS when a certificate is configured
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_tracing(config.log_format);

    info!("Starting Lokalise Listener");
    info!(
        port = config.server_port,
        cache_ttl_secs = config.cache_ttl,
        eviction_interval_secs = config.eviction_interval,
        upstream_timeout_secs = config.upstream_timeout,
        "Configuration loaded"
    );
    if config.lokalise_webhook_secret.is_none() {
        warn!("LOKALISE_WEBHOOK_SECRET is not set, webhooks will be rejected");
    }
    if config.api_auth_secret.is_none() {
        warn!("API_AUTHENTICATION_SECRET is not set, connected content is unauthenticated");
    }

    let state = AppState::from_config(&config).context("failed to build application state")?;
    info!("Strings cache initialized");

    let eviction_handle = spawn_eviction_task(state.cache.clone(), config.eviction_interval());
    info!("Background eviction task started");

    let app = create_router(state);

    let tls_config = match config.tls_paths() {
        Some((cert_path, key_path)) => Some(
            load_server_config(cert_path, key_path).context("failed to load TLS certificate")?,
        ),
        None => {
            if config.tls_certificate_path.is_some() || config.tls_private_key_path.is_some() {
                warn!("Only one of TLS_CERTIFICATE_PATH and TLS_PRIVATE_KEY_PATH is set, serving plain HTTP");
            }
            None
        }
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    match tls_config {
        Some(tls_config) => {
            info!("Server listening on https://{}", addr);
            serve_tls(listener, tls_config, app, shutdown_signal(eviction_handle)).await;
        }
        None => {
            info!("Server listening on http://{}", addr);
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal(eviction_handle))
                .await
                .context("http server failed")?;
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Installs the global subscriber: JSON lines or human-readable text.
///
/// Defaults to "info" level, can be overridden with RUST_LOG env var.
fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "lokalise_listener=info,tower_http=info".into());

    let fmt_layer = match format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the eviction task and allows graceful shutdown.
async fn shutdown_signal(eviction_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    eviction_handle.abort();
    warn!("Eviction task aborted");
}
