//! HTTP API for the dashboard
//!
//! Provides the OAuth login flow and JSON endpoints over axum:
//!
//! ```text
//! GET /api/health
//! GET /api/auth/github              → redirect to GitHub consent
//! GET /api/auth/github/callback     → redirect to {frontend}/dashboard
//! GET /api/repos                    (Bearer)
//! GET /api/repos/{owner}/{repo}     (Bearer)
//! GET /api/analysis/{owner}/{repo}  (Bearer)
//! ```
//!
//! No state is kept between requests; tokens are never stored.

mod error;
mod routes;

pub use error::ApiError;

use crate::config::{GitHubSettings, OAuthSettings, ServerSettings, UserConfig};
use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Settings shared by all handlers (read-only)
#[derive(Debug, Clone)]
pub struct AppState {
    pub github: GitHubSettings,
    pub oauth: OAuthSettings,
    pub frontend_url: String,
}

impl AppState {
    pub fn from_config(config: &UserConfig) -> Self {
        Self {
            github: config.github_settings(),
            oauth: config.oauth_settings(),
            frontend_url: config.server_settings().frontend_url,
        }
    }
}

pub fn build_router(state: AppState) -> Result<Router> {
    let origin = HeaderValue::from_str(state.frontend_url.trim_end_matches('/'))
        .with_context(|| format!("Invalid frontend URL '{}'", state.frontend_url))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    let router = Router::new()
        .route("/", get(routes::root))
        .route("/api/health", get(routes::health))
        .route("/api/auth/github", get(routes::github_login))
        .route("/api/auth/github/callback", get(routes::github_callback))
        .route("/api/repos", get(routes::list_repos))
        .route("/api/repos/{owner}/{repo}", get(routes::get_repo))
        .route("/api/analysis/{owner}/{repo}", get(routes::analyze))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state));

    Ok(router)
}

/// Serve on an already-bound listener until `shutdown` is cancelled
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: CancellationToken,
) -> Result<()> {
    let router = build_router(state)?;
    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;
    Ok(())
}

/// Bind and serve until Ctrl-C
pub async fn run_server(settings: &ServerSettings, state: AppState) -> Result<()> {
    if state.oauth.client_id.is_none() {
        tracing::warn!("GITHUB_CLIENT_ID is not set; /api/auth/github will fail");
    }

    let listener = TcpListener::bind((settings.host.as_str(), settings.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", settings.host, settings.port))?;
    let addr = listener.local_addr()?;

    info!("RepoLens API listening on http://{}", addr);
    eprintln!("🚀 RepoLens API running on http://{}", addr);
    eprintln!("   Frontend: {}", state.frontend_url);

    let ct = CancellationToken::new();
    let on_signal = ct.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        on_signal.cancel();
    });

    serve(listener, state, ct).await
}
