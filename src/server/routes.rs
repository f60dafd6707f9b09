//! Route handlers
//!
//! Every data route builds its own GitHub client from the caller's bearer
//! token. Blocking GitHub calls run on tokio's blocking pool.

use super::error::ApiError;
use super::AppState;
use crate::analysis::{analyze_repository, AnalysisError};
use crate::github::{GitHubClient, GitHubError, OAuthClient, Repository};
use crate::models::{AnalysisReport, RepoRef};
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Bearer token from the Authorization header; a bare token is accepted too
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let token = match value.split_once(' ') {
        Some(("Bearer", rest)) => rest.trim(),
        _ if value == "Bearer" => "",
        _ => value,
    };
    (!token.is_empty()).then(|| token.to_string())
}

fn repo_from_path(owner: &str, repo: &str) -> Result<RepoRef, ApiError> {
    format!("{}/{}", owner, repo)
        .parse()
        .map_err(|_| ApiError::BadRequest("Invalid repository"))
}

async fn github_call<T, F>(state: &AppState, token: String, call: F) -> Result<T, GitHubError>
where
    T: Send + 'static,
    F: FnOnce(&GitHubClient) -> Result<T, GitHubError> + Send + 'static,
{
    let settings = state.github.clone();
    tokio::task::spawn_blocking(move || call(&GitHubClient::new(settings, token)))
        .await
        .map_err(|e| GitHubError::Transport(e.to_string()))?
}

pub async fn root() -> &'static str {
    "RepoLens API is running"
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "RepoLens API is running" }))
}

pub async fn list_repos(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Repository>>, ApiError> {
    let token = bearer_token(&headers).ok_or(ApiError::NoToken)?;
    github_call(&state, token, |client| client.list_repositories())
        .await
        .map(Json)
        .map_err(|e| ApiError::upstream("Failed to fetch repositories", e))
}

pub async fn get_repo(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((owner, repo)): Path<(String, String)>,
) -> Result<Json<Repository>, ApiError> {
    let token = bearer_token(&headers).ok_or(ApiError::NoToken)?;
    let repo = repo_from_path(&owner, &repo)?;
    github_call(&state, token, move |client| client.repository(&repo))
        .await
        .map(Json)
        .map_err(|e| ApiError::upstream("Failed to fetch repository", e))
}

/// Dropping this future (client disconnect) drops the join over all three
/// extractors at once.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((owner, repo)): Path<(String, String)>,
) -> Result<Json<AnalysisReport>, ApiError> {
    let token = bearer_token(&headers).ok_or(ApiError::NoToken)?;
    let repo = repo_from_path(&owner, &repo)?;

    let cancel = CancellationToken::new();
    match analyze_repository(&state.github, &repo, Some(token.as_str()), &cancel).await {
        Ok(report) => Ok(Json(report)),
        Err(AnalysisError::MissingCredential) => Err(ApiError::NoToken),
        Err(e) => Err(ApiError::upstream("Analysis failed", format!("{}: {}", repo, e))),
    }
}

pub async fn github_login(State(state): State<Arc<AppState>>) -> Result<Redirect, ApiError> {
    let oauth_state = uuid::Uuid::new_v4().to_string();
    let url = OAuthClient::new(state.oauth.clone())
        .authorize_url(&oauth_state)
        .map_err(|e| ApiError::upstream("GitHub OAuth is not configured", e))?;
    Ok(Redirect::temporary(&url))
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    code: Option<String>,
}

pub async fn github_callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Response {
    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "No code").into_response();
    };

    let oauth = state.oauth.clone();
    let github = state.github.clone();
    let outcome = tokio::task::spawn_blocking(move || -> anyhow::Result<(String, String)> {
        let token = OAuthClient::new(oauth).exchange_code(&code)?;
        let user = GitHubClient::new(github, token.clone()).current_user()?;
        Ok((user.login, token))
    })
    .await;

    match outcome {
        Ok(Ok((login, token))) => {
            info!("OAuth login for {}", login);
            let url = dashboard_url(&state.frontend_url, &login, &token);
            Redirect::temporary(&url).into_response()
        }
        Ok(Err(e)) => {
            warn!("GitHub OAuth failed: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "GitHub OAuth failed").into_response()
        }
        Err(e) => {
            warn!("GitHub OAuth task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "GitHub OAuth failed").into_response()
        }
    }
}

/// Post-login landing page. The dashboard reads `username` and `token` from
/// the query string.
fn dashboard_url(frontend_url: &str, login: &str, token: &str) -> String {
    format!(
        "{}/dashboard?username={}&token={}",
        frontend_url.trim_end_matches('/'),
        urlencoding::encode(login),
        urlencoding::encode(token)
    )
}
