//! HTTP API contract tests
//!
//! Runs the RepoLens API against a local stand-in for api.github.com and
//! checks status codes, bodies and redirects the dashboard depends on.

use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use repolens::config::{GitHubSettings, OAuthSettings};
use repolens::server::{serve, AppState};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

const TOKEN: &str = "gho_test";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TOKEN))
        .unwrap_or(false)
}

fn unauthorized() -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "Bad credentials"})),
    )
        .into_response()
}

async fn fake_tree(headers: HeaderMap) -> axum::response::Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({
        "sha": "abc",
        "truncated": false,
        "tree": [
            {"path": "src", "type": "tree"},
            {"path": "src/a.go", "type": "blob", "size": 100},
            {"path": "src/b.go", "type": "blob", "size": 200},
            {"path": "web/c.ts", "type": "blob", "size": 300},
            {"path": "assets/big.bin", "type": "blob", "size": 600000},
            {"path": "README", "type": "blob", "size": 50}
        ]
    }))
    .into_response()
}

async fn fake_languages(
    headers: HeaderMap,
    Path((owner, _repo)): Path<(String, String)>,
) -> axum::response::Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if owner == "limited" {
        return (
            StatusCode::FORBIDDEN,
            [("x-ratelimit-remaining", "0"), ("x-ratelimit-reset", "1700000000")],
            Json(json!({"message": "API rate limit exceeded"})),
        )
            .into_response();
    }
    Json(json!({"Go": 80, "TypeScript": 20})).into_response()
}

async fn fake_commits(headers: HeaderMap) -> axum::response::Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!([
        {"sha": "3", "commit": {"author": {"name": "A", "date": "2024-01-01T10:00:00Z"}}},
        {"sha": "2", "commit": {"author": {"name": "A", "date": "2024-01-01T09:00:00Z"}}},
        {"sha": "1", "commit": {"author": {"name": "B", "date": "2024-01-02T12:00:00Z"}}}
    ]))
    .into_response()
}

async fn fake_repo(
    headers: HeaderMap,
    Path((owner, repo)): Path<(String, String)>,
) -> axum::response::Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let full_name = format!("{}/{}", owner, repo);
    Json(json!({
        "id": 7,
        "name": repo,
        "full_name": full_name,
        "stargazers_count": 5,
        "owner": {"login": owner}
    }))
    .into_response()
}

async fn fake_user(headers: HeaderMap) -> axum::response::Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({"login": "octo", "id": 1})).into_response()
}

async fn fake_user_repos(headers: HeaderMap) -> axum::response::Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!([
        {"id": 1, "name": "demo", "full_name": "octo/demo", "owner": {"login": "octo"}}
    ]))
    .into_response()
}

async fn fake_token_exchange(Json(body): Json<Value>) -> Json<Value> {
    if body["code"] == "good-code" {
        Json(json!({"access_token": TOKEN, "token_type": "bearer"}))
    } else {
        Json(json!({"error": "bad_verification_code"}))
    }
}

fn fake_github() -> Router {
    Router::new()
        .route("/user", get(fake_user))
        .route("/user/repos", get(fake_user_repos))
        .route("/repos/{owner}/{repo}", get(fake_repo))
        .route("/repos/{owner}/{repo}/git/trees/HEAD", get(fake_tree))
        .route("/repos/{owner}/{repo}/languages", get(fake_languages))
        .route("/repos/{owner}/{repo}/commits", get(fake_commits))
        .route("/login/oauth/access_token", post(fake_token_exchange))
}

async fn spawn_router(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Start a stand-in GitHub and a RepoLens API pointed at it
async fn start() -> (String, CancellationToken) {
    let github_url = spawn_router(fake_github()).await;

    let state = AppState {
        github: GitHubSettings {
            api_url: github_url.clone(),
            timeout: Duration::from_secs(5),
            ..Default::default()
        },
        oauth: OAuthSettings {
            client_id: Some("client-1".to_string()),
            client_secret: Some("secret-1".to_string()),
            callback_url: Some("http://localhost:3001/api/auth/github/callback".to_string()),
            token_url: format!("{}/login/oauth/access_token", github_url),
            timeout: Duration::from_secs(5),
            ..Default::default()
        },
        frontend_url: "http://localhost:5173".to_string(),
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = CancellationToken::new();
    let stop = shutdown.clone();
    tokio::spawn(async move {
        serve(listener, state, stop).await.unwrap();
    });
    (format!("http://{}", addr), shutdown)
}

struct Reply {
    status: u16,
    location: Option<String>,
    body: String,
}

/// GET without following redirects
async fn fetch(url: String, token: Option<&'static str>) -> Reply {
    tokio::task::spawn_blocking(move || {
        let agent = ureq::config::Config::builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .build()
            .new_agent();
        let mut request = agent.get(&url);
        if let Some(token) = token {
            request = request.header("Authorization", &format!("Bearer {}", token));
        }
        let response = request.call().expect("request failed");
        let status = response.status().as_u16();
        let location = response
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.into_body().read_to_string().unwrap_or_default();
        Reply {
            status,
            location,
            body,
        }
    })
    .await
    .unwrap()
}

fn json_body(reply: &Reply) -> Value {
    serde_json::from_str(&reply.body).expect("Invalid JSON")
}

#[tokio::test(flavor = "multi_thread")]
async fn test_health() {
    let (base, shutdown) = start().await;
    let reply = fetch(format!("{}/api/health", base), None).await;
    assert_eq!(reply.status, 200);
    assert_eq!(
        json_body(&reply),
        json!({"status": "ok", "message": "RepoLens API is running"})
    );
    shutdown.cancel();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_analysis_end_to_end() {
    let (base, shutdown) = start().await;
    let reply = fetch(format!("{}/api/analysis/octo/demo", base), Some(TOKEN)).await;
    assert_eq!(reply.status, 200, "body: {}", reply.body);

    let report = json_body(&reply);
    assert_eq!(report["healthScore"], 16);
    assert_eq!(report["fileAnalysis"]["totalFiles"], 5);
    assert_eq!(report["fileAnalysis"]["totalLines"], 0);
    assert_eq!(report["fileAnalysis"]["largestFiles"][0]["size"], 600000);
    assert_eq!(report["fileAnalysis"]["filesByExtension"]["no-extension"], 1);
    assert_eq!(report["languages"]["languages"]["Go"], 80);
    assert_eq!(report["languages"]["primaryLanguage"], "Go");
    assert_eq!(
        report["commits"]["commitFrequency"],
        json!([{"date": "2024-01-01", "count": 2}, {"date": "2024-01-02", "count": 1}])
    );
    assert_eq!(
        report["commits"]["topContributors"],
        json!([{"author": "A", "commits": 2}, {"author": "B", "commits": 1}])
    );
    shutdown.cancel();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_analysis_without_token_is_401() {
    let (base, shutdown) = start().await;
    let reply = fetch(format!("{}/api/analysis/octo/demo", base), None).await;
    assert_eq!(reply.status, 401);
    assert_eq!(json_body(&reply), json!({"error": "No token provided"}));

    let reply = fetch(format!("{}/api/repos", base), None).await;
    assert_eq!(reply.status, 401);
    shutdown.cancel();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_dot_segments_rejected_before_upstream() {
    let (base, shutdown) = start().await;
    let reply = fetch(format!("{}/api/analysis/%2E%2E/%2E%2E", base), Some(TOKEN)).await;
    assert_eq!(reply.status, 400);
    assert_eq!(json_body(&reply), json!({"error": "Invalid repository"}));
    shutdown.cancel();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_upstream_failure_is_generic_500() {
    let (base, shutdown) = start().await;

    let reply = fetch(format!("{}/api/analysis/limited/demo", base), Some(TOKEN)).await;
    assert_eq!(reply.status, 500);
    assert_eq!(json_body(&reply), json!({"error": "Analysis failed"}));

    let reply = fetch(format!("{}/api/analysis/octo/demo", base), Some("gho_wrong")).await;
    assert_eq!(reply.status, 500);
    assert!(!reply.body.contains("Bad credentials"));
    shutdown.cancel();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_repos_routes() {
    let (base, shutdown) = start().await;

    let reply = fetch(format!("{}/api/repos", base), Some(TOKEN)).await;
    assert_eq!(reply.status, 200);
    assert_eq!(json_body(&reply)[0]["full_name"], "octo/demo");

    let reply = fetch(format!("{}/api/repos/octo/demo", base), Some(TOKEN)).await;
    assert_eq!(reply.status, 200);
    assert_eq!(json_body(&reply)["stargazers_count"], 5);

    let reply = fetch(format!("{}/api/repos/octo/demo", base), Some("gho_wrong")).await;
    assert_eq!(reply.status, 500);
    assert_eq!(json_body(&reply), json!({"error": "Failed to fetch repository"}));
    shutdown.cancel();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_oauth_login_redirect() {
    let (base, shutdown) = start().await;
    let reply = fetch(format!("{}/api/auth/github", base), None).await;
    assert_eq!(reply.status, 307);
    let location = reply.location.expect("Location header");
    assert!(location.starts_with("https://github.com/login/oauth/authorize?client_id=client-1"));
    assert!(location.contains("state="));
    assert!(location.contains("redirect_uri="));
    shutdown.cancel();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_oauth_callback() {
    let (base, shutdown) = start().await;

    let reply = fetch(format!("{}/api/auth/github/callback", base), None).await;
    assert_eq!(reply.status, 400);
    assert_eq!(reply.body, "No code");

    let reply = fetch(
        format!("{}/api/auth/github/callback?code=good-code", base),
        None,
    )
    .await;
    assert_eq!(reply.status, 307);
    assert_eq!(
        reply.location.as_deref(),
        Some("http://localhost:5173/dashboard?username=octo&token=gho_test")
    );

    let reply = fetch(
        format!("{}/api/auth/github/callback?code=bad-code", base),
        None,
    )
    .await;
    assert_eq!(reply.status, 500);
    assert_eq!(reply.body, "GitHub OAuth failed");
    shutdown.cancel();
}
