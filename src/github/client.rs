//! GitHub REST API client
//!
//! Uses ureq (sync HTTP). One client is built per request from the caller's
//! credential; nothing is shared between clients.

use super::types::{CommitItem, GitHubUser, GitTree, Repository};
use super::{GitHubError, GitHubResult, RepositorySource};
use crate::config::GitHubSettings;
use crate::models::{CommitRecord, LanguageBytes, RepoRef, TreeEntry};
use chrono::{DateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

const API_VERSION: &str = "2022-11-28";

/// Authenticated GitHub API client
pub struct GitHubClient {
    settings: GitHubSettings,
    token: String,
    agent: ureq::Agent,
}

pub(crate) fn make_agent(timeout: Duration) -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false) // Status codes are mapped to GitHubError below
        .timeout_global(Some(timeout))
        .build()
        .new_agent()
}

impl GitHubClient {
    pub fn new(settings: GitHubSettings, token: impl Into<String>) -> Self {
        let agent = make_agent(settings.timeout);
        Self {
            settings,
            token: token.into(),
            agent,
        }
    }

    /// The authenticated user (GET /user)
    pub fn current_user(&self) -> GitHubResult<GitHubUser> {
        self.get_json("/user", &[])
    }

    /// Repositories of the authenticated user, most recently updated first.
    /// First page only (up to 100).
    pub fn list_repositories(&self) -> GitHubResult<Vec<Repository>> {
        self.get_json("/user/repos", &[("sort", "updated"), ("per_page", "100")])
    }

    pub fn repository(&self, repo: &RepoRef) -> GitHubResult<Repository> {
        self.get_json(&repo_path(repo, ""), &[])
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.api_url.trim_end_matches('/'), path)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> GitHubResult<T> {
        debug!("GET {}", path);

        let mut request = self
            .agent
            .get(&self.url(path))
            .header("Authorization", &format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .header("User-Agent", &self.settings.user_agent);
        for (key, value) in query {
            request = request.query(*key, *value);
        }

        let response = request
            .call()
            .map_err(|e| GitHubError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        if status >= 400 {
            let header = |name: &str| {
                response
                    .headers()
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            };
            let remaining = header("x-ratelimit-remaining");
            let reset = header("x-ratelimit-reset");
            let body = response.into_body().read_to_string().unwrap_or_default();
            return Err(classify_status(
                status,
                remaining.as_deref(),
                reset.as_deref(),
                path,
                &body,
            ));
        }

        response
            .into_body()
            .read_json()
            .map_err(|e| GitHubError::Decode(e.to_string()))
    }
}

impl RepositorySource for GitHubClient {
    fn tree(&self, repo: &RepoRef) -> GitHubResult<Vec<TreeEntry>> {
        let tree: GitTree = self.get_json(&repo_path(repo, "/git/trees/HEAD"), &[("recursive", "1")])?;
        if tree.truncated {
            warn!(
                "Tree listing for {} was truncated by GitHub; file stats cover the first {} entries",
                repo,
                tree.tree.len()
            );
        }
        Ok(tree.tree.into_iter().map(TreeEntry::from).collect())
    }

    fn languages(&self, repo: &RepoRef) -> GitHubResult<LanguageBytes> {
        self.get_json(&repo_path(repo, "/languages"), &[])
    }

    fn commits(&self, repo: &RepoRef, per_page: u32) -> GitHubResult<Vec<CommitRecord>> {
        let per_page = per_page.clamp(1, GitHubSettings::MAX_PER_PAGE).to_string();
        let items: Vec<CommitItem> =
            self.get_json(&repo_path(repo, "/commits"), &[("per_page", per_page.as_str())])?;
        Ok(items.into_iter().map(CommitRecord::from).collect())
    }
}

fn repo_path(repo: &RepoRef, suffix: &str) -> String {
    format!("/repos/{}/{}{}", repo.owner, repo.name, suffix)
}

/// Map an error status to a GitHubError.
///
/// GitHub signals primary rate limits with 403 + `x-ratelimit-remaining: 0`,
/// secondary limits with 403/429 and a "rate limit" message.
pub(crate) fn classify_status(
    status: u16,
    remaining: Option<&str>,
    reset: Option<&str>,
    path: &str,
    body: &str,
) -> GitHubError {
    let message = error_message(body);
    let exhausted = remaining.map(str::trim) == Some("0");
    let mentions_limit = message.to_lowercase().contains("rate limit");

    match status {
        401 => GitHubError::Unauthorized,
        429 => GitHubError::RateLimited {
            reset_at: parse_reset(reset),
        },
        403 if exhausted || mentions_limit => GitHubError::RateLimited {
            reset_at: parse_reset(reset),
        },
        404 => GitHubError::NotFound(path.to_string()),
        _ => GitHubError::Status { status, message },
    }
}

fn parse_reset(reset: Option<&str>) -> Option<DateTime<Utc>> {
    let secs = reset?.trim().parse::<i64>().ok()?;
    Utc.timestamp_opt(secs, 0).single()
}

/// Pull `message` out of a GitHub error body, falling back to the raw text
fn error_message(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: Option<String>,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            message: Some(message),
        }) => message,
        _ => body.chars().take(200).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_unauthorized() {
        let err = classify_status(401, None, None, "/user", r#"{"message":"Bad credentials"}"#);
        assert!(matches!(err, GitHubError::Unauthorized));
    }

    #[test]
    fn test_classify_primary_rate_limit() {
        let err = classify_status(
            403,
            Some("0"),
            Some("1700000000"),
            "/repos/a/b/commits",
            r#"{"message":"API rate limit exceeded for user."}"#,
        );
        match err {
            GitHubError::RateLimited { reset_at } => {
                assert_eq!(reset_at.map(|t| t.timestamp()), Some(1_700_000_000));
            }
            other => panic!("expected RateLimited, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_secondary_rate_limit() {
        let err = classify_status(
            403,
            Some("12"),
            None,
            "/repos/a/b",
            r#"{"message":"You have exceeded a secondary rate limit."}"#,
        );
        assert!(err.is_rate_limited());

        assert!(classify_status(429, None, None, "/repos/a/b", "").is_rate_limited());
    }

    #[test]
    fn test_classify_forbidden_without_limit() {
        let err = classify_status(
            403,
            Some("4999"),
            None,
            "/repos/a/b",
            r#"{"message":"Resource not accessible by integration"}"#,
        );
        match err {
            GitHubError::Status { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "Resource not accessible by integration");
            }
            other => panic!("expected Status, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_not_found() {
        let err = classify_status(404, None, None, "/repos/a/missing", "");
        assert!(matches!(err, GitHubError::NotFound(p) if p == "/repos/a/missing"));
    }

    #[test]
    fn test_error_message_falls_back_to_body() {
        assert_eq!(error_message("<html>bad gateway</html>"), "<html>bad gateway</html>");
        assert_eq!(error_message(r#"{"message":"boom"}"#), "boom");
    }

    #[test]
    fn test_url_join() {
        let settings = GitHubSettings {
            api_url: "http://localhost:9999/".to_string(),
            ..Default::default()
        };
        let client = GitHubClient::new(settings, "t");
        let repo = RepoRef::new("o", "r");
        assert_eq!(
            client.url(&repo_path(&repo, "/languages")),
            "http://localhost:9999/repos/o/r/languages"
        );
    }
}
