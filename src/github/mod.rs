//! GitHub REST API access
//!
//! A request-scoped, authenticated client for the handful of read-only
//! endpoints RepoLens needs, plus the OAuth web flow used by the HTTP API.
//!
//! The three analysis reads (tree, languages, commits) sit behind the
//! [`RepositorySource`] trait so the aggregator can be driven by any source.
//!
//! # Example
//!
//! ```rust,no_run
//! use repolens::config::GitHubSettings;
//! use repolens::github::{GitHubClient, RepositorySource};
//! use repolens::models::RepoRef;
//!
//! let client = GitHubClient::new(GitHubSettings::default(), "ghp_...");
//! let languages = client.languages(&RepoRef::new("octocat", "hello-world"))?;
//! # Ok::<(), repolens::github::GitHubError>(())
//! ```

mod client;
pub mod oauth;
pub mod types;

pub use client::GitHubClient;
pub use oauth::{OAuthClient, OAuthError};
pub use types::{GitHubUser, Repository, RepositoryOwner};

use crate::models::{CommitRecord, LanguageBytes, RepoRef, TreeEntry};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors returned by the GitHub API client
#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("GitHub rejected the credential (401)")]
    Unauthorized,

    #[error("GitHub rate limit exceeded{}", reset_suffix(.reset_at))]
    RateLimited { reset_at: Option<DateTime<Utc>> },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("GitHub API error: {status} - {message}")]
    Status { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Failed to parse GitHub response: {0}")]
    Decode(String),
}

fn reset_suffix(reset_at: &Option<DateTime<Utc>>) -> String {
    match reset_at {
        Some(t) => format!(" (resets at {})", t.to_rfc3339()),
        None => String::new(),
    }
}

impl GitHubError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, GitHubError::RateLimited { .. })
    }
}

pub type GitHubResult<T> = Result<T, GitHubError>;

/// The three read-only queries an analysis is built from.
///
/// Implementations are called from blocking worker threads, one call per
/// thread, and must not share mutable state between calls.
pub trait RepositorySource: Send + Sync + 'static {
    /// Full recursive tree listing at the default branch tip
    fn tree(&self, repo: &RepoRef) -> GitHubResult<Vec<TreeEntry>>;

    /// Byte count per language, in the platform's order
    fn languages(&self, repo: &RepoRef) -> GitHubResult<LanguageBytes>;

    /// First page of commits, newest first
    fn commits(&self, repo: &RepoRef, per_page: u32) -> GitHubResult<Vec<CommitRecord>>;
}
