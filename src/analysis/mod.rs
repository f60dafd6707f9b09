//! Repository analysis aggregator
//!
//! Runs the three fetch+extract units concurrently, joins them, and scores
//! the joined record:
//!
//! ```text
//! tree      → analyze_files      ─┐
//! languages → analyze_languages  ─┼→ health_score → AnalysisReport
//! commits   → analyze_commits    ─┘
//! ```
//!
//! The HTTP client is synchronous, so each unit runs on tokio's blocking
//! pool. Any failure fails the whole analysis; there is no partial report.

pub mod commits;
pub mod files;
pub mod languages;

pub use commits::analyze_commits;
pub use files::analyze_files;
pub use languages::analyze_languages;

use crate::config::GitHubSettings;
use crate::github::{GitHubClient, GitHubError, GitHubResult, RepositorySource};
use crate::models::{AnalysisReport, RepoRef};
use crate::scoring::health_score;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("No GitHub token provided")]
    MissingCredential,

    #[error(transparent)]
    Upstream(#[from] GitHubError),

    #[error("Analysis cancelled")]
    Cancelled,

    #[error("Analysis task failed: {0}")]
    Interrupted(String),
}

impl AnalysisError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AnalysisError::Upstream(e) if e.is_rate_limited())
    }
}

/// Fans the three reads out over one [`RepositorySource`]
pub struct Analyzer<S: RepositorySource> {
    source: Arc<S>,
    commits_per_page: u32,
}

impl<S: RepositorySource> Analyzer<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
            commits_per_page: GitHubSettings::MAX_PER_PAGE,
        }
    }

    pub fn with_commits_per_page(mut self, per_page: u32) -> Self {
        self.commits_per_page = per_page.clamp(1, GitHubSettings::MAX_PER_PAGE);
        self
    }

    /// Analyze one repository.
    ///
    /// Cancelling `cancel` resolves immediately with [`AnalysisError::Cancelled`];
    /// blocking requests already in flight run to their deadline and are discarded.
    pub async fn analyze(
        &self,
        repo: &RepoRef,
        cancel: &CancellationToken,
    ) -> Result<AnalysisReport, AnalysisError> {
        let files = self.spawn(repo, |source, repo| {
            let entries = source.tree(repo)?;
            let analysis = analyze_files(&entries);
            debug!(
                "File analysis for {}: {} files, {} extensions",
                repo,
                analysis.total_files,
                analysis.files_by_extension.len()
            );
            Ok(analysis)
        });

        let languages = self.spawn(repo, |source, repo| {
            let bytes = source.languages(repo)?;
            let stats = analyze_languages(&bytes);
            debug!(
                "Language analysis for {}: {} languages, primary {}",
                repo,
                stats.languages.len(),
                stats.primary_language
            );
            Ok(stats)
        });

        let per_page = self.commits_per_page;
        let commits = self.spawn(repo, move |source, repo| {
            let records = source.commits(repo, per_page)?;
            let stats = analyze_commits(&records);
            debug!(
                "Commit analysis for {}: {} commits, {} contributors",
                repo,
                stats.total_commits,
                stats.top_contributors.len()
            );
            Ok(stats)
        });

        let joined = async {
            tokio::try_join!(
                join_extractor(files),
                join_extractor(languages),
                join_extractor(commits)
            )
        };

        let (file_analysis, languages, commits) = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Analysis of {} cancelled", repo);
                return Err(AnalysisError::Cancelled);
            }
            result = joined => result?,
        };

        let health_score = health_score(&file_analysis, &languages, &commits);
        info!("Analysis of {} complete: health score {}", repo, health_score);

        Ok(AnalysisReport {
            file_analysis,
            languages,
            commits,
            health_score,
        })
    }

    fn spawn<T, F>(&self, repo: &RepoRef, unit: F) -> JoinHandle<GitHubResult<T>>
    where
        T: Send + 'static,
        F: FnOnce(&S, &RepoRef) -> GitHubResult<T> + Send + 'static,
    {
        let source = Arc::clone(&self.source);
        let repo = repo.clone();
        tokio::task::spawn_blocking(move || unit(&source, &repo))
    }
}

async fn join_extractor<T>(handle: JoinHandle<GitHubResult<T>>) -> Result<T, AnalysisError> {
    match handle.await {
        Ok(result) => result.map_err(AnalysisError::from),
        Err(e) => Err(AnalysisError::Interrupted(e.to_string())),
    }
}

/// Analyze `repo` as the holder of `credential`.
///
/// A missing or blank credential fails before any request is made. The client
/// is built for this call only and dropped with it.
pub async fn analyze_repository(
    settings: &GitHubSettings,
    repo: &RepoRef,
    credential: Option<&str>,
    cancel: &CancellationToken,
) -> Result<AnalysisReport, AnalysisError> {
    let token = credential
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AnalysisError::MissingCredential)?;

    let client = GitHubClient::new(settings.clone(), token);
    Analyzer::new(client)
        .with_commits_per_page(settings.commits_per_page)
        .analyze(repo, cancel)
        .await
}
