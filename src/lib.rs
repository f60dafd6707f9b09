//! RepoLens - repository health analysis for GitHub
//!
//! Fetches a repository's file tree, language breakdown, and most recent
//! page of commits, normalizes them into metric records, and derives a
//! bounded heuristic health score.
//!
//! # Example
//!
//! ```no_run
//! use repolens::analysis::analyze_repository;
//! use repolens::config::GitHubSettings;
//! use repolens::models::RepoRef;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let repo: RepoRef = "rust-lang/cargo".parse()?;
//! let report = analyze_repository(
//!     &GitHubSettings::default(),
//!     &repo,
//!     Some("ghp_..."),
//!     &CancellationToken::new(),
//! )
//! .await?;
//! println!("health: {}", report.health_score);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod github;
pub mod models;
pub mod reporters;
pub mod scoring;
pub mod server;
