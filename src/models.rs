//! Core data models for RepoLens
//!
//! Input records fetched from the hosting platform (tree entries, commits,
//! language byte counts) and the metric records derived from them.

use anyhow::{bail, Result};
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Bucket used for paths without an extension
pub const NO_EXTENSION: &str = "no-extension";

/// Fallback for missing author names and empty language maps
pub const UNKNOWN: &str = "Unknown";

/// An `owner/repo` coordinate on the hosting platform
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

static REPO_PATTERN: OnceLock<Regex> = OnceLock::new();

fn repo_pattern() -> &'static Regex {
    REPO_PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?:https?://github\.com/([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+?)(?:\.git)?/?|([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+))$",
        )
        .expect("valid regex")
    })
}

impl FromStr for RepoRef {
    type Err = anyhow::Error;

    /// Accepts `owner/repo` or `https://github.com/owner/repo[.git]`
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let Some(caps) = repo_pattern().captures(trimmed) else {
            bail!(
                "Invalid repository '{}'. Expected 'owner/repo' or a github.com URL",
                s
            );
        };
        let (owner, name) = match (caps.get(1), caps.get(2)) {
            (Some(owner), Some(name)) => (owner.as_str(), name.as_str()),
            _ => (&caps[3], &caps[4]),
        };
        // "." and ".." would walk out of the /repos/{owner}/{name} prefix
        if [owner, name].iter().any(|seg| seg.chars().all(|c| c == '.')) {
            bail!("Invalid repository '{}'. Path segments cannot be dots only", s);
        }
        Ok(Self::new(owner, name))
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Kind of object in a repository tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Blob,
    Tree,
    /// Submodule commits and anything the platform adds later
    Other,
}

impl EntryKind {
    pub fn from_git_type(kind: &str) -> Self {
        match kind {
            "blob" => EntryKind::Blob,
            "tree" => EntryKind::Tree,
            _ => EntryKind::Other,
        }
    }
}

/// One object in the repository tree at the default branch tip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    pub kind: EntryKind,
    pub size: Option<u64>,
}

impl TreeEntry {
    pub fn blob(path: impl Into<String>, size: Option<u64>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Blob,
            size,
        }
    }

    pub fn tree(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Tree,
            size: None,
        }
    }

    pub fn is_blob(&self) -> bool {
        self.kind == EntryKind::Blob
    }
}

/// A commit as reported by the platform; fields may be absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub author_name: Option<String>,
    /// ISO 8601 author timestamp
    pub authored_at: Option<String>,
}

impl CommitRecord {
    pub fn new(author: &str, authored_at: &str) -> Self {
        Self {
            author_name: Some(author.to_string()),
            authored_at: Some(authored_at.to_string()),
        }
    }
}

/// Language name → byte count, in the order the platform reported them
pub type LanguageBytes = IndexMap<String, u64>;

/// A file in the largest-files list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LargeFile {
    pub path: String,
    pub size: u64,
}

/// File/tree composition of a repository
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAnalysis {
    pub total_files: usize,
    /// Extension → file count, in first-encounter order
    pub files_by_extension: IndexMap<String, usize>,
    /// Always 0: blob contents are never fetched
    pub total_lines: u64,
    /// Up to 10 files, largest first
    pub largest_files: Vec<LargeFile>,
}

/// Language breakdown as rounded percentages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageStats {
    /// Rounded independently; the values need not sum to 100
    pub languages: IndexMap<String, u32>,
    pub primary_language: String,
}

impl Default for LanguageStats {
    fn default() -> Self {
        Self {
            languages: IndexMap::new(),
            primary_language: UNKNOWN.to_string(),
        }
    }
}

/// Commits on one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCommits {
    /// `YYYY-MM-DD`, or empty when the commit had no timestamp
    pub date: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub author: String,
    pub commits: usize,
}

/// Commit activity derived from the most recent page of commits
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitStats {
    /// Commits in the fetched page, not the repository's full history
    pub total_commits: usize,
    /// Ascending by date
    pub commit_frequency: Vec<DailyCommits>,
    /// Up to 5, most commits first
    pub top_contributors: Vec<Contributor>,
}

/// Composite health analysis of one repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub file_analysis: FileAnalysis,
    pub languages: LanguageStats,
    pub commits: CommitStats,
    /// 0-100
    pub health_score: u8,
}
