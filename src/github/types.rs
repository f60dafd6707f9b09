//! GitHub REST API response types
//!
//! Fields that GitHub may omit are `Option`s; conversion into the crate's
//! models applies the documented defaults.

use crate::models::{CommitRecord, EntryKind, TreeEntry};
use serde::{Deserialize, Serialize};

// Tree API (GET /repos/{owner}/{repo}/git/trees/{sha}?recursive=1)
#[derive(Debug, Deserialize)]
pub(crate) struct GitTree {
    #[serde(default)]
    pub tree: Vec<GitTreeEntry>,
    #[serde(default)]
    pub truncated: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GitTreeEntry {
    pub path: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub size: Option<u64>,
}

impl From<GitTreeEntry> for TreeEntry {
    fn from(entry: GitTreeEntry) -> Self {
        let kind = match entry.kind.as_deref() {
            Some(kind) => EntryKind::from_git_type(kind),
            None => EntryKind::Other,
        };
        TreeEntry {
            path: entry.path.unwrap_or_default(),
            kind,
            size: entry.size,
        }
    }
}

// Commits API (GET /repos/{owner}/{repo}/commits)
#[derive(Debug, Deserialize)]
pub(crate) struct CommitItem {
    pub commit: Option<CommitDetail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommitDetail {
    pub author: Option<CommitAuthor>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommitAuthor {
    pub name: Option<String>,
    pub date: Option<String>,
}

impl From<CommitItem> for CommitRecord {
    fn from(item: CommitItem) -> Self {
        match item.commit.and_then(|c| c.author) {
            Some(author) => CommitRecord {
                author_name: author.name,
                authored_at: author.date,
            },
            None => CommitRecord::default(),
        }
    }
}

/// Authenticated user (GET /user)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubUser {
    pub login: String,
    pub id: u64,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryOwner {
    pub login: String,
    #[serde(default)]
    pub avatar_url: String,
}

/// Repository metadata (GET /user/repos, GET /repos/{owner}/{repo})
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub default_branch: Option<String>,
    pub owner: RepositoryOwner,
}
