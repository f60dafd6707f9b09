//! Commit history extractor
//!
//! Works on a single page of commits (newest first). Counts are tallied in
//! encounter order so ties between contributors resolve to whoever appears
//! first in the page.

use crate::models::{CommitRecord, CommitStats, Contributor, DailyCommits, UNKNOWN};
use indexmap::IndexMap;

/// Number of entries kept in `top_contributors`
pub const TOP_CONTRIBUTORS_LIMIT: usize = 5;

/// `YYYY-MM-DD` prefix of an ISO 8601 timestamp
fn date_key(authored_at: Option<&str>) -> &str {
    match authored_at {
        Some(ts) => ts.get(..10).unwrap_or(ts),
        None => "",
    }
}

pub fn analyze_commits(commits: &[CommitRecord]) -> CommitStats {
    let mut by_author: IndexMap<&str, usize> = IndexMap::new();
    let mut by_date: IndexMap<&str, usize> = IndexMap::new();

    for commit in commits {
        let author = commit
            .author_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN);
        *by_author.entry(author).or_insert(0) += 1;
        *by_date
            .entry(date_key(commit.authored_at.as_deref()))
            .or_insert(0) += 1;
    }

    let mut top_contributors: Vec<Contributor> = by_author
        .into_iter()
        .map(|(author, commits)| Contributor {
            author: author.to_string(),
            commits,
        })
        .collect();
    top_contributors.sort_by(|a, b| b.commits.cmp(&a.commits));
    top_contributors.truncate(TOP_CONTRIBUTORS_LIMIT);

    let mut commit_frequency: Vec<DailyCommits> = by_date
        .into_iter()
        .map(|(date, count)| DailyCommits {
            date: date.to_string(),
            count,
        })
        .collect();
    commit_frequency.sort_by(|a, b| a.date.cmp(&b.date));

    CommitStats {
        total_commits: commits.len(),
        commit_frequency,
        top_contributors,
    }
}
