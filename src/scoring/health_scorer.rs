//! Health score calculation

use crate::models::{CommitStats, FileAnalysis, LanguageStats};
use serde::Serialize;

/// Files above this many bytes cost one point each
pub const LARGE_FILE_THRESHOLD: u64 = 500_000;

const SMALL_REPO_FILES: usize = 10;
const LARGE_REPO_FILES: usize = 1000;
const FILE_BAND_POINTS: i64 = 10;
const MAX_LANGUAGE_POINTS: i64 = 15;
const MAX_COMMIT_POINTS: i64 = 25;
const MAX_CONTRIBUTOR_POINTS: i64 = 10;

/// Per-component contributions, for transparency
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    /// 0, 10 or 20
    pub file_count: i64,
    /// 0-15
    pub language_diversity: i64,
    /// 0-25
    pub commit_activity: i64,
    /// 0-10
    pub contributors: i64,
    /// Negative or zero
    pub large_file_penalty: i64,
    /// Sum before clamping
    pub raw: i64,
    /// Final score (0-100)
    pub score: u8,
}

pub fn score_breakdown(
    files: &FileAnalysis,
    languages: &LanguageStats,
    commits: &CommitStats,
) -> ScoreBreakdown {
    let n = files.total_files;
    let mut file_count = 0;
    if n > SMALL_REPO_FILES {
        file_count += FILE_BAND_POINTS;
        if n < LARGE_REPO_FILES {
            file_count += FILE_BAND_POINTS;
        }
    }

    let language_diversity = (languages.languages.len() as i64 * 5).min(MAX_LANGUAGE_POINTS);
    let commit_activity = (commits.total_commits as i64).min(MAX_COMMIT_POINTS);
    let contributors = (commits.top_contributors.len() as i64 * 2).min(MAX_CONTRIBUTOR_POINTS);
    let large_file_penalty = -(files
        .largest_files
        .iter()
        .filter(|f| f.size > LARGE_FILE_THRESHOLD)
        .count() as i64);

    let raw = file_count + language_diversity + commit_activity + contributors + large_file_penalty;

    ScoreBreakdown {
        file_count,
        language_diversity,
        commit_activity,
        contributors,
        large_file_penalty,
        raw,
        score: raw.clamp(0, 100) as u8,
    }
}

pub fn health_score(files: &FileAnalysis, languages: &LanguageStats, commits: &CommitStats) -> u8 {
    score_breakdown(files, languages, commits).score
}

/// Letter grade for display
pub fn grade_from_score(score: u8) -> &'static str {
    match score {
        90.. => "A",
        80..=89 => "B",
        70..=79 => "C",
        60..=69 => "D",
        _ => "F",
    }
}

impl ScoreBreakdown {
    /// Human-readable explanation of the score (markdown)
    pub fn explain(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "# Health Score: {} ({})\n",
            self.score,
            grade_from_score(self.score)
        ));

        lines.push("## Scoring Formula\n".to_string());
        lines.push("```".to_string());
        lines.push(
            "Score = clamp(Files + Languages + Commits + Contributors - Penalty, 0, 100)"
                .to_string(),
        );
        lines.push("```\n".to_string());

        lines.push("## Components\n".to_string());
        lines.push(format!("- **Files**: +{} (of 20)", self.file_count));
        lines.push(format!("- **Languages**: +{} (of 15)", self.language_diversity));
        lines.push(format!("- **Commits**: +{} (of 25)", self.commit_activity));
        lines.push(format!("- **Contributors**: +{} (of 10)", self.contributors));
        lines.push(format!(
            "- **Large files** (> {} bytes): {}",
            LARGE_FILE_THRESHOLD, self.large_file_penalty
        ));
        lines.push(format!("- **Raw total**: {}", self.raw));

        lines.join("\n")
    }
}
