//! Repository Health Scoring
//!
//! A pure heuristic over the joined metric records. It is recomputed for
//! every analysis and never persisted.
//!
//! # Scoring Formula
//!
//! ```text
//! Score = clamp(Files + Languages + Commits + Contributors - Penalty, 0, 100)
//!
//! Where:
//!   Files        = 10 if files > 10, plus 10 more if files < 1000 as well  (max 20)
//!   Languages    = min(languages × 5, 15)
//!   Commits      = min(commits in the fetched page, 25)
//!   Contributors = min(top contributors × 2, 10)
//!   Penalty      = 1 per largest-file entry over 500,000 bytes
//! ```
//!
//! The size band only pays out once a repository has more than 10 files, so
//! an empty repository scores 0.
//!
//! # Example
//!
//! 5 files (one of 600 KB), languages {Go, TypeScript}, 3 commits by 2 people:
//!
//! Score = 0 + 10 + 3 + 4 - 1 = 16

mod health_scorer;

pub use health_scorer::{
    grade_from_score, health_score, score_breakdown, ScoreBreakdown, LARGE_FILE_THRESHOLD,
};
