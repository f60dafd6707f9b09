//! Text (terminal) reporter with colors and formatting

use super::human_size;
use crate::models::{AnalysisReport, RepoRef};
use crate::scoring::{grade_from_score, LARGE_FILE_THRESHOLD};
use anyhow::Result;

/// Grade colors (ANSI escape codes)
fn grade_color(grade: &str) -> &'static str {
    match grade {
        "A" => "\x1b[32m", // Green
        "B" => "\x1b[92m", // Light green
        "C" => "\x1b[33m", // Yellow
        "D" => "\x1b[91m", // Light red
        "F" => "\x1b[31m", // Red
        _ => "\x1b[0m",
    }
}

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const BAR_WIDTH: usize = 20;

/// Render report as formatted terminal output
pub fn render(repo: &RepoRef, report: &AnalysisReport) -> Result<String> {
    let mut out = String::new();

    // Header
    let grade = grade_from_score(report.health_score);
    let grade_c = grade_color(grade);
    out.push_str(&format!("\n{BOLD}RepoLens Analysis{RESET}  {}\n", repo));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Health: {BOLD}{}/100{RESET}  Grade: {grade_c}{BOLD}{}{RESET}  ",
        report.health_score, grade
    ));
    out.push_str(&format!(
        "Files: {}  Commits: {}  Primary: {}\n\n",
        report.file_analysis.total_files,
        report.commits.total_commits,
        report.languages.primary_language
    ));

    // Languages
    if !report.languages.languages.is_empty() {
        out.push_str(&format!("{BOLD}LANGUAGES{RESET}\n"));
        for (name, pct) in &report.languages.languages {
            let filled = (*pct as usize * BAR_WIDTH / 100).min(BAR_WIDTH);
            out.push_str(&format!(
                "  {:<14} {}{DIM}{}{RESET} {:>3}%\n",
                name,
                "█".repeat(filled),
                "░".repeat(BAR_WIDTH - filled),
                pct
            ));
        }
        out.push('\n');
    }

    // Extensions, most common first
    let fa = &report.file_analysis;
    if !fa.files_by_extension.is_empty() {
        out.push_str(&format!("{BOLD}FILE TYPES{RESET}\n  "));
        let mut exts: Vec<(&String, &usize)> = fa.files_by_extension.iter().collect();
        exts.sort_by(|a, b| b.1.cmp(a.1));
        let parts: Vec<String> = exts
            .iter()
            .take(8)
            .map(|(ext, n)| format!("{} {}", ext, n))
            .collect();
        out.push_str(&parts.join(" | "));
        if exts.len() > 8 {
            out.push_str(&format!(" {DIM}(+{} more){RESET}", exts.len() - 8));
        }
        out.push_str("\n\n");
    }

    if !fa.largest_files.is_empty() {
        out.push_str(&format!("{BOLD}LARGEST FILES{RESET}\n"));
        for file in &fa.largest_files {
            let flag = if file.size > LARGE_FILE_THRESHOLD {
                "\x1b[31m!\x1b[0m"
            } else {
                " "
            };
            out.push_str(&format!(
                "  {} {:>10}  {}\n",
                flag,
                human_size(file.size),
                shorten(&file.path, 50)
            ));
        }
        out.push('\n');
    }

    // Commit activity
    let commits = &report.commits;
    if !commits.top_contributors.is_empty() {
        out.push_str(&format!(
            "{BOLD}TOP CONTRIBUTORS{RESET} {DIM}(last {} commits){RESET}\n",
            commits.total_commits
        ));
        for c in &commits.top_contributors {
            out.push_str(&format!("  {:>4}  {}\n", c.commits, c.author));
        }
        out.push('\n');
    }

    if let (Some(first), Some(last)) = (
        commits.commit_frequency.first(),
        commits.commit_frequency.last(),
    ) {
        out.push_str(&format!(
            "{DIM}Activity: {} active days, {} to {}{RESET}\n",
            commits.commit_frequency.len(),
            display_date(&first.date),
            display_date(&last.date)
        ));
    }

    Ok(out)
}

fn display_date(date: &str) -> &str {
    if date.is_empty() {
        "unknown"
    } else {
        date
    }
}

/// Keep the tail of long paths; char-based so multi-byte names don't panic
fn shorten(path: &str, max: usize) -> String {
    let count = path.chars().count();
    if count <= max {
        return path.to_string();
    }
    let skip = count - (max - 3);
    format!("...{}", path.chars().skip(skip).collect::<String>())
}
