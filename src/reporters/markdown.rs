//! Markdown reporter for GitHub-flavored Markdown output
//!
//! Suitable for issues, pull request comments and wikis.

use super::human_size;
use crate::models::{AnalysisReport, RepoRef};
use crate::scoring::grade_from_score;
use anyhow::Result;
use chrono::Local;

/// Render report as GitHub-flavored Markdown
pub fn render(repo: &RepoRef, report: &AnalysisReport) -> Result<String> {
    let mut md = String::new();

    md.push_str(&render_header(repo, report));
    md.push('\n');

    md.push_str(&render_languages(report));
    md.push('\n');

    md.push_str(&render_files(report));
    md.push('\n');

    md.push_str(&render_commits(report));
    md.push('\n');

    md.push_str(&render_footer());

    Ok(md)
}

fn render_header(repo: &RepoRef, report: &AnalysisReport) -> String {
    let grade = grade_from_score(report.health_score);
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");

    format!(
        r#"# RepoLens Health Report: {}

**Health Score: {}/100** | **Grade: {}** | **Primary language: {}**

Generated: {}
"#,
        repo, report.health_score, grade, report.languages.primary_language, timestamp
    )
}

fn render_languages(report: &AnalysisReport) -> String {
    let mut md = String::from("## Languages\n\n");
    if report.languages.languages.is_empty() {
        md.push_str("_No languages reported._\n");
        return md;
    }
    md.push_str("| Language | Share |\n|----------|------:|\n");
    for (name, pct) in &report.languages.languages {
        md.push_str(&format!("| {} | {}% |\n", escape_cell(name), pct));
    }
    md
}

fn render_files(report: &AnalysisReport) -> String {
    let fa = &report.file_analysis;
    let mut md = format!("## Files\n\n**Total files:** {}\n\n", fa.total_files);

    if !fa.files_by_extension.is_empty() {
        md.push_str("| Extension | Files |\n|-----------|------:|\n");
        for (ext, count) in &fa.files_by_extension {
            md.push_str(&format!("| `{}` | {} |\n", escape_cell(ext), count));
        }
        md.push('\n');
    }

    if !fa.largest_files.is_empty() {
        md.push_str("### Largest Files\n\n| File | Size |\n|------|-----:|\n");
        for file in &fa.largest_files {
            md.push_str(&format!(
                "| `{}` | {} |\n",
                escape_cell(&file.path),
                human_size(file.size)
            ));
        }
    }
    md
}

fn render_commits(report: &AnalysisReport) -> String {
    let commits = &report.commits;
    let mut md = format!(
        "## Commit Activity\n\n**Commits analyzed:** {} (most recent page)\n\n",
        commits.total_commits
    );

    if !commits.top_contributors.is_empty() {
        md.push_str("| Contributor | Commits |\n|-------------|--------:|\n");
        for c in &commits.top_contributors {
            md.push_str(&format!("| {} | {} |\n", escape_cell(&c.author), c.commits));
        }
        md.push('\n');
    }

    if !commits.commit_frequency.is_empty() {
        md.push_str("<details>\n<summary>Commits per day</summary>\n\n");
        md.push_str("| Date | Commits |\n|------|--------:|\n");
        for day in &commits.commit_frequency {
            let date = if day.date.is_empty() { "unknown" } else { &day.date };
            md.push_str(&format!("| {} | {} |\n", date, day.count));
        }
        md.push_str("\n</details>\n");
    }
    md
}

fn render_footer() -> String {
    "---\n\n_Generated by RepoLens. The health score is a heuristic, not a certified metric._\n"
        .to_string()
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::{test_repo, test_report};

    #[test]
    fn test_markdown_render() {
        let md = render(&test_repo(), &test_report()).expect("render markdown");
        assert!(md.starts_with("# RepoLens Health Report: octo/demo"));
        assert!(md.contains("**Health Score: 16/100** | **Grade: F**"));
        assert!(md.contains("| Go | 80% |"));
        assert!(md.contains("| `assets/big.bin` | 585.9 KB |"));
        assert!(md.contains("| A | 2 |"));
    }

    #[test]
    fn test_markdown_empty_languages() {
        let mut report = test_report();
        report.languages = Default::default();
        let md = render(&test_repo(), &report).expect("render markdown");
        assert!(md.contains("_No languages reported._"));
    }

    #[test]
    fn test_escape_cell() {
        assert_eq!(escape_cell("a|b"), "a\\|b");
    }
}
