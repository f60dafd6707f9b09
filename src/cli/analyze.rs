//! `repolens analyze` command

use crate::analysis::{analyze_repository, AnalysisError};
use crate::config::GitHubSettings;
use crate::github::GitHubError;
use crate::models::RepoRef;
use crate::reporters::{report_with_format, OutputFormat};
use crate::scoring::score_breakdown;
use anyhow::{bail, Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Create spinner progress style
fn create_spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

pub fn run(
    settings: GitHubSettings,
    token: &str,
    repo: &str,
    format: &str,
    output: Option<&Path>,
    explain_score: bool,
) -> Result<()> {
    let repo: RepoRef = repo.parse()?;
    let format: OutputFormat = format.parse()?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(create_spinner_style());
    spinner.set_message(format!("Analyzing {}...", style(&repo).cyan()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    let cancel = CancellationToken::new();
    let result = rt.block_on(async {
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                on_interrupt.cancel();
            }
        });
        analyze_repository(&settings, &repo, Some(token), &cancel).await
    });
    // Abandoned requests end at their own deadline; don't wait for them
    rt.shutdown_background();
    spinner.finish_and_clear();

    let report = match result {
        Ok(report) => report,
        Err(AnalysisError::Cancelled) => bail!("Analysis cancelled"),
        Err(e) if e.is_rate_limited() => bail!(
            "{}\nWait for the limit to reset, or use a different token.",
            e
        ),
        Err(AnalysisError::Upstream(GitHubError::Unauthorized)) => bail!(
            "GitHub rejected the token. Check {} or your config file.",
            style("GITHUB_TOKEN").cyan()
        ),
        Err(AnalysisError::Upstream(GitHubError::NotFound(_))) => bail!(
            "Repository {} not found, or the token cannot see it",
            repo
        ),
        Err(e) => return Err(e).with_context(|| format!("Failed to analyze {}", repo)),
    };

    let mut rendered = report_with_format(&repo, &report, format)?;

    if explain_score {
        let explanation =
            score_breakdown(&report.file_analysis, &report.languages, &report.commits).explain();
        if format == OutputFormat::Json {
            // Keep stdout valid JSON
            eprintln!("{}", explanation);
        } else {
            rendered.push('\n');
            rendered.push_str(&explanation);
            rendered.push('\n');
        }
    }

    match output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            println!(
                "{}Report written to: {}",
                style("📄 ").bold(),
                style(path.display()).cyan()
            );
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
