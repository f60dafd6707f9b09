//! `repolens repos`, `repo` and `whoami` commands
//!
//! These are single blocking requests, so no runtime is started.

use crate::config::GitHubSettings;
use crate::github::{GitHubClient, Repository};
use crate::models::RepoRef;
use anyhow::{Context, Result};
use console::style;

pub fn list(settings: GitHubSettings, token: &str, json: bool) -> Result<()> {
    let client = GitHubClient::new(settings, token);
    let repos = client
        .list_repositories()
        .context("Failed to fetch repositories")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&repos)?);
        return Ok(());
    }

    if repos.is_empty() {
        println!("No repositories found.");
        return Ok(());
    }

    println!();
    println!(
        "  {:<45} {:<12} {:>7} {:>6}  {}",
        "Repository", "Language", "Stars", "Forks", "Updated"
    );
    println!("  {}", style("─".repeat(90)).dim());
    for repo in &repos {
        println!("{}", format_row(repo));
    }
    println!();
    println!(
        "{} repositories. Run {} for a health report.",
        repos.len(),
        style("repolens analyze <owner/repo>").cyan()
    );
    Ok(())
}

fn format_row(repo: &Repository) -> String {
    let name: String = if repo.full_name.chars().count() > 44 {
        let head: String = repo.full_name.chars().take(41).collect();
        format!("{}...", head)
    } else {
        repo.full_name.clone()
    };
    let updated = repo
        .updated_at
        .as_deref()
        .and_then(|t| t.get(..10))
        .unwrap_or("-");
    let visibility = if repo.private { " 🔒" } else { "" };
    format!(
        "  {:<45} {:<12} {:>7} {:>6}  {}{}",
        name,
        repo.language.as_deref().unwrap_or("-"),
        repo.stargazers_count,
        repo.forks_count,
        updated,
        visibility
    )
}

pub fn show(settings: GitHubSettings, token: &str, repo: &str, json: bool) -> Result<()> {
    let repo: RepoRef = repo.parse()?;
    let client = GitHubClient::new(settings, token);
    let info = client
        .repository(&repo)
        .with_context(|| format!("Failed to fetch repository {}", repo))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!();
    println!("{}", style(&info.full_name).bold());
    if let Some(description) = info.description.as_deref().filter(|d| !d.is_empty()) {
        println!("  {}", description);
    }
    println!();
    println!("  Language:       {}", info.language.as_deref().unwrap_or("-"));
    println!("  Stars:          {}", info.stargazers_count);
    println!("  Forks:          {}", info.forks_count);
    println!(
        "  Default branch: {}",
        info.default_branch.as_deref().unwrap_or("-")
    );
    println!(
        "  Visibility:     {}",
        if info.private { "private" } else { "public" }
    );
    println!(
        "  URL:            {}",
        style(info.html_url.as_deref().unwrap_or("-")).cyan()
    );
    Ok(())
}

pub fn whoami(settings: GitHubSettings, token: &str) -> Result<()> {
    let client = GitHubClient::new(settings, token);
    let user = client
        .current_user()
        .context("Failed to fetch the authenticated user")?;

    match user.name.as_deref() {
        Some(name) => println!("{} ({})", style(&user.login).bold(), name),
        None => println!("{}", style(&user.login).bold()),
    }
    Ok(())
}
