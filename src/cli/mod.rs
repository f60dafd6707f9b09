//! CLI command definitions and handlers

mod analyze;
mod repos;
mod serve;

use crate::config::UserConfig;
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use console::style;
use std::path::PathBuf;

/// RepoLens - GitHub repository health analysis
#[derive(Parser, Debug)]
#[command(name = "repolens")]
#[command(
    version,
    about = "Repository health analysis for GitHub: file composition, language mix, commit activity and a health score",
    long_about = "RepoLens reads a repository's file tree, language breakdown and most recent \
page of commits from the GitHub API, and combines them into a heuristic health score.\n\n\
A GitHub token is required. Pass --token, export GITHUB_TOKEN, or add it to \
~/.config/repolens/config.toml (see `repolens config init`).",
    after_help = "\
Examples:
  repolens analyze rust-lang/cargo                 Analyze a repository
  repolens analyze owner/repo --format json        JSON output for scripting
  repolens analyze owner/repo --explain-score      Show the scoring breakdown
  repolens repos                                   List your repositories
  repolens serve --port 3001                       Start the HTTP API for the dashboard"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace). RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// GitHub token (overrides the config file)
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a repository's health
    #[command(after_help = "\
Examples:
  repolens analyze octocat/hello-world
  repolens analyze https://github.com/serde-rs/serde
  repolens analyze owner/repo --format markdown -o HEALTH.md")]
    Analyze {
        /// Repository as owner/repo or a github.com URL
        repo: String,

        /// Output format: text, json, markdown (or md)
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json", "markdown", "md"])]
        format: String,

        /// Write the report to a file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Show the per-component score breakdown
        #[arg(long)]
        explain_score: bool,
    },

    /// List your repositories (most recently updated first)
    Repos {
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a repository's metadata
    Repo {
        /// Repository as owner/repo or a github.com URL
        repo: String,

        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the user the token belongs to
    Whoami,

    /// Start the HTTP API used by the dashboard (OAuth login + analysis endpoints)
    Serve {
        /// Address to bind (default: 127.0.0.1)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (default: 3001, or PORT)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Manage configuration (init or show)
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Initialize config file with example settings
    Init,
    /// Show current config and paths
    Show,
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Version => {
            println!("repolens {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }

        Commands::Config { action } => run_config_action(action),

        command => {
            let config = UserConfig::load()?;
            let token = cli
                .token
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .or_else(|| config.github_token())
                .map(str::to_string);

            match command {
                Commands::Analyze {
                    repo,
                    format,
                    output,
                    explain_score,
                } => analyze::run(
                    config.github_settings(),
                    require_token(token.as_deref())?,
                    &repo,
                    &format,
                    output.as_deref(),
                    explain_score,
                ),
                Commands::Repos { json } => repos::list(
                    config.github_settings(),
                    require_token(token.as_deref())?,
                    json,
                ),
                Commands::Repo { repo, json } => repos::show(
                    config.github_settings(),
                    require_token(token.as_deref())?,
                    &repo,
                    json,
                ),
                Commands::Whoami => {
                    repos::whoami(config.github_settings(), require_token(token.as_deref())?)
                }
                Commands::Serve { host, port } => serve::run(&config, host, port),
                Commands::Version | Commands::Config { .. } => Ok(()),
            }
        }
    }
}

fn require_token(token: Option<&str>) -> Result<&str> {
    match token {
        Some(token) => Ok(token),
        None => bail!(
            "No GitHub token found. Pass {}, export {}, or run {} and add one.",
            style("--token").cyan(),
            style("GITHUB_TOKEN").cyan(),
            style("repolens config init").cyan()
        ),
    }
}

fn run_config_action(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = UserConfig::init_user_config()?;
            println!("✅ Config initialized at: {}", path.display());
            println!("\nEdit to add your GitHub token:");
            println!("  {}", path.display());
            println!("\nOr set via environment:");
            println!("  export GITHUB_TOKEN=\"ghp_...\"");
            Ok(())
        }
        ConfigAction::Show => show_config(),
    }
}

fn set_or_missing(set: bool) -> &'static str {
    if set {
        "✓ configured"
    } else {
        "✗ not set"
    }
}

fn show_config() -> Result<()> {
    let config = UserConfig::load()?;
    println!("📁 Config path:");
    if let Some(user_path) = UserConfig::user_config_path() {
        let status = if user_path.exists() { "✓" } else { "(not found)" };
        println!("  User: {} {}", user_path.display(), status);
    }
    println!();

    let github = config.github_settings();
    println!("🐙 GitHub API:");
    println!("  URL:              {}", github.api_url);
    println!("  Timeout:          {}s", github.timeout.as_secs());
    println!("  Commits per page: {}", github.commits_per_page);
    println!("  Token:            {}", set_or_missing(config.github_token().is_some()));
    println!();

    let oauth = config.oauth_settings();
    println!("🔑 OAuth:");
    println!("  Client ID:     {}", set_or_missing(oauth.client_id.is_some()));
    println!("  Client secret: {}", set_or_missing(oauth.client_secret.is_some()));
    println!(
        "  Callback URL:  {}",
        oauth.callback_url.as_deref().unwrap_or("(not set)")
    );
    println!();

    let server = config.server_settings();
    println!("🌐 Server:");
    println!("  Listen:   {}:{}", server.host, server.port);
    println!("  Frontend: {}", server.frontend_url);
    Ok(())
}
