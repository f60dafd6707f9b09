//! RepoLens - repository health analysis for GitHub
//!
//! Analyzes a repository's file composition, language mix and commit
//! activity, and serves the same analysis over HTTP for the dashboard.

use anyhow::Result;
use clap::Parser;
use repolens::cli;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // .env in the working directory, if any (OAuth app credentials, PORT, ...)
    dotenvy::dotenv().ok();

    let cli = cli::Cli::parse();

    // RUST_LOG wins over --log-level; logs go to stderr so stdout stays pipeable
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    cli::run(cli)
}
