//! `repolens serve` command

use crate::config::UserConfig;
use crate::server::{run_server, AppState};
use anyhow::{Context, Result};

pub fn run(config: &UserConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut settings = config.server_settings();
    if let Some(host) = host {
        settings.host = host;
    }
    if let Some(port) = port {
        settings.port = port;
    }

    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    rt.block_on(run_server(&settings, AppState::from_config(config)))
}
