//! User-level configuration for repolens
//!
//! Supports loading config from:
//! - ~/.config/repolens/config.toml
//! - Environment variables (highest priority)

use super::settings::{GitHubSettings, OAuthSettings, ServerSettings};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct UserConfig {
    #[serde(default)]
    pub github: GitHubSection,
    #[serde(default)]
    pub oauth: OAuthSection,
    #[serde(default)]
    pub server: ServerSection,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct GitHubSection {
    /// Personal access token used by the CLI
    pub token: Option<String>,

    /// REST API base URL (default: https://api.github.com)
    pub api_url: Option<String>,

    /// Per-request deadline in seconds (default: 30)
    pub timeout_secs: Option<u64>,

    /// Commits fetched for activity stats, 1-100 (default: 100)
    pub commits_per_page: Option<u32>,

    pub user_agent: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct OAuthSection {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub callback_url: Option<String>,
    pub authorize_url: Option<String>,
    pub token_url: Option<String>,
    pub scope: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Dashboard origin, used for CORS and the post-login redirect
    pub frontend_url: Option<String>,
}

fn overlay<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

impl UserConfig {
    /// Load config from all sources, with priority:
    /// 1. Environment variables (highest)
    /// 2. User config (~/.config/repolens/config.toml)
    pub fn load() -> Result<Self> {
        let mut config = UserConfig::default();

        if let Some(path) = Self::user_config_path().filter(|p| p.exists()) {
            match std::fs::read_to_string(&path)
                .map_err(anyhow::Error::from)
                .and_then(|content| Self::from_toml_str(&content))
            {
                Ok(file_config) => {
                    debug!("Loaded user config from {}", path.display());
                    config.merge(file_config);
                }
                Err(e) => warn!("Ignoring unreadable config {}: {}", path.display(), e),
            }
        }

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid repolens config")
    }

    /// Get the user config file path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("repolens").join("config.toml"))
    }

    /// Merge another config into this one (other takes priority)
    fn merge(&mut self, other: UserConfig) {
        let UserConfig {
            github,
            oauth,
            server,
        } = other;

        overlay(&mut self.github.token, github.token);
        overlay(&mut self.github.api_url, github.api_url);
        overlay(&mut self.github.timeout_secs, github.timeout_secs);
        overlay(&mut self.github.commits_per_page, github.commits_per_page);
        overlay(&mut self.github.user_agent, github.user_agent);

        overlay(&mut self.oauth.client_id, oauth.client_id);
        overlay(&mut self.oauth.client_secret, oauth.client_secret);
        overlay(&mut self.oauth.callback_url, oauth.callback_url);
        overlay(&mut self.oauth.authorize_url, oauth.authorize_url);
        overlay(&mut self.oauth.token_url, oauth.token_url);
        overlay(&mut self.oauth.scope, oauth.scope);

        overlay(&mut self.server.host, server.host);
        overlay(&mut self.server.port, server.port);
        overlay(&mut self.server.frontend_url, server.frontend_url);
    }

    /// Apply environment overrides. `lookup` is `std::env::var` outside tests.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        overlay(&mut self.github.token, var("GITHUB_TOKEN"));
        overlay(&mut self.github.api_url, var("GITHUB_API_URL"));
        overlay(&mut self.oauth.client_id, var("GITHUB_CLIENT_ID"));
        overlay(&mut self.oauth.client_secret, var("GITHUB_CLIENT_SECRET"));
        overlay(&mut self.oauth.callback_url, var("GITHUB_CALLBACK_URL"));
        overlay(&mut self.server.frontend_url, var("FRONTEND_URL"));

        if let Some(port) = var("PORT") {
            match port.trim().parse::<u16>() {
                Ok(port) => self.server.port = Some(port),
                Err(_) => warn!("Ignoring invalid PORT value '{}'", port),
            }
        }
    }

    /// CLI credential, if configured
    pub fn github_token(&self) -> Option<&str> {
        self.github
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    pub fn github_settings(&self) -> GitHubSettings {
        let defaults = GitHubSettings::default();
        GitHubSettings {
            api_url: self.github.api_url.clone().unwrap_or(defaults.api_url),
            timeout: self
                .github
                .timeout_secs
                .filter(|&secs| secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            commits_per_page: self
                .github
                .commits_per_page
                .map(|n| n.clamp(1, GitHubSettings::MAX_PER_PAGE))
                .unwrap_or(defaults.commits_per_page),
            user_agent: self.github.user_agent.clone().unwrap_or(defaults.user_agent),
        }
    }

    pub fn oauth_settings(&self) -> OAuthSettings {
        let defaults = OAuthSettings::default();
        OAuthSettings {
            client_id: self.oauth.client_id.clone(),
            client_secret: self.oauth.client_secret.clone(),
            callback_url: self.oauth.callback_url.clone(),
            authorize_url: self
                .oauth
                .authorize_url
                .clone()
                .unwrap_or(defaults.authorize_url),
            token_url: self.oauth.token_url.clone().unwrap_or(defaults.token_url),
            scope: self.oauth.scope.clone().unwrap_or(defaults.scope),
            timeout: self.github_settings().timeout,
        }
    }

    pub fn server_settings(&self) -> ServerSettings {
        let defaults = ServerSettings::default();
        ServerSettings {
            host: self.server.host.clone().unwrap_or(defaults.host),
            port: self.server.port.unwrap_or(defaults.port),
            frontend_url: self
                .server
                .frontend_url
                .clone()
                .unwrap_or(defaults.frontend_url),
        }
    }

    /// Initialize user config directory and create example config
    pub fn init_user_config() -> Result<PathBuf> {
        let config_path = Self::user_config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        if !config_path.exists() {
            std::fs::write(&config_path, EXAMPLE_CONFIG)?;
        }

        Ok(config_path)
    }
}

const EXAMPLE_CONFIG: &str = r#"# RepoLens User Configuration

[github]
# Personal access token for the CLI (or export GITHUB_TOKEN)
# token = "ghp_..."
# api_url = "https://api.github.com"
# timeout_secs = 30
# commits_per_page = 100

[oauth]
# OAuth app credentials for `repolens serve`
# client_id = "..."
# client_secret = "..."
# callback_url = "http://localhost:3001/api/auth/github/callback"
# scope = "read:user repo"

[server]
# host = "127.0.0.1"
# port = 3001
# frontend_url = "http://localhost:5173"
"#;
