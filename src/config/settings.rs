//! Resolved runtime settings
//!
//! Built from [`UserConfig`](super::UserConfig) with defaults filled in.

use std::time::Duration;

/// Settings for the GitHub REST API client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubSettings {
    pub api_url: String,
    /// Deadline applied to every request made by one client
    pub timeout: Duration,
    pub commits_per_page: u32,
    pub user_agent: String,
}

impl GitHubSettings {
    /// GitHub's maximum page size
    pub const MAX_PER_PAGE: u32 = 100;
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            timeout: Duration::from_secs(30),
            commits_per_page: Self::MAX_PER_PAGE,
            user_agent: concat!("repolens/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// OAuth app settings for the web login flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthSettings {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub callback_url: Option<String>,
    pub authorize_url: String,
    pub token_url: String,
    pub scope: String,
    pub timeout: Duration,
}

impl Default for OAuthSettings {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            callback_url: None,
            authorize_url: "https://github.com/login/oauth/authorize".to_string(),
            token_url: "https://github.com/login/oauth/access_token".to_string(),
            scope: "read:user repo".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            frontend_url: "http://localhost:5173".to_string(),
        }
    }
}
