//! Configuration module for RepoLens
//!
//! This module handles:
//! - User-level configuration (~/.config/repolens/config.toml)
//! - Environment overrides (GITHUB_TOKEN, GITHUB_CLIENT_ID, PORT, ...)
//! - Resolved settings for the API client, OAuth flow, and HTTP server

mod settings;
mod user_config;

pub use settings::{GitHubSettings, OAuthSettings, ServerSettings};
pub use user_config::{GitHubSection, OAuthSection, ServerSection, UserConfig};
