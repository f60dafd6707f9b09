//! GitHub OAuth web flow
//!
//! Builds the authorize redirect and exchanges the callback `code` for an
//! access token. The token is handed back to the caller and never stored.

use super::client::make_agent;
use crate::config::OAuthSettings;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum OAuthError {
    #[error("OAuth is not configured: missing {0}")]
    NotConfigured(&'static str),

    #[error("GitHub rejected the authorization code: {0}")]
    Rejected(String),

    #[error("Token exchange failed: {0}")]
    Request(String),

    #[error("Failed to parse token response: {0}")]
    Decode(String),

    #[error("Token response did not contain an access token")]
    MissingToken,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

pub struct OAuthClient {
    settings: OAuthSettings,
}

impl OAuthClient {
    pub fn new(settings: OAuthSettings) -> Self {
        Self { settings }
    }

    fn client_id(&self) -> Result<&str, OAuthError> {
        self.settings
            .client_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(OAuthError::NotConfigured("client_id"))
    }

    /// URL the browser is redirected to for consent
    pub fn authorize_url(&self, state: &str) -> Result<String, OAuthError> {
        let client_id = self.client_id()?;
        let mut url = format!(
            "{}?client_id={}&scope={}&state={}",
            self.settings.authorize_url,
            urlencoding::encode(client_id),
            urlencoding::encode(&self.settings.scope),
            urlencoding::encode(state),
        );
        if let Some(callback) = &self.settings.callback_url {
            url.push_str("&redirect_uri=");
            url.push_str(&urlencoding::encode(callback));
        }
        Ok(url)
    }

    /// Exchange the callback code for an access token (blocking)
    pub fn exchange_code(&self, code: &str) -> Result<String, OAuthError> {
        let client_id = self.client_id()?;
        let client_secret = self
            .settings
            .client_secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(OAuthError::NotConfigured("client_secret"))?;

        let mut body = serde_json::json!({
            "client_id": client_id,
            "client_secret": client_secret,
            "code": code,
        });
        if let Some(callback) = &self.settings.callback_url {
            body["redirect_uri"] = serde_json::Value::String(callback.clone());
        }

        debug!("Exchanging OAuth code at {}", self.settings.token_url);
        let response = make_agent(self.settings.timeout)
            .post(&self.settings.token_url)
            .header("Accept", "application/json")
            .send_json(&body)
            .map_err(|e| OAuthError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        if status >= 400 {
            let text = response.into_body().read_to_string().unwrap_or_default();
            return Err(OAuthError::Request(format!("{} - {}", status, text)));
        }

        let parsed: TokenResponse = response
            .into_body()
            .read_json()
            .map_err(|e| OAuthError::Decode(e.to_string()))?;
        token_from_response(parsed)
    }
}

/// GitHub answers a bad code with 200 and an `error` field
fn token_from_response(response: TokenResponse) -> Result<String, OAuthError> {
    if let Some(error) = response.error {
        return Err(OAuthError::Rejected(
            response.error_description.unwrap_or(error),
        ));
    }
    response
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or(OAuthError::MissingToken)
}
