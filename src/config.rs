//! Usage: OAuth endpoint configuration with Fellowship defaults.

use crate::shared::error::OAuthError;
use std::time::Duration;

const TWITTER_AUTH_HOST: &str = "twitter.com";
const TWITTER_AUTH_PATH: &str = "/i/oauth2/authorize";
const TWITTER_TOKEN_HOST: &str = "api.twitter.com";
const TWITTER_TOKEN_PATH: &str = "/2/oauth2/token";
const TWITTER_SCOPES: &[&str] = &[
    "tweet.read",
    "users.read",
    "follows.read",
    "offline.access",
];

pub const DEFAULT_CALLBACK_PORT: u16 = 8585;
pub const DEFAULT_CALLBACK_PATH: &str = "/callback";
const DEFAULT_PRESENTER_TIMEOUT: Duration = Duration::from_secs(300);

/// Endpoints and client identity for one OAuth provider.
///
/// The redirect URI is always the loopback listener; its port/path must match
/// what the provider has registered for the client id.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub auth_host: String,
    pub auth_path: String,
    pub token_host: String,
    pub token_path: String,
    pub client_id: String,
    pub scopes: Vec<String>,
    pub callback_port: u16,
    pub callback_path: String,
    pub presenter_timeout: Duration,
}

impl OAuthConfig {
    /// Twitter v2 endpoints with the read scopes Fellowship needs plus
    /// `offline.access` for refresh tokens.
    pub fn twitter(client_id: impl Into<String>) -> Self {
        Self {
            auth_host: TWITTER_AUTH_HOST.to_string(),
            auth_path: TWITTER_AUTH_PATH.to_string(),
            token_host: TWITTER_TOKEN_HOST.to_string(),
            token_path: TWITTER_TOKEN_PATH.to_string(),
            client_id: client_id.into(),
            scopes: TWITTER_SCOPES.iter().map(|s| s.to_string()).collect(),
            callback_port: DEFAULT_CALLBACK_PORT,
            callback_path: DEFAULT_CALLBACK_PATH.to_string(),
            presenter_timeout: DEFAULT_PRESENTER_TIMEOUT,
        }
    }

    pub fn redirect_uri(&self) -> String {
        format!("http://127.0.0.1:{}{}", self.callback_port, self.callback_path)
    }

    pub fn scope(&self) -> String {
        self.scopes.join(" ")
    }

    pub fn validate(&self) -> Result<(), OAuthError> {
        let required = [
            &self.auth_host,
            &self.auth_path,
            &self.token_host,
            &self.token_path,
            &self.client_id,
        ];
        if required.iter().any(|v| v.trim().is_empty()) {
            return Err(OAuthError::BadAuthorizationUrl);
        }
        if self.scopes.is_empty() || !self.callback_path.starts_with('/') {
            return Err(OAuthError::BadAuthorizationUrl);
        }
        Ok(())
    }
}
