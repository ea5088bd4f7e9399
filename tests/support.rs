//! Shared doubles and builders for the integration suites.

#![allow(dead_code)]

use async_trait::async_trait;
use fellowship::config::OAuthConfig;
use fellowship::oauth::token::AuthToken;
use fellowship::oauth::{AuthorizePresenter, CallbackQuery};
use fellowship::session::UserSession;
use fellowship::storage::{MemoryProfileStore, MemorySecureStore};
use fellowship::OAuthError;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

/// Presenter double behaving like a well-behaved provider: echoes the state
/// from the authorization URL back with a canned code.
pub struct EchoPresenter {
    pub code: String,
}

impl EchoPresenter {
    pub fn new(code: &str) -> Self {
        Self {
            code: code.to_string(),
        }
    }
}

#[async_trait]
impl AuthorizePresenter for EchoPresenter {
    async fn present(&self, authorize_url: &str) -> Result<CallbackQuery, OAuthError> {
        let url = reqwest::Url::parse(authorize_url).expect("authorize url");
        let params: HashMap<String, String> = url.query_pairs().into_owned().collect();
        Ok(CallbackQuery {
            code: Some(self.code.clone()),
            state: params.get("state").cloned(),
            error: None,
            error_description: None,
        })
    }
}

/// Twitter-shaped config whose token endpoint points at a local mock server.
pub fn config_against(server_addr: &SocketAddr) -> OAuthConfig {
    let mut config = OAuthConfig::twitter("client-123");
    config.token_host = format!("127.0.0.1:{}", server_addr.port());
    config
}

pub fn memory_session() -> (
    Arc<UserSession>,
    Arc<MemorySecureStore>,
    Arc<MemoryProfileStore>,
) {
    let secure = Arc::new(MemorySecureStore::default());
    let profiles = Arc::new(MemoryProfileStore::default());
    let session = Arc::new(UserSession::new(secure.clone(), profiles.clone()));
    (session, secure, profiles)
}

pub fn token_response_json(label: &str) -> serde_json::Value {
    serde_json::json!({
        "token_type": "bearer",
        "expires_in": 7200,
        "access_token": format!("{label}-access"),
        "refresh_token": format!("{label}-refresh"),
        "scope": "tweet.read users.read follows.read offline.access"
    })
}

pub fn seeded_token(label: &str, issued_at_ms: i64) -> AuthToken {
    AuthToken {
        token_type: "bearer".to_string(),
        access_token: format!("{label}-access"),
        refresh_token: format!("{label}-refresh"),
        scope: "tweet.read".to_string(),
        expires_in_secs: 7200,
        issued_at_ms,
    }
}

pub fn me_response_json() -> serde_json::Value {
    serde_json::json!({
        "data": {
            "id": "12345",
            "name": "Jess Example",
            "username": "jess",
            "profile_image_url": "https://pbs.twimg.com/profile_images/1/photo_normal.jpg",
            "public_metrics": {"followers_count": 10, "following_count": 20}
        }
    })
}
