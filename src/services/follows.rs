//! Usage: Follower/following list lookups.

use crate::http::{AuthHttpClient, HttpRequest};
use crate::services::API_HOST;
use crate::session::user::UserList;
use crate::shared::error::NetworkError;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait FollowSearchService: Send + Sync {
    async fn following(&self, user_id: &str) -> Result<UserList, NetworkError>;
    async fn followers(&self, user_id: &str) -> Result<UserList, NetworkError>;
}

pub struct DefaultFollowSearchService {
    auth_http: Arc<dyn AuthHttpClient>,
    host: String,
}

impl DefaultFollowSearchService {
    pub fn new(auth_http: Arc<dyn AuthHttpClient>) -> Self {
        Self::with_host(auth_http, API_HOST)
    }

    /// Point at a non-production API host (staging, local doubles).
    pub fn with_host(auth_http: Arc<dyn AuthHttpClient>, host: impl Into<String>) -> Self {
        Self {
            auth_http,
            host: host.into(),
        }
    }

    async fn user_list(&self, path: String) -> Result<UserList, NetworkError> {
        let body = self
            .auth_http
            .perform(HttpRequest::get(self.host.as_str(), path))
            .await?;
        UserList::from_response_body(&body)
    }
}

#[async_trait]
impl FollowSearchService for DefaultFollowSearchService {
    async fn following(&self, user_id: &str) -> Result<UserList, NetworkError> {
        self.user_list(format!("/2/users/{user_id}/following")).await
    }

    async fn followers(&self, user_id: &str) -> Result<UserList, NetworkError> {
        self.user_list(format!("/2/users/{user_id}/followers")).await
    }
}
