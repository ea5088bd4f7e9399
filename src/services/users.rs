//! Usage: Authenticated-user lookup.

use crate::http::{AuthHttpClient, HttpRequest};
use crate::services::API_HOST;
use crate::session::user::User;
use crate::shared::error::NetworkError;
use async_trait::async_trait;
use std::sync::Arc;

const USER_FIELDS: &str = "profile_image_url,public_metrics";

#[async_trait]
pub trait UserService: Send + Sync {
    /// Fetch the profile of the user the current token belongs to.
    async fn get_me(&self) -> Result<User, NetworkError>;
}

pub struct DefaultUserService {
    auth_http: Arc<dyn AuthHttpClient>,
    host: String,
}

impl DefaultUserService {
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
}

#[async_trait]
impl UserService for DefaultUserService {
    async fn get_me(&self) -> Result<User, NetworkError> {
        let request =
            HttpRequest::get(self.host.as_str(), "/2/users/me").query("user.fields", USER_FIELDS);
        let body = self.auth_http.perform(request).await?;
        User::from_response_body(&body)
    }
}
