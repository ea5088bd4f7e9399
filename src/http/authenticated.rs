//! Usage: Authenticated request executor: bearer injection, single-flight
//! refresh on 401, bounded retry.
//!
//! The refresh lock is distinct from the session lock and is held only
//! around the check/refresh/install decision, so unrelated in-flight
//! requests never serialize on it. The staleness double-check under that
//! lock is what keeps N concurrent 401s from issuing N refresh grants: the
//! first caller through refreshes, everyone else sees a strictly newer
//! issue stamp and just retries.

use crate::http::request::HttpRequest;
use crate::http::transport::HttpClient;
use crate::oauth::client::OAuthClient;
use crate::session::store::UserSession;
use crate::shared::error::NetworkError;
use crate::shared::time::now_unix_millis;
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use tokio::sync::Mutex;

/// One refresh-and-retry cycle per logical call.
pub const DEFAULT_RETRY_BUDGET: u32 = 1;

const AUTHORIZATION_HEADER: &str = "Authorization";

/// Executes requests with a valid bearer token, refreshing transparently on
/// expiry. The sole retry authority in the stack, and only for
/// [`NetworkError::Unauthorized`].
#[async_trait]
pub trait AuthHttpClient: Send + Sync {
    async fn perform_with_retries(
        &self,
        request: HttpRequest,
        retries_remaining: u32,
    ) -> Result<Bytes, NetworkError>;

    async fn perform(&self, request: HttpRequest) -> Result<Bytes, NetworkError> {
        self.perform_with_retries(request, DEFAULT_RETRY_BUDGET)
            .await
    }
}

pub struct DefaultAuthHttpClient {
    http: Arc<dyn HttpClient>,
    oauth: Arc<dyn OAuthClient>,
    session: Arc<UserSession>,
    refresh_lock: Mutex<()>,
}

impl DefaultAuthHttpClient {
    pub fn new(
        http: Arc<dyn HttpClient>,
        oauth: Arc<dyn OAuthClient>,
        session: Arc<UserSession>,
    ) -> Self {
        Self {
            http,
            oauth,
            session,
            refresh_lock: Mutex::new(()),
        }
    }

    /// Runs under the refresh lock. Returns `Ok(())` when a retry is worth
    /// attempting, whether this caller refreshed or a concurrent one already
    /// had.
    async fn refresh_after_unauthorized(&self, injected_at_ms: i64) -> Result<(), NetworkError> {
        let _guard = self.refresh_lock.lock().await;

        if self
            .session
            .issued_at_ms()
            .is_some_and(|issued_at| issued_at > injected_at_ms)
        {
            tracing::debug!("token already refreshed by a concurrent caller");
            return Ok(());
        }

        let refresh_token = self
            .session
            .refresh_token()
            .ok_or(NetworkError::Unauthorized)?;

        match self.oauth.refresh(&refresh_token).await {
            Ok(token) => {
                self.session.set_token(token);
                Ok(())
            }
            Err(NetworkError::BadRequest(status)) => {
                // The provider answers an invalid or expired refresh token
                // with a plain bad request; the canonical signal for callers
                // is "re-authenticate".
                tracing::warn!(
                    status = status,
                    "refresh grant rejected; treating as unauthorized"
                );
                Err(NetworkError::Unauthorized)
            }
            Err(err) => Err(err),
        }
    }
}

#[async_trait]
impl AuthHttpClient for DefaultAuthHttpClient {
    async fn perform_with_retries(
        &self,
        request: HttpRequest,
        retries_remaining: u32,
    ) -> Result<Bytes, NetworkError> {
        let mut retries_remaining = retries_remaining;
        loop {
            // No credential at all: nothing to even try.
            let token = self.session.token().ok_or(NetworkError::Unauthorized)?;
            let injected_at_ms = now_unix_millis();
            let authed = request.clone().header(
                AUTHORIZATION_HEADER,
                format!("{} {}", token.token_type, token.access_token),
            );

            match self.http.perform(authed).await {
                Ok(body) => return Ok(body),
                Err(NetworkError::Unauthorized) => {
                    if retries_remaining == 0 {
                        return Err(NetworkError::Unauthorized);
                    }
                    tracing::debug!(
                        host = %request.host,
                        path = %request.path,
                        retries_remaining = retries_remaining,
                        "unauthorized response; coordinating token refresh"
                    );
                    self.refresh_after_unauthorized(injected_at_ms).await?;
                    retries_remaining -= 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
