//! Usage: OAuth client driving the PKCE authorization-code flow and refresh
//! grants.
//!
//! `authenticate()` is a linear pass: mint PKCE material, build the
//! authorization URL, hand it to the presenter, validate the callback, then
//! exchange the code. The verifier and state live on the stack of that one
//! call, so nothing leaks between attempts.

use crate::config::OAuthConfig;
use crate::http::{HttpClient, HttpRequest};
use crate::oauth::pkce::{self, PkcePair};
use crate::oauth::presenter::AuthorizePresenter;
use crate::oauth::token::AuthToken;
use crate::shared::error::{NetworkError, OAuthError};
use crate::shared::security::{constant_time_eq, mask_token};
use async_trait::async_trait;
use reqwest::Url;
use std::sync::Arc;

const AUTH_CODE_GRANT_TYPE: &str = "authorization_code";
const REFRESH_TOKEN_GRANT_TYPE: &str = "refresh_token";
const CODE_CHALLENGE_METHOD: &str = "S256";

/// Obtains fresh credentials, either interactively or from a refresh token.
/// Never retries; transport errors surface unchanged.
#[async_trait]
pub trait OAuthClient: Send + Sync {
    /// Run the interactive PKCE code flow end to end.
    async fn authenticate(&self) -> Result<AuthToken, OAuthError>;

    /// Exchange a refresh token for a new credential set. No interaction.
    async fn refresh(&self, refresh_token: &str) -> Result<AuthToken, NetworkError>;
}

pub struct DefaultOAuthClient {
    config: OAuthConfig,
    http: Arc<dyn HttpClient>,
    presenter: Arc<dyn AuthorizePresenter>,
}

impl DefaultOAuthClient {
    pub fn new(
        config: OAuthConfig,
        http: Arc<dyn HttpClient>,
        presenter: Arc<dyn AuthorizePresenter>,
    ) -> Result<Self, OAuthError> {
        config.validate()?;
        Ok(Self {
            config,
            http,
            presenter,
        })
    }

    fn authorize_url(&self, code_challenge: &str, state: &str) -> Result<Url, OAuthError> {
        let mut url = Url::parse(&format!(
            "https://{}{}",
            self.config.auth_host.trim(),
            self.config.auth_path
        ))
        .map_err(|_| OAuthError::BadAuthorizationUrl)?;

        {
            let scope = self.config.scope();
            let redirect_uri = self.config.redirect_uri();
            let mut query = url.query_pairs_mut();
            query.append_pair("response_type", "code");
            query.append_pair("client_id", &self.config.client_id);
            query.append_pair("redirect_uri", &redirect_uri);
            query.append_pair("scope", &scope);
            query.append_pair("state", state);
            query.append_pair("code_challenge", code_challenge);
            query.append_pair("code_challenge_method", CODE_CHALLENGE_METHOD);
        }
        Ok(url)
    }

    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<AuthToken, NetworkError> {
        let request = HttpRequest::post(&self.config.token_host, &self.config.token_path)
            .json_body(&serde_json::json!({
                "grant_type": AUTH_CODE_GRANT_TYPE,
                "code": code,
                "client_id": self.config.client_id,
                "redirect_uri": self.config.redirect_uri(),
                "code_verifier": code_verifier,
            }))?;

        let body = self.http.perform(request).await?;
        AuthToken::from_response_body(&body)
    }
}

#[async_trait]
impl OAuthClient for DefaultOAuthClient {
    async fn authenticate(&self) -> Result<AuthToken, OAuthError> {
        let pkce = PkcePair::generate()?;
        let state = pkce::generate_state()?;
        let authorize_url = self.authorize_url(&pkce.code_challenge, &state)?;

        let callback = self.presenter.present(authorize_url.as_str()).await?;

        if let Some(error) = callback.error {
            tracing::warn!(error = %error, "authorization denied by provider");
            return Err(OAuthError::ProviderDenied {
                error,
                description: callback.error_description,
            });
        }

        let returned_state = callback.state.ok_or(OAuthError::MissingState)?;
        if !constant_time_eq(returned_state.as_bytes(), state.as_bytes()) {
            tracing::warn!("authorization callback state mismatch");
            return Err(OAuthError::StateMismatch);
        }
        let code = callback.code.ok_or(OAuthError::MissingCode)?;

        let token = self.exchange_code(&code, &pkce.code_verifier).await?;
        tracing::info!(
            access_token = %mask_token(&token.access_token),
            "authorization code exchanged for token"
        );
        Ok(token)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthToken, NetworkError> {
        let request = HttpRequest::post(&self.config.token_host, &self.config.token_path)
            .json_body(&serde_json::json!({
                "grant_type": REFRESH_TOKEN_GRANT_TYPE,
                "refresh_token": refresh_token,
                "client_id": self.config.client_id,
            }))?;

        let body = self.http.perform(request).await?;
        let token = AuthToken::from_response_body(&body)?;
        tracing::debug!(
            access_token = %mask_token(&token.access_token),
            "refresh grant issued new token"
        );
        Ok(token)
    }
}
