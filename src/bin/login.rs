//! Interactive login walkthrough: restores a persisted session when a
//! refresh token is available, otherwise runs the browser PKCE flow, then
//! prints the authenticated user.

use fellowship::config::OAuthConfig;
use fellowship::http::{DefaultAuthHttpClient, ReqwestHttpClient};
use fellowship::oauth::{AuthorizePresenter, BrowserPresenter, DefaultOAuthClient, OAuthClient};
use fellowship::services::{DefaultUserService, UserService};
use fellowship::session::UserSession;
use fellowship::storage::{FileProfileStore, KeyringStore};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const KEYCHAIN_SERVICE: &str = "com.fellowship.client";
const CLIENT_ID_ENV: &str = "FELLOWSHIP_CLIENT_ID";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(message) = run().await {
        tracing::error!("{}", message);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let client_id = std::env::var(CLIENT_ID_ENV)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| format!("set {CLIENT_ID_ENV} to your registered OAuth client id"))?;

    let config = OAuthConfig::twitter(client_id);
    let profiles = FileProfileStore::in_data_dir()
        .map_err(|e| format!("profile store unavailable: {e}"))?;
    let session = Arc::new(UserSession::new(
        Arc::new(KeyringStore::new(KEYCHAIN_SERVICE)),
        Arc::new(profiles),
    ));

    let http = Arc::new(ReqwestHttpClient::default());
    let presenter: Arc<dyn AuthorizePresenter> = Arc::new(BrowserPresenter::new(
        config.callback_port,
        config.callback_path.clone(),
        config.presenter_timeout,
    ));
    let oauth = Arc::new(
        DefaultOAuthClient::new(config, http.clone(), presenter)
            .map_err(|e| format!("oauth client init failed: {e}"))?,
    );

    bootstrap_session(&session, oauth.as_ref()).await?;

    let auth_http = Arc::new(DefaultAuthHttpClient::new(http, oauth, session.clone()));
    let users = DefaultUserService::new(auth_http);
    let user = users
        .get_me()
        .await
        .map_err(|e| format!("user lookup failed: {e}"))?;
    session.login_user(user.clone());

    println!("logged in as @{} ({})", user.username, user.name);
    if let Some(metrics) = user.follow_metrics {
        println!(
            "{} followers, {} following",
            metrics.followers, metrics.following
        );
    }
    Ok(())
}

/// Prefer a silent refresh from the persisted token; fall back to the
/// interactive browser flow.
async fn bootstrap_session(
    session: &Arc<UserSession>,
    oauth: &(impl OAuthClient + ?Sized),
) -> Result<(), String> {
    if let Some(refresh_token) = session.refresh_token() {
        match oauth.refresh(&refresh_token).await {
            Ok(token) => {
                session.set_token(token);
                if session.restore_user().is_some() {
                    tracing::info!("session restored from persisted refresh token");
                }
                return Ok(());
            }
            Err(err) => {
                tracing::warn!("persisted refresh token rejected ({}), logging in", err);
                session.logout();
            }
        }
    }

    let token = oauth
        .authenticate()
        .await
        .map_err(|e| format!("interactive login failed: {e}"))?;
    session.set_token(token);
    Ok(())
}
