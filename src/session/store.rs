//! Usage: Process-wide session state: the `(token, user)` pair plus its
//! durable mirrors.
//!
//! One `RwLock` guards the pair so readers never observe a token without its
//! matching issue stamp, or a user without the token that authorized it.
//! The refresh token is mirrored to the secure store and the user profile to
//! the profile store; both mirrors are best-effort on write (a storage
//! hiccup must not fail a successful grant) and authoritative on cold start.

use crate::oauth::token::AuthToken;
use crate::session::user::User;
use crate::shared::lock_ext::RwLockExt;
use crate::shared::security::mask_token;
use crate::storage::{ProfileStore, SecureStore, StorageError};
use std::sync::{Arc, RwLock};

pub const REFRESH_TOKEN_KEY: &str = "oauth.refresh_token";

#[derive(Default)]
struct SessionInner {
    token: Option<AuthToken>,
    user: Option<User>,
}

pub struct UserSession {
    inner: RwLock<SessionInner>,
    secure: Arc<dyn SecureStore>,
    profiles: Arc<dyn ProfileStore>,
}

impl UserSession {
    pub fn new(secure: Arc<dyn SecureStore>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self {
            inner: RwLock::new(SessionInner::default()),
            secure,
            profiles,
        }
    }

    /// A user is only considered logged in once their profile is installed,
    /// which in turn requires a token.
    pub fn is_logged_in(&self) -> bool {
        self.inner.read_or_recover().user.is_some()
    }

    pub fn current_user(&self) -> Option<User> {
        self.inner.read_or_recover().user.clone()
    }

    /// Snapshot of the current credential, taken under one read guard.
    pub fn token(&self) -> Option<AuthToken> {
        self.inner.read_or_recover().token.clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.inner
            .read_or_recover()
            .token
            .as_ref()
            .map(|t| t.access_token.clone())
    }

    pub fn token_type(&self) -> Option<String> {
        self.inner
            .read_or_recover()
            .token
            .as_ref()
            .map(|t| t.token_type.clone())
    }

    pub fn issued_at_ms(&self) -> Option<i64> {
        self.inner
            .read_or_recover()
            .token
            .as_ref()
            .map(|t| t.issued_at_ms)
    }

    /// The refresh token, falling back to the secure store when no token is
    /// held in memory (cold start).
    pub fn refresh_token(&self) -> Option<String> {
        if let Some(token) = self.inner.read_or_recover().token.as_ref() {
            return Some(token.refresh_token.clone());
        }
        match self.secure.get(REFRESH_TOKEN_KEY) {
            Ok(value) => Some(value),
            Err(StorageError::NotFound) => None,
            Err(err) => {
                tracing::warn!("secure store read failed: {}", err);
                None
            }
        }
    }

    /// Install a freshly granted token and mirror its refresh token.
    pub fn set_token(&self, token: AuthToken) {
        let refresh_token = token.refresh_token.clone();
        tracing::debug!(
            access_token = %mask_token(&token.access_token),
            issued_at_ms = token.issued_at_ms,
            "session token replaced"
        );
        self.inner.write_or_recover().token = Some(token);

        if let Err(err) = self.secure.set(REFRESH_TOKEN_KEY, &refresh_token) {
            tracing::warn!("refresh token not persisted: {}", err);
        }
    }

    /// Install the authenticated user. Silently a no-op without a token:
    /// login without a prior grant is invalid by construction.
    pub fn login_user(&self, user: User) {
        {
            let mut inner = self.inner.write_or_recover();
            if inner.token.is_none() {
                tracing::warn!("login_user ignored: no token in session");
                return;
            }
            inner.user = Some(user.clone());
        }

        if let Err(err) = self.profiles.save(&user) {
            tracing::warn!("user profile not persisted: {}", err);
        }
    }

    /// Cold-start path: re-install the persisted profile as the current
    /// user. Same guard as [`UserSession::login_user`] — a token must
    /// already be present (i.e. a refresh grant has succeeded).
    pub fn restore_user(&self) -> Option<User> {
        let stored = match self.profiles.load() {
            Ok(stored) => stored?,
            Err(err) => {
                tracing::warn!("stored profile unreadable: {}", err);
                return None;
            }
        };

        let mut inner = self.inner.write_or_recover();
        if inner.token.is_none() {
            tracing::warn!("restore_user ignored: no token in session");
            return None;
        }
        inner.user = Some(stored.clone());
        Some(stored)
    }

    /// Clear the pair atomically and drop both durable mirrors.
    pub fn logout(&self) {
        {
            let mut inner = self.inner.write_or_recover();
            inner.token = None;
            inner.user = None;
        }

        if let Err(err) = self.secure.delete(REFRESH_TOKEN_KEY) {
            tracing::warn!("stored refresh token not deleted: {}", err);
        }
        if let Err(err) = self.profiles.clear() {
            tracing::warn!("stored profile not deleted: {}", err);
        }
        tracing::info!("session logged out");
    }
}
