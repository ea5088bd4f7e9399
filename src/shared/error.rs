//! Usage: Typed error taxonomy for transport and OAuth failures.

use thiserror::Error;

/// Outcome of a single bare HTTP dispatch, keyed off the response status.
///
/// Transport maps statuses to these variants and never retries; the
/// authenticated executor is the only component that reacts to
/// [`NetworkError::Unauthorized`] with a refresh-and-retry cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// The request could not be turned into a valid URL.
    #[error("request URL could not be constructed")]
    InvalidUrl,
    /// The response was missing, unreadable, or outside the HTTP status range.
    #[error("response was malformed or could not be read")]
    InvalidResponse,
    /// 401 from the server, or no credential available to send at all.
    #[error("unauthorized")]
    Unauthorized,
    /// 404.
    #[error("resource not found")]
    NotFound,
    /// Any other 4xx.
    #[error("bad request (status {0})")]
    BadRequest(u16),
    /// 503.
    #[error("service unavailable")]
    ServiceUnavailable,
    /// Any other 5xx.
    #[error("bad response (status {0})")]
    BadResponse(u16),
}

/// Failures of the interactive PKCE authorization flow.
///
/// Token-endpoint failures surface as [`OAuthError::Network`] unchanged, so
/// callers can tell a user-driven failure (denied, tampered state) apart from
/// plain transport trouble.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OAuthError {
    /// Secure random generation for the code verifier or state failed.
    #[error("secure random generation for the code verifier failed")]
    FailedCodeVerifier,
    /// Reserved: deriving the S256 challenge from the verifier failed.
    #[error("code challenge derivation failed")]
    FailedCodeChallenge,
    /// The configured authorization endpoint could not form a URL.
    #[error("authorization URL could not be constructed")]
    BadAuthorizationUrl,
    /// The callback carried no `state` parameter.
    #[error("authorization callback did not include a state value")]
    MissingState,
    /// The callback `state` did not match the one minted for this attempt.
    #[error("authorization callback state did not match this attempt")]
    StateMismatch,
    /// The callback carried no authorization `code`.
    #[error("authorization callback did not include an authorization code")]
    MissingCode,
    /// The interactive surface itself failed (bind, timeout, cancelled).
    #[error("authorization presenter failed: {0}")]
    PresenterFailed(String),
    /// The provider redirected back with an explicit error.
    #[error("authorization denied by provider: {error}")]
    ProviderDenied {
        error: String,
        description: Option<String>,
    },
    /// Token-endpoint transport failure, propagated unchanged.
    #[error(transparent)]
    Network(#[from] NetworkError),
}
