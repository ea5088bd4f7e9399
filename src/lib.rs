//! Fellowship client core.
//!
//! Everything needed to bootstrap and keep an authenticated Twitter API
//! session alive from a native client:
//!
//! - [`oauth`]: OAuth 2.0 authorization-code flow with PKCE, plus refresh
//!   grants, driven through a pluggable interactive [`oauth::AuthorizePresenter`].
//! - [`session`]: the process-wide [`session::UserSession`] holding the
//!   current token/user pair, with the refresh token mirrored to the
//!   platform keychain and the user profile to disk.
//! - [`http`]: a bare [`http::HttpClient`] transport and the
//!   [`http::AuthHttpClient`] executor that injects bearer credentials and
//!   transparently refreshes them on expiry.
//! - [`services`]: typed Twitter v2 calls built on the executor.
//!
//! Capabilities are traits with one production implementation each, so any
//! seam can be swapped for a double in tests.

pub mod config;
pub mod http;
pub mod oauth;
pub mod services;
pub mod session;
pub mod storage;

mod shared;

pub use shared::error::{NetworkError, OAuthError};
pub use shared::security::mask_token;
