//! Usage: OAuth 2.0 authorization-code flow with PKCE, plus refresh grants.

pub mod callback_server;
pub mod client;
pub mod presenter;
pub mod token;

pub(crate) mod pkce;

pub use client::{DefaultOAuthClient, OAuthClient};
pub use presenter::{AuthorizePresenter, BrowserPresenter, CallbackQuery};
pub use token::AuthToken;
