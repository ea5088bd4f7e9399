//! Usage: HTTP request model, bare transport, and the authenticated executor.

pub mod authenticated;
pub mod request;
pub mod transport;

pub use authenticated::{AuthHttpClient, DefaultAuthHttpClient, DEFAULT_RETRY_BUDGET};
pub use request::{HttpMethod, HttpRequest};
pub use transport::{HttpClient, ReqwestHttpClient};
