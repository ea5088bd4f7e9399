//! Usage: Bare HTTP transport mapping response statuses to typed errors.

use crate::http::request::{HttpMethod, HttpRequest};
use crate::shared::error::NetworkError;
use crate::shared::security::sanitize_error_body_snippet;
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const ACCEPT_HEADER: &str = "Accept";
const ACCEPT_JSON: &str = "application/json";

/// One request in, one typed outcome out. No retries live here; the
/// authenticated executor owns those.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn perform(&self, request: HttpRequest) -> Result<Bytes, NetworkError>;
}

pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Wrap an existing reqwest client (shared pools, custom proxies).
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("fellowship/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .unwrap_or_else(|err| {
                tracing::warn!("http client builder failed, using defaults: {}", err);
                reqwest::Client::new()
            });
        Self { client }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn perform(&self, request: HttpRequest) -> Result<Bytes, NetworkError> {
        let url = request.make_url()?;
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };

        let mut builder = self
            .client
            .request(method, url)
            .header(ACCEPT_HEADER, ACCEPT_JSON);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(|err| {
            tracing::warn!(
                host = %request.host,
                path = %request.path,
                "request dispatch failed: {}",
                err
            );
            NetworkError::InvalidResponse
        })?;

        let status = response.status().as_u16();
        if let Err(mapped) = map_status(status) {
            // Surface a redacted snippet of the error body for diagnostics
            // before the payload is dropped.
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(
                host = %request.host,
                path = %request.path,
                status = status,
                body = %sanitize_error_body_snippet(&body),
                "request failed with error status"
            );
            return Err(mapped);
        }

        response.bytes().await.map_err(|err| {
            tracing::warn!(
                host = %request.host,
                path = %request.path,
                "response body read failed: {}",
                err
            );
            NetworkError::InvalidResponse
        })
    }
}

/// 1xx/2xx/3xx pass through; everything else becomes a typed error.
pub(crate) fn map_status(status: u16) -> Result<(), NetworkError> {
    match status {
        code if !(100..600).contains(&code) => Err(NetworkError::InvalidResponse),
        401 => Err(NetworkError::Unauthorized),
        404 => Err(NetworkError::NotFound),
        code if (400..500).contains(&code) => Err(NetworkError::BadRequest(code)),
        503 => Err(NetworkError::ServiceUnavailable),
        code if (500..600).contains(&code) => Err(NetworkError::BadResponse(code)),
        _ => Ok(()),
    }
}
