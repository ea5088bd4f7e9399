//! Usage: Value-type HTTP request with HTTPS URL assembly.

use crate::shared::error::NetworkError;
use bytes::Bytes;
use reqwest::Url;
use serde::Serialize;

pub(crate) const CONTENT_TYPE_HEADER: &str = "Content-Type";
pub(crate) const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// A request described by value. Cloning is cheap, so callers (and the
/// authenticated executor) can decorate a copy per attempt without touching
/// the original.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub host: String,
    pub path: String,
    pub method: HttpMethod,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Bytes>,
}

impl HttpRequest {
    pub fn get(host: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(host, path, HttpMethod::Get)
    }

    pub fn post(host: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(host, path, HttpMethod::Post)
    }

    fn new(host: impl Into<String>, path: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            host: host.into(),
            path: path.into(),
            method,
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Serialize `payload` as the JSON body and tag the content type.
    pub fn json_body<T: Serialize>(mut self, payload: &T) -> Result<Self, NetworkError> {
        let encoded = serde_json::to_vec(payload).map_err(|err| {
            tracing::warn!("request body serialization failed: {}", err);
            NetworkError::InvalidUrl
        })?;
        self.body = Some(Bytes::from(encoded));
        self.headers
            .push((CONTENT_TYPE_HEADER.to_string(), JSON_CONTENT_TYPE.to_string()));
        Ok(self)
    }

    /// Assemble the `https://{host}{path}?{query}` URL. Loopback hosts
    /// (dev servers, test doubles) are dialed over plain HTTP instead.
    pub fn make_url(&self) -> Result<Url, NetworkError> {
        let host = self.host.trim();
        // Reject hosts that smuggle in a path, query, or userinfo of their
        // own.
        if host.is_empty()
            || host
                .chars()
                .any(|c| matches!(c, '/' | '?' | '#' | '@' | ' '))
        {
            return Err(NetworkError::InvalidUrl);
        }
        if !self.path.is_empty() && !self.path.starts_with('/') {
            return Err(NetworkError::InvalidUrl);
        }

        let scheme = if is_loopback_host(host) { "http" } else { "https" };
        let mut url = Url::parse(&format!("{scheme}://{host}{}", self.path))
            .map_err(|_| NetworkError::InvalidUrl)?;

        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &self.query {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }
}

fn is_loopback_host(host: &str) -> bool {
    if host == "[::1]" {
        return true;
    }
    let name = host.rsplit_once(':').map_or(host, |(name, _)| name);
    name.eq_ignore_ascii_case("localhost") || name == "127.0.0.1" || name == "[::1]"
}
