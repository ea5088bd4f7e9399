//! Usage: Token-grant payload and token-endpoint response parsing.

use crate::shared::error::NetworkError;
use crate::shared::time::now_unix_millis;
use serde_json::Value;

/// One issued credential set. Immutable; a refresh replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    pub token_type: String,
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in_secs: i64,
    /// Stamped from the wall clock when the grant response was parsed.
    /// Strictly increases across successful grants, which is what the
    /// executor's staleness double-check relies on.
    pub issued_at_ms: i64,
}

impl AuthToken {
    pub fn expires_at_secs(&self) -> i64 {
        (self.issued_at_ms / 1000).saturating_add(self.expires_in_secs)
    }

    /// Parse a token-endpoint success body, stamping `issued_at_ms = now`.
    pub(crate) fn from_response_body(body: &[u8]) -> Result<Self, NetworkError> {
        let value: Value = serde_json::from_slice(body).map_err(|err| {
            tracing::warn!("token response json invalid: {}", err);
            NetworkError::InvalidResponse
        })?;

        let access_token = required_str(&value, "access_token")?;
        let refresh_token = required_str(&value, "refresh_token")?;
        let token_type = required_str(&value, "token_type")?;
        let scope = value
            .get("scope")
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        let expires_in_secs = value
            .get("expires_in")
            .and_then(parse_i64_lossy)
            .unwrap_or(0);

        Ok(Self {
            token_type,
            access_token,
            refresh_token,
            scope,
            expires_in_secs,
            issued_at_ms: now_unix_millis(),
        })
    }
}

fn required_str(value: &Value, key: &str) -> Result<String, NetworkError> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            tracing::warn!(field = key, "token response missing required field");
            NetworkError::InvalidResponse
        })
}

/// Providers have been seen returning `expires_in` as both number and string.
fn parse_i64_lossy(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}
