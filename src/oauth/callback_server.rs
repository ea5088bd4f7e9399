//! Usage: One-shot loopback listener for the OAuth authorization redirect.

use crate::oauth::presenter::CallbackQuery;
use reqwest::Url;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const SUCCESS_HTML: &str =
    "<html><body><h1>Login complete</h1><p>You may close this window and return to Fellowship.</p></body></html>";
const ERROR_HTML: &str =
    "<html><body><h1>Login failed</h1><p>You may close this window and retry.</p></body></html>";
const MAX_REQUEST_BYTES: usize = 8192;

#[derive(Debug)]
pub(crate) struct BoundCallbackListener {
    listener_v4: Option<TcpListener>,
    listener_v6: Option<TcpListener>,
}

/// Bind the registered callback port on both loopback stacks. The port is
/// part of the provider-registered redirect URI, so there is no fallback to
/// a dynamic port here.
pub(crate) async fn bind_callback_listener(port: u16) -> Result<BoundCallbackListener, String> {
    let mut bind_errors: Vec<String> = Vec::new();
    let listener_v4 = match TcpListener::bind(("127.0.0.1", port)).await {
        Ok(listener) => Some(listener),
        Err(err) => {
            bind_errors.push(format!("127.0.0.1:{port} ({err})"));
            None
        }
    };
    let listener_v6 = match TcpListener::bind(("::1", port)).await {
        Ok(listener) => Some(listener),
        Err(err) => {
            bind_errors.push(format!("::1:{port} ({err})"));
            None
        }
    };
    if listener_v4.is_none() && listener_v6.is_none() {
        return Err(format!("callback bind failed: {}", bind_errors.join("; ")));
    }

    Ok(BoundCallbackListener {
        listener_v4,
        listener_v6,
    })
}

/// Accept exactly one redirect hit, answer it with a small HTML page, and
/// return the parsed query.
pub(crate) async fn wait_for_callback(
    mut listener: BoundCallbackListener,
    expected_path: &str,
    timeout: Duration,
) -> Result<CallbackQuery, String> {
    let accept_future = async {
        match (listener.listener_v4.as_mut(), listener.listener_v6.as_mut()) {
            (Some(v4), Some(v6)) => {
                tokio::select! {
                    result = v4.accept() => result,
                    result = v6.accept() => result,
                }
            }
            (Some(v4), None) => v4.accept().await,
            (None, Some(v6)) => v6.accept().await,
            (None, None) => unreachable!("listeners checked at bind time"),
        }
    };

    let (mut socket, _) = tokio::time::timeout(timeout, accept_future)
        .await
        .map_err(|_| "callback wait timed out".to_string())?
        .map_err(|e| format!("callback accept failed: {e}"))?;

    let mut buffer = vec![0u8; MAX_REQUEST_BYTES];
    let size = socket
        .read(&mut buffer)
        .await
        .map_err(|e| format!("callback read failed: {e}"))?;
    if size == 0 {
        return Err("callback request is empty".to_string());
    }

    let request = String::from_utf8_lossy(&buffer[..size]);
    let target = extract_request_target(request.as_ref())?;
    let query = parse_callback_target(target, expected_path)?;

    let is_error = query.error.is_some();
    let body = if is_error { ERROR_HTML } else { SUCCESS_HTML };
    let status = if is_error {
        "HTTP/1.1 400 Bad Request"
    } else {
        "HTTP/1.1 200 OK"
    };
    let response = format!(
        "{status}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;

    Ok(query)
}

fn extract_request_target(request: &str) -> Result<&str, String> {
    let first = request
        .lines()
        .next()
        .ok_or_else(|| "callback request is malformed".to_string())?;
    let mut parts = first.split_whitespace();
    let method = parts.next().unwrap_or_default();
    let target = parts.next().unwrap_or_default();
    if method != "GET" || target.is_empty() {
        return Err("callback must be a GET request".to_string());
    }
    Ok(target)
}

pub(crate) fn parse_callback_target(
    target: &str,
    expected_path: &str,
) -> Result<CallbackQuery, String> {
    let url = Url::parse(&format!("http://127.0.0.1{target}"))
        .map_err(|e| format!("invalid callback target: {e}"))?;

    if url.path() != expected_path {
        return Err(format!("unexpected callback path {}", url.path()));
    }

    let mut query = CallbackQuery::default();
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => query.code = Some(value.to_string()),
            "state" => query.state = Some(value.to_string()),
            "error" => query.error = Some(value.to_string()),
            "error_description" => query.error_description = Some(value.to_string()),
            _ => {}
        }
    }

    if query.code.is_none() && query.error.is_none() {
        return Err("callback carries neither code nor error".to_string());
    }

    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_callback_target_extracts_code_and_state() {
        let query =
            parse_callback_target("/callback?code=abc123&state=xyz", "/callback").expect("query");
        assert_eq!(query.code.as_deref(), Some("abc123"));
        assert_eq!(query.state.as_deref(), Some("xyz"));
        assert!(query.error.is_none());
    }

    #[test]
    fn parse_callback_target_accepts_provider_error() {
        let query = parse_callback_target(
            "/callback?error=access_denied&error_description=nope&state=xyz",
            "/callback",
        )
        .expect("query");
        assert_eq!(query.error.as_deref(), Some("access_denied"));
        assert_eq!(query.error_description.as_deref(), Some("nope"));
        assert_eq!(query.state.as_deref(), Some("xyz"));
    }

    #[test]
    fn parse_callback_target_rejects_unexpected_path() {
        let err = parse_callback_target("/other?code=abc", "/callback").expect_err("path");
        assert!(err.contains("unexpected callback path"));
    }

    #[test]
    fn parse_callback_target_rejects_empty_query() {
        let err = parse_callback_target("/callback", "/callback").expect_err("empty");
        assert!(err.contains("neither code nor error"));
    }

    #[tokio::test]
    async fn listener_answers_one_redirect_hit() {
        let listener = bind_callback_listener(0).await.expect("bind");
        let port = listener
            .listener_v4
            .as_ref()
            .or(listener.listener_v6.as_ref())
            .expect("listener")
            .local_addr()
            .expect("addr")
            .port();

        let wait = tokio::spawn(async move {
            wait_for_callback(listener, "/callback", Duration::from_secs(5)).await
        });

        let mut stream = tokio::net::TcpStream::connect(("127.0.0.1", port))
            .await
            .expect("connect");
        stream
            .write_all(b"GET /callback?code=abc&state=s1 HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await
            .expect("write");
        let mut response = String::new();
        stream.read_to_string(&mut response).await.expect("read");
        assert!(response.starts_with("HTTP/1.1 200 OK"));

        let query = wait.await.expect("join").expect("callback");
        assert_eq!(query.code.as_deref(), Some("abc"));
        assert_eq!(query.state.as_deref(), Some("s1"));
    }
}
