//! End-to-end OAuth flows against a mock token endpoint.

mod support;

use fellowship::http::ReqwestHttpClient;
use fellowship::oauth::{DefaultOAuthClient, OAuthClient};
use fellowship::NetworkError;
use std::sync::Arc;
use support::{config_against, token_response_json, EchoPresenter};
use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN_PATH: &str = "/2/oauth2/token";

fn oauth_client(server: &MockServer, presenter: EchoPresenter) -> DefaultOAuthClient {
    DefaultOAuthClient::new(
        config_against(server.address()),
        Arc::new(ReqwestHttpClient::default()),
        Arc::new(presenter),
    )
    .expect("oauth client")
}

#[tokio::test]
async fn authenticate_exchanges_code_with_pkce_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_partial_json(serde_json::json!({
            "grant_type": "authorization_code",
            "code": "auth-code-1",
            "client_id": "client-123",
            "redirect_uri": "http://127.0.0.1:8585/callback"
        })))
        .and(body_string_contains("code_verifier"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response_json("initial")))
        .expect(1)
        .mount(&server)
        .await;

    let client = oauth_client(&server, EchoPresenter::new("auth-code-1"));
    let token = client.authenticate().await.expect("token");

    assert_eq!(token.token_type, "bearer");
    assert_eq!(token.access_token, "initial-access");
    assert_eq!(token.refresh_token, "initial-refresh");
    assert_eq!(token.expires_in_secs, 7200);
    assert!(token.issued_at_ms > 0);
}

#[tokio::test]
async fn refresh_posts_refresh_grant_and_stamps_newer_issue_time() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_partial_json(serde_json::json!({
            "grant_type": "refresh_token",
            "refresh_token": "initial-refresh",
            "client_id": "client-123"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(token_response_json("rotated"))
                .set_delay(std::time::Duration::from_millis(5)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = oauth_client(&server, EchoPresenter::new("unused"));
    let before = support::seeded_token("initial", 0);
    let token = client.refresh("initial-refresh").await.expect("token");

    assert_eq!(token.access_token, "rotated-access");
    assert_eq!(token.refresh_token, "rotated-refresh");
    assert!(token.issued_at_ms > before.issued_at_ms);
}

#[tokio::test]
async fn refresh_surfaces_bad_request_without_normalizing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({"error": "invalid_grant"})),
        )
        .mount(&server)
        .await;

    let client = oauth_client(&server, EchoPresenter::new("unused"));
    // Normalizing to Unauthorized is the executor's business, not ours.
    assert_eq!(
        client.refresh("expired-refresh").await,
        Err(NetworkError::BadRequest(400))
    );
}

#[tokio::test]
async fn refresh_surfaces_service_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = oauth_client(&server, EchoPresenter::new("unused"));
    assert_eq!(
        client.refresh("some-refresh").await,
        Err(NetworkError::ServiceUnavailable)
    );
}

#[tokio::test]
async fn malformed_token_response_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = oauth_client(&server, EchoPresenter::new("unused"));
    assert_eq!(
        client.refresh("some-refresh").await,
        Err(NetworkError::InvalidResponse)
    );
}
