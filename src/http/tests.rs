//! Tests for the HTTP client module

use super::*;
use crate::types::{BackoffType, Method, StringMap};
use std::time::Duration;
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpClient {
    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(10),
            Duration::from_secs(1),
        )
        .build();
    HttpClient::with_config(config).unwrap()
}

fn params(pairs: &[(&str, &str)]) -> StringMap {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.max_retries, 3);
    assert!(config.base_url.is_none());
    assert!(config.user_agent.starts_with("twitter-rest/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://api.twitter.com")
        .timeout(Duration::from_secs(60))
        .max_retries(5)
        .backoff(
            BackoffType::Linear,
            Duration::from_millis(200),
            Duration::from_secs(30),
        )
        .header("Authorization", "Bearer abc")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.base_url, Some("https://api.twitter.com".to_string()));
    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.max_retries, 5);
    assert_eq!(config.backoff_type, BackoffType::Linear);
    assert_eq!(config.initial_backoff, Duration::from_millis(200));
    assert_eq!(config.max_backoff, Duration::from_secs(30));
    assert_eq!(
        config.default_headers.get("Authorization"),
        Some(&"Bearer abc".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[test]
fn test_request_config_builder() {
    let config = RequestConfig::new()
        .query("cursor", "-1")
        .header("X-Request-Id", "abc123")
        .form(params(&[("url", "https://example.com/hook")]))
        .timeout(Duration::from_secs(10))
        .retries(2);

    assert_eq!(config.query.get("cursor"), Some(&"-1".to_string()));
    assert_eq!(
        config.headers.get("X-Request-Id"),
        Some(&"abc123".to_string())
    );
    assert!(config.form.is_some());
    assert!(config.body.is_none());
    assert_eq!(config.timeout, Some(Duration::from_secs(10)));
    assert_eq!(config.max_retries, Some(2));
}

#[test]
fn test_build_url() {
    let config = HttpClientConfig::builder()
        .base_url("https://api.twitter.com/")
        .build();
    let client = HttpClient::with_config(config).unwrap();

    assert_eq!(
        client.build_url("/1.1/followers/ids.json"),
        "https://api.twitter.com/1.1/followers/ids.json"
    );
    assert_eq!(
        client.build_url("https://upload.twitter.com/1.1/media/upload.json"),
        "https://upload.twitter.com/1.1/media/upload.json"
    );
}

// ============================================================================
// Request Tests
// ============================================================================

#[tokio::test]
async fn test_http_client_get_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.1/account/settings.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "screen_name": "sferik"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let data: serde_json::Value = client.get_json("/1.1/account/settings.json").await.unwrap();

    assert_eq!(data["screen_name"], "sferik");
}

#[tokio::test]
async fn test_http_client_default_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.1/secure.json"))
        .and(header("Authorization", "Bearer secret123"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .header("Authorization", "Bearer secret123")
        .build();

    let client = HttpClient::with_config(config).unwrap();
    let response = client.get("/1.1/secure.json").await.unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_http_client_404_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.1/missing.json"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.get("/1.1/missing.json").await.unwrap_err();

    assert!(matches!(
        err,
        crate::error::Error::HttpStatus { status: 404, ref body } if body == "Not found"
    ));
}

#[tokio::test]
async fn test_http_client_retry_on_500() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.1/flaky.json"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/1.1/flaky.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client.get("/1.1/flaky.json").await.unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_http_client_rate_limit_retry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.1/limited.json"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "1")
                .set_body_string("Rate limited"),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/1.1/limited.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client.get("/1.1/limited.json").await.unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_http_client_max_retries_exceeded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.1/always-fail.json"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Server error"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .max_retries(2)
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(10),
            Duration::from_secs(1),
        )
        .build();

    let client = HttpClient::with_config(config).unwrap();
    let err = client.get("/1.1/always-fail.json").await.unwrap_err();

    assert!(matches!(
        err,
        crate::error::Error::HttpStatus { status: 500, .. }
    ));
}

// ============================================================================
// Requester Tests
// ============================================================================

#[tokio::test]
async fn test_perform_request_get_sends_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.1/followers/ids.json"))
        .and(query_param("screen_name", "sferik"))
        .and(query_param("cursor", "-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ids": [1, 2],
            "next_cursor": 0
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let body = client
        .perform_request(
            Method::Get,
            "/1.1/followers/ids.json",
            &params(&[("screen_name", "sferik"), ("cursor", "-1")]),
        )
        .await
        .unwrap();

    assert_eq!(body["ids"], serde_json::json!([1, 2]));
}

#[tokio::test]
async fn test_perform_request_post_sends_form() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/1.1/account_activity/webhooks.json"))
        .and(body_string_contains("url=hook"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "1234567890"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let body = client
        .perform_request(
            Method::Post,
            "/1.1/account_activity/webhooks.json",
            &params(&[("url", "hook")]),
        )
        .await
        .unwrap();

    assert_eq!(body["id"], "1234567890");
}

#[tokio::test]
async fn test_perform_request_json_post_sends_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/1.1/direct_messages/events/new.json"))
        .and(body_json(serde_json::json!({"text": "hello"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let body = client
        .perform_request(
            Method::JsonPost,
            "/1.1/direct_messages/events/new.json",
            &params(&[("text", "hello")]),
        )
        .await
        .unwrap();

    assert!(body.is_null());
}

#[tokio::test]
async fn test_perform_request_json_put_empty_reply() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/1.1/account_activity/webhooks/1234567890.json"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let body = client
        .perform_request(
            Method::JsonPut,
            "/1.1/account_activity/webhooks/1234567890.json",
            &StringMap::new(),
        )
        .await
        .unwrap();

    assert_eq!(body, serde_json::Value::Null);
}

#[tokio::test]
async fn test_perform_request_propagates_status_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/1.1/account_activity/webhooks/1.json"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .perform_request(
            Method::Delete,
            "/1.1/account_activity/webhooks/1.json",
            &StringMap::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        crate::error::Error::HttpStatus { status: 401, .. }
    ));
}

// ============================================================================
// Backoff Tests
// ============================================================================

fn client_with_backoff(backoff_type: BackoffType, max: Duration) -> HttpClient {
    let config = HttpClientConfig::builder()
        .backoff(backoff_type, Duration::from_millis(100), max)
        .build();
    HttpClient::with_config(config).unwrap()
}

#[test]
fn test_calculate_backoff_constant() {
    let client = client_with_backoff(BackoffType::Constant, Duration::from_secs(10));

    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(1), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(5), Duration::from_millis(100));
}

#[test]
fn test_calculate_backoff_linear() {
    let client = client_with_backoff(BackoffType::Linear, Duration::from_secs(10));

    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(1), Duration::from_millis(200));
    assert_eq!(client.calculate_backoff(2), Duration::from_millis(300));
}

#[test]
fn test_calculate_backoff_exponential() {
    let client = client_with_backoff(BackoffType::Exponential, Duration::from_secs(10));

    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(1), Duration::from_millis(200));
    assert_eq!(client.calculate_backoff(2), Duration::from_millis(400));
    assert_eq!(client.calculate_backoff(3), Duration::from_millis(800));
}

#[test]
fn test_calculate_backoff_respects_max() {
    let client = client_with_backoff(BackoffType::Exponential, Duration::from_millis(500));

    assert_eq!(client.calculate_backoff(10), Duration::from_millis(500));
}

#[test]
fn test_http_client_debug() {
    let client = HttpClient::new().unwrap();
    let debug_str = format!("{client:?}");
    assert!(debug_str.contains("HttpClient"));
    assert!(debug_str.contains("config"));
}
