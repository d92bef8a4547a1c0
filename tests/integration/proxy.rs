//! Forwarding route integration tests
//!
//! Tests for POST /proxy/gemini/{modelName}:
//! - Verbatim pass-through of successful upstream responses
//! - Credential and body forwarding
//! - Request validation (missing API key, invalid or oversized body)
//! - Mapping of upstream errors, unreachable upstream and timeouts

use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use bytes::Bytes;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{
    constants::{TEST_API_KEY, TEST_MODEL},
    test_config, test_server, unreachable_url, TestHarness,
};
use crate::mocks::{generate_content_path, GeminiTestData};

fn api_key_header() -> (HeaderName, HeaderValue) {
    (
        "x-goog-api-key".parse().unwrap(),
        TEST_API_KEY.parse().unwrap(),
    )
}

fn proxy_path(model: &str) -> String {
    format!("/proxy/gemini/{}", model)
}

// =============================================================================
// Success path
// =============================================================================

#[tokio::test]
async fn test_successful_response_is_relayed() {
    let harness = TestHarness::new().await;
    let upstream_body = GeminiTestData::simple_response("Hello!");
    harness
        .gemini
        .mock_generate_success(TEST_MODEL, upstream_body.clone())
        .await;

    let (name, value) = api_key_header();
    let response = harness
        .server
        .post(&proxy_path(TEST_MODEL))
        .add_header(name, value)
        .json(&GeminiTestData::simple_request("Hi"))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json, upstream_body);
}

#[tokio::test]
async fn test_success_body_is_byte_for_byte_identical() {
    // Key order, spacing and number formatting must survive the relay
    const RAW: &str = r#"{"z":1,  "a":{"n":1.10000000000000000001,"e":1e400}, "list":[3,2,1]}"#;

    let harness = TestHarness::new().await;
    harness.gemini.mock_generate_raw(TEST_MODEL, 200, RAW).await;

    let (name, value) = api_key_header();
    let response = harness
        .server
        .post(&proxy_path(TEST_MODEL))
        .add_header(name, value)
        .json(&GeminiTestData::simple_request("Hi"))
        .await;

    response.assert_status_ok();
    assert_eq!(response.text(), RAW);
    assert_eq!(response.header("content-type"), "application/json");
}

#[tokio::test]
async fn test_success_status_code_is_preserved() {
    let harness = TestHarness::new().await;
    harness
        .gemini
        .mock_generate_raw(TEST_MODEL, 201, r#"{"created":true}"#)
        .await;

    let (name, value) = api_key_header();
    let response = harness
        .server
        .post(&proxy_path(TEST_MODEL))
        .add_header(name, value)
        .json(&json!({}))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.text(), r#"{"created":true}"#);
}

#[tokio::test]
async fn test_request_body_and_key_are_forwarded_unchanged() {
    const RAW_REQUEST: &str =
        r#"{"contents":[{"parts":[{"text":"hi"}]}],  "generationConfig":{"temperature":0.70}}"#;

    let harness = TestHarness::new().await;
    harness
        .gemini
        .mock_generate_success(TEST_MODEL, json!({ "ok": true }))
        .await;

    let (name, value) = api_key_header();
    harness
        .server
        .post(&proxy_path(TEST_MODEL))
        .add_header(name, value)
        .bytes(Bytes::from_static(RAW_REQUEST.as_bytes()))
        .await
        .assert_status_ok();

    let requests = harness.gemini.received_requests().await;
    assert_eq!(requests.len(), 1);

    let forwarded = &requests[0];
    assert_eq!(forwarded.url.path(), generate_content_path(TEST_MODEL));
    assert_eq!(forwarded.body, RAW_REQUEST.as_bytes());
    assert_eq!(
        forwarded.headers.get("x-goog-api-key").unwrap(),
        TEST_API_KEY
    );
    assert_eq!(
        forwarded.headers.get("content-type").unwrap(),
        "application/json"
    );
}

#[tokio::test]
async fn test_non_json_success_body_is_relayed_as_json_string() {
    let harness = TestHarness::new().await;
    harness
        .gemini
        .mock_generate_text(TEST_MODEL, 200, "<html>captive portal</html>")
        .await;

    let (name, value) = api_key_header();
    let response = harness
        .server
        .post(&proxy_path(TEST_MODEL))
        .add_header(name, value)
        .json(&GeminiTestData::simple_request("Hi"))
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "application/json");
    let json: Value = serde_json::from_str(&response.text()).unwrap();
    assert_eq!(json, json!("<html>captive portal</html>"));
}

#[tokio::test]
async fn test_empty_body_is_forwarded_as_empty_object() {
    let harness = TestHarness::new().await;
    harness
        .gemini
        .mock_generate_success(TEST_MODEL, json!({ "ok": true }))
        .await;

    let (name, value) = api_key_header();
    harness
        .server
        .post(&proxy_path(TEST_MODEL))
        .add_header(name, value)
        .await
        .assert_status_ok();

    let requests = harness.gemini.received_requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].body, b"{}");
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn test_missing_api_key_is_rejected_without_upstream_call() {
    let harness = TestHarness::new().await;
    harness
        .gemini
        .mock_generate_success(TEST_MODEL, json!({ "ok": true }))
        .await;

    let response = harness
        .server
        .post(&proxy_path(TEST_MODEL))
        .json(&GeminiTestData::simple_request("Hi"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(
        json,
        json!({ "error": "API key not provided in X-goog-api-key header" })
    );

    assert!(harness.gemini.received_requests().await.is_empty());
}

#[tokio::test]
async fn test_empty_api_key_is_rejected_without_upstream_call() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .post(&proxy_path(TEST_MODEL))
        .add_header("x-goog-api-key".parse().unwrap(), "".parse().unwrap())
        .json(&GeminiTestData::simple_request("Hi"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(harness.gemini.received_requests().await.is_empty());
}

#[tokio::test]
async fn test_undecodable_model_name_is_rejected() {
    let harness = TestHarness::new().await;

    let (name, value) = api_key_header();
    let response = harness
        .server
        .post("/proxy/gemini/%FF")
        .add_header(name, value)
        .json(&GeminiTestData::simple_request("Hi"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["error"], "Invalid model name");
    assert!(harness.gemini.received_requests().await.is_empty());
}

#[tokio::test]
async fn test_invalid_json_body_is_rejected() {
    let harness = TestHarness::new().await;

    let (name, value) = api_key_header();
    let response = harness
        .server
        .post(&proxy_path(TEST_MODEL))
        .add_header(name, value)
        .bytes(Bytes::from_static(b"{\"contents\": [unterminated"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["error"], "Invalid JSON body");
    assert!(json["message"].is_string());

    assert!(harness.gemini.received_requests().await.is_empty());
}

#[tokio::test]
async fn test_oversized_body_is_rejected_with_json() {
    let harness = TestHarness::with_config(|config| config.max_body_bytes = 128).await;

    let (name, value) = api_key_header();
    let response = harness
        .server
        .post(&proxy_path(TEST_MODEL))
        .add_header(name, value)
        .json(&GeminiTestData::simple_request(&"x".repeat(1024)))
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    let json: Value = response.json();
    assert_eq!(json["error"], "Payload too large");
    assert_eq!(json["message"], "Request body exceeds the 128 byte limit");

    assert!(harness.gemini.received_requests().await.is_empty());
}

// =============================================================================
// Upstream failures
// =============================================================================

#[tokio::test]
async fn test_upstream_error_status_is_wrapped() {
    let harness = TestHarness::new().await;
    harness
        .gemini
        .mock_generate_error(TEST_MODEL, 429, json!({ "reason": "quota" }))
        .await;

    let (name, value) = api_key_header();
    let response = harness
        .server
        .post(&proxy_path(TEST_MODEL))
        .add_header(name, value)
        .json(&GeminiTestData::simple_request("Hi"))
        .await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    let json: Value = response.json();
    assert_eq!(
        json,
        json!({
            "error": "Error from Gemini API",
            "details": { "reason": "quota" },
            "status": 429
        })
    );
}

#[tokio::test]
async fn test_upstream_error_payload_is_preserved_in_details() {
    let harness = TestHarness::new().await;
    harness
        .gemini
        .mock_generate_error(TEST_MODEL, 429, GeminiTestData::quota_error())
        .await;

    let (name, value) = api_key_header();
    let response = harness
        .server
        .post(&proxy_path(TEST_MODEL))
        .add_header(name, value)
        .json(&GeminiTestData::simple_request("Hi"))
        .await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    let json: Value = response.json();
    assert_eq!(json["details"], GeminiTestData::quota_error());
}

#[tokio::test]
async fn test_upstream_non_json_error_is_carried_as_string() {
    let harness = TestHarness::new().await;
    harness
        .gemini
        .mock_generate_text(TEST_MODEL, 502, "Bad Gateway")
        .await;

    let (name, value) = api_key_header();
    let response = harness
        .server
        .post(&proxy_path(TEST_MODEL))
        .add_header(name, value)
        .json(&GeminiTestData::simple_request("Hi"))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let json: Value = response.json();
    assert_eq!(json["details"], "Bad Gateway");
    assert_eq!(json["status"], 502);
}

#[tokio::test]
async fn test_unreachable_upstream_returns_503() {
    let server = test_server(test_config(&unreachable_url()));

    let (name, value) = api_key_header();
    let response = server
        .post(&proxy_path(TEST_MODEL))
        .add_header(name, value)
        .json(&GeminiTestData::simple_request("Hi"))
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let json: Value = response.json();
    assert_eq!(json["error"], "Failed to reach Gemini API");
    assert_eq!(json["message"], "Service temporarily unavailable");
}

#[tokio::test]
async fn test_slow_upstream_returns_504() {
    // Harness timeout is one second
    let harness = TestHarness::new().await;
    harness
        .gemini
        .mock_generate_delayed(TEST_MODEL, Duration::from_secs(3))
        .await;

    let (name, value) = api_key_header();
    let response = harness
        .server
        .post(&proxy_path(TEST_MODEL))
        .add_header(name, value)
        .json(&GeminiTestData::simple_request("Hi"))
        .await;

    response.assert_status(StatusCode::GATEWAY_TIMEOUT);
    let json: Value = response.json();
    assert_eq!(json["error"], "Gemini API timeout");
    assert_eq!(json["message"], "Gemini API did not respond within 1 seconds");
}

#[tokio::test]
async fn test_invalid_upstream_url_returns_500() {
    let server = test_server(test_config("not a url"));

    let (name, value) = api_key_header();
    let response = server
        .post(&proxy_path(TEST_MODEL))
        .add_header(name, value)
        .json(&GeminiTestData::simple_request("Hi"))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = response.json();
    assert_eq!(json["error"], "Internal proxy server error");
    assert!(json["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid Gemini API URL"));
}

#[tokio::test]
async fn test_api_key_never_echoed_in_error_bodies() {
    let server = test_server(test_config(&unreachable_url()));

    let (name, value) = api_key_header();
    let response = server
        .post(&proxy_path(TEST_MODEL))
        .add_header(name, value)
        .json(&GeminiTestData::simple_request("Hi"))
        .await;

    assert!(!response.text().contains(TEST_API_KEY));
}
