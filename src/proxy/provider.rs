//! Upstream abstraction layer
//!
//! Defines the trait the forwarding route talks to, so the handler does not
//! depend on a concrete HTTP client.

use async_trait::async_trait;
use axum::http::{header::CONTENT_TYPE, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;

use crate::error::AppResult;
use crate::proxy::headers::ApiKey;

/// Successful upstream reply
///
/// The body is always JSON, kept as raw bytes and handed back to the client
/// untouched.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: Bytes,
}

impl IntoResponse for UpstreamReply {
    fn into_response(self) -> Response {
        (
            self.status,
            [(CONTENT_TYPE, HeaderValue::from_static("application/json"))],
            self.body,
        )
            .into_response()
    }
}

/// Trait defining the interface for a generative-content backend
///
/// # Contract
///
/// Implementations MUST:
/// - Return `Ok` only for 2xx upstream responses, with a JSON body unmodified
///   and a non-JSON body wrapped as a JSON string
/// - Report non-2xx responses as `AppError::UpstreamStatus`
/// - Report a call exceeding the timeout as `AppError::UpstreamTimeout`
/// - Report a call that got no response as `AppError::UpstreamUnavailable`
/// - Never log or echo the API key
#[async_trait]
pub trait GenerativeUpstream: Send + Sync {
    /// Get the upstream name for logging
    fn name(&self) -> &'static str;

    /// Forward a `generateContent` call for `model`
    async fn generate_content(
        &self,
        model: &str,
        api_key: &ApiKey,
        body: Bytes,
    ) -> AppResult<UpstreamReply>;
}
