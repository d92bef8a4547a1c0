//! Forwarding route
//!
//! `POST /proxy/gemini/{modelName}` forwards the body and API key to the
//! upstream `generateContent` action and relays the outcome.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{BytesRejection, PathRejection},
        Path, State,
    },
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::de::IgnoredAny;
use tracing::warn;

use crate::{
    error::{AppError, AppResult},
    proxy::{headers::extract_api_key, logging::RequestContext},
    AppState,
};

/// Forwarding handler
///
/// This handler:
/// 1. Rejects requests without an API key (no upstream call is made)
/// 2. Checks that the body is JSON, without re-serializing it
/// 3. Forwards the body unchanged to the upstream
/// 4. Relays the upstream body verbatim on success, or a JSON error otherwise
pub async fn forward(
    State(state): State<Arc<AppState>>,
    model_name: Result<Path<String>, PathRejection>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, AppError> {
    let Path(model_name) = model_name.map_err(|r| AppError::InvalidPath(r.body_text()))?;

    let api_key = extract_api_key(&headers).ok_or_else(|| {
        warn!(model = %model_name, "Rejected request without API key");
        AppError::MissingApiKey
    })?;

    let body = body.map_err(|r| AppError::from_body_rejection(r, state.config.max_body_bytes))?;
    let body = normalize_body(body)?;

    let ctx = RequestContext::new(state.upstream.name(), &model_name);
    ctx.log_request_start(body.len());

    match state
        .upstream
        .generate_content(&model_name, &api_key, body)
        .await
    {
        Ok(reply) => {
            ctx.log_request_complete(reply.status.as_u16());
            Ok(reply.into_response())
        }
        Err(err) => {
            ctx.log_failure(&err);
            Err(err)
        }
    }
}

/// Validate the inbound body as JSON and return the bytes to forward
///
/// An empty body is forwarded as `{}`.
pub fn normalize_body(body: Bytes) -> AppResult<Bytes> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Bytes::from_static(b"{}"));
    }

    serde_json::from_slice::<IgnoredAny>(&body)
        .map_err(|e| AppError::InvalidBody(e.to_string()))?;

    Ok(body)
}
