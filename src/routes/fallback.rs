//! Fallback responder for unmatched requests

use axum::{http::StatusCode, Json};
use serde::Serialize;

/// Routes served by the relay, as listed in the 404 body
pub const AVAILABLE_ENDPOINTS: [&str; 2] = [
    "GET /health - server health check",
    "POST /proxy/gemini/{modelName} - proxy a request to the Gemini API",
];

/// 404 response body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundResponse {
    pub error: &'static str,
    pub message: &'static str,
    pub available_endpoints: [&'static str; 2],
}

/// Answer any request that matched no route (or no method on a route)
pub async fn not_found() -> (StatusCode, Json<NotFoundResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundResponse {
            error: "Endpoint not found",
            message: "Use POST /proxy/gemini/{modelName} to proxy requests to the Gemini API",
            available_endpoints: AVAILABLE_ENDPOINTS,
        }),
    )
}
