//! Health check endpoint
//!
//! `GET /health` reports liveness only. It has no upstream dependency, so it
//! answers 200 even when the Gemini API is unreachable.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::AppState;

/// Health status reported by the relay
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub message: String,
    pub timestamp: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let response = HealthResponse {
        status: HealthStatus::Ok,
        message: "Gemini API Proxy Server is running".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    };

    (StatusCode::OK, Json(response))
}
