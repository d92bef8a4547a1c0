//! Error types for the relay
//!
//! Every failure the relay can produce is an [`AppError`] variant, and every
//! variant renders as a JSON object with at least an `error` field.

use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("API key not provided in X-goog-api-key header")]
    MissingApiKey,

    #[error("Invalid model name in path: {0}")]
    InvalidPath(String),

    #[error("Invalid JSON body: {0}")]
    InvalidBody(String),

    #[error("Request body exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },

    /// Upstream answered, but with a non-success status
    #[error("Error from Gemini API (status {status})")]
    UpstreamStatus { status: StatusCode, details: Value },

    /// No response was received from upstream
    #[error("Failed to reach Gemini API: {0}")]
    UpstreamUnavailable(String),

    #[error("Gemini API did not respond within {timeout_secs} seconds")]
    UpstreamTimeout { timeout_secs: u64 },

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Error response body
///
/// Fields other than `error` are present only for the failure kinds that carry
/// them.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
            details: None,
            status: None,
        }
    }

    fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl AppError {
    /// Map a failure to buffer the inbound body
    pub fn from_body_rejection(rejection: BytesRejection, limit: usize) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge { limit }
        } else {
            AppError::InvalidBody(rejection.body_text())
        }
    }

    /// HTTP status code this error is reported with
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingApiKey | AppError::InvalidPath(_) | AppError::InvalidBody(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::UpstreamStatus { status, .. } => *status,
            AppError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short outcome label used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::MissingApiKey => "missing_api_key",
            AppError::InvalidPath(_) => "invalid_path",
            AppError::InvalidBody(_) => "invalid_body",
            AppError::PayloadTooLarge { .. } => "payload_too_large",
            AppError::UpstreamStatus { .. } => "upstream_status",
            AppError::UpstreamUnavailable(_) => "upstream_unavailable",
            AppError::UpstreamTimeout { .. } => "upstream_timeout",
            AppError::Internal(_) => "internal",
        }
    }

    fn body(&self) -> ErrorResponse {
        match self {
            AppError::MissingApiKey => ErrorResponse::new(self.to_string()),
            AppError::InvalidPath(msg) => {
                ErrorResponse::new("Invalid model name").with_message(msg.clone())
            }
            AppError::InvalidBody(msg) => {
                ErrorResponse::new("Invalid JSON body").with_message(msg.clone())
            }
            AppError::PayloadTooLarge { .. } => {
                ErrorResponse::new("Payload too large").with_message(self.to_string())
            }
            AppError::UpstreamStatus { status, details } => ErrorResponse {
                error: "Error from Gemini API".to_string(),
                message: None,
                details: Some(details.clone()),
                status: Some(status.as_u16()),
            },
            AppError::UpstreamUnavailable(_) => ErrorResponse::new("Failed to reach Gemini API")
                .with_message("Service temporarily unavailable"),
            AppError::UpstreamTimeout { .. } => {
                ErrorResponse::new("Gemini API timeout").with_message(self.to_string())
            }
            AppError::Internal(err) => {
                ErrorResponse::new("Internal proxy server error").with_message(err.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
