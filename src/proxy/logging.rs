//! Request logging for forwarded calls
//!
//! Each forwarded request emits exactly one line when it starts and one when
//! it ends. Lines carry a short correlation ID, never the API key.

use std::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::AppError;

/// Context for tracking a forwarded request
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique identifier for this request (for log correlation)
    pub trace_id: String,
    /// When the request started
    pub start_time: Instant,
    /// Upstream handling this request
    pub upstream: String,
    /// Target model from the request path
    pub model: String,
}

impl RequestContext {
    /// Create a new request context
    pub fn new(upstream: &str, model: &str) -> Self {
        Self {
            trace_id: Uuid::new_v4().to_string()[..8].to_string(), // Short ID for readability
            start_time: Instant::now(),
            upstream: upstream.to_string(),
            model: model.to_string(),
        }
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u128 {
        self.start_time.elapsed().as_millis()
    }

    /// Log request initiation
    pub fn log_request_start(&self, body_size: usize) {
        info!(
            trace_id = %self.trace_id,
            upstream = %self.upstream,
            model = %self.model,
            body_size = %body_size,
            "Forwarding request"
        );
    }

    /// Log successful request completion
    pub fn log_request_complete(&self, status: u16) {
        info!(
            trace_id = %self.trace_id,
            upstream = %self.upstream,
            model = %self.model,
            status = %status,
            elapsed_ms = %self.elapsed_ms(),
            "Request completed successfully"
        );
    }

    /// Log request failure
    ///
    /// Upstream application errors are the caller's concern and log at
    /// `warn`; everything else is an `error`.
    pub fn log_failure(&self, err: &AppError) {
        let status = err.status_code().as_u16();
        match err {
            AppError::UpstreamStatus { details, .. } => warn!(
                trace_id = %self.trace_id,
                upstream = %self.upstream,
                model = %self.model,
                status = %status,
                details = %details,
                elapsed_ms = %self.elapsed_ms(),
                "Upstream returned an error"
            ),
            AppError::UpstreamTimeout { timeout_secs } => error!(
                trace_id = %self.trace_id,
                upstream = %self.upstream,
                model = %self.model,
                timeout_secs = %timeout_secs,
                elapsed_ms = %self.elapsed_ms(),
                "Request timed out"
            ),
            _ => error!(
                trace_id = %self.trace_id,
                upstream = %self.upstream,
                model = %self.model,
                status = %status,
                kind = err.kind(),
                error = %err,
                elapsed_ms = %self.elapsed_ms(),
                "Request failed"
            ),
        }
    }
}
