//! Gemini Relay - stateless forwarding proxy for the Gemini API
//!
//! This library provides the core functionality for the relay server. It
//! forwards `generateContent` calls with the client's API key and maps every
//! upstream outcome onto a JSON response.

pub mod config;
pub mod error;
pub mod middleware;
pub mod proxy;
pub mod routes;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

pub use crate::config::Config;
pub use crate::error::{AppError, AppResult};
pub use crate::proxy::{GeminiClient, GenerativeUpstream, UpstreamReply};

/// Application state shared across all request handlers
///
/// Immutable after startup; nothing here is mutated by a request.
pub struct AppState {
    pub config: Config,
    pub start_time: Instant,
    /// Upstream the forwarding route sends requests to
    pub upstream: Arc<dyn GenerativeUpstream>,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config) -> Result<Self> {
        // Initialize HTTP client with connection pooling; the per-request
        // timeout is set by the Gemini client
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(100)
            .build()?;

        let upstream: Arc<dyn GenerativeUpstream> =
            Arc::new(GeminiClient::new(http_client, &config));

        Ok(Self::with_upstream(config, upstream))
    }

    /// Create an application state around an existing upstream
    pub fn with_upstream(config: Config, upstream: Arc<dyn GenerativeUpstream>) -> Self {
        Self {
            config,
            start_time: Instant::now(),
            upstream,
        }
    }
}
