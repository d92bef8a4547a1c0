//! Configuration management for the relay
//!
//! Configuration is loaded from environment variables once at startup and is
//! immutable for the lifetime of the process.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Default Gemini API base URL (version prefix included)
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default upper bound on a single upstream call
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 60;

/// Default inbound body limit (50 MB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// Gemini API base URL, without the `/models/...` suffix
    pub gemini_api_url: String,

    /// Upper bound on each upstream call (in seconds)
    pub upstream_timeout_secs: u64,

    /// Maximum accepted request body size (in bytes)
    pub max_body_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3080".to_string())
                .parse()
                .context("Invalid PORT")?,

            gemini_api_url: env::var("GEMINI_API_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_API_URL.to_string()),

            upstream_timeout_secs: env::var("UPSTREAM_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_UPSTREAM_TIMEOUT_SECS.to_string())
                .parse()
                .context("Invalid UPSTREAM_TIMEOUT_SECS")?,

            max_body_bytes: env::var("MAX_BODY_BYTES")
                .unwrap_or_else(|_| DEFAULT_MAX_BODY_BYTES.to_string())
                .parse()
                .context("Invalid MAX_BODY_BYTES")?,
        })
    }

    /// Upstream timeout as a [`Duration`]
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3080,
            gemini_api_url: DEFAULT_GEMINI_API_URL.to_string(),
            upstream_timeout_secs: DEFAULT_UPSTREAM_TIMEOUT_SECS,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}
