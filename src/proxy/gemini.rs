//! Gemini API client
//!
//! Sends `generateContent` calls to the Gemini REST API and classifies every
//! way such a call can end.

use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use bytes::Bytes;
use serde::de::IgnoredAny;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    proxy::{
        headers::{build_upstream_headers, ApiKey},
        provider::{GenerativeUpstream, UpstreamReply},
    },
};

/// Action suffix appended to the model path segment
pub const GENERATE_CONTENT_ACTION: &str = ":generateContent";

/// Gemini API client
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl GeminiClient {
    /// Create a new Gemini client
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.gemini_api_url.clone(),
            timeout: config.upstream_timeout(),
        }
    }

    /// Build `{base}/models/{model}:generateContent`
    ///
    /// The model name is percent-encoded as a single path segment, so `/`,
    /// `?` and `#` cannot change the shape of the upstream URL.
    pub fn generate_content_url(&self, model: &str) -> AppResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| anyhow!("Invalid Gemini API URL {}: {}", self.base_url, e))?;

        url.path_segments_mut()
            .map_err(|_| anyhow!("Gemini API URL cannot be a base: {}", self.base_url))?
            .pop_if_empty()
            .push("models")
            .push(&format!("{}{}", model, GENERATE_CONTENT_ACTION));

        Ok(url)
    }

    /// POST the body upstream and map the outcome
    #[instrument(skip(self, api_key, body), fields(model = %model, body_len = body.len()))]
    async fn forward(&self, model: &str, api_key: &ApiKey, body: Bytes) -> AppResult<UpstreamReply> {
        let url = self.generate_content_url(model)?;
        let headers = build_upstream_headers(api_key);

        debug!(url = %url, "Sending request to Gemini");

        let response = self
            .client
            .post(url.clone())
            .headers(headers)
            .timeout(self.timeout)
            .body(body)
            .send()
            .await
            .map_err(|e| self.classify_error(e, &url))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.classify_error(e, &url))?;

        debug!(url = %url, status = %status, body_len = body.len(), "Received response from Gemini");

        if status.is_success() {
            Ok(UpstreamReply {
                status,
                body: success_body(body),
            })
        } else {
            Err(AppError::UpstreamStatus {
                status,
                details: parse_error_details(&body),
            })
        }
    }

    /// Map a transport failure onto the relay's error taxonomy
    fn classify_error(&self, err: reqwest::Error, url: &Url) -> AppError {
        if err.is_timeout() {
            AppError::UpstreamTimeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else if err.is_connect() || err.is_request() || err.is_body() {
            debug!(url = %url, error = %err, "No response from Gemini");
            AppError::UpstreamUnavailable(err.to_string())
        } else {
            AppError::Internal(anyhow::Error::new(err))
        }
    }
}

#[async_trait]
impl GenerativeUpstream for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate_content(
        &self,
        model: &str,
        api_key: &ApiKey,
        body: Bytes,
    ) -> AppResult<UpstreamReply> {
        self.forward(model, api_key, body).await
    }
}

/// Body relayed for a 2xx upstream reply
///
/// JSON is passed through byte-for-byte. Anything else (an HTML page from a
/// captive portal, an empty body) is relayed as a JSON string.
pub fn success_body(body: Bytes) -> Bytes {
    if serde_json::from_slice::<IgnoredAny>(&body).is_ok() {
        return body;
    }

    warn!(body_len = body.len(), "Gemini returned a non-JSON success body");
    let text = Value::String(String::from_utf8_lossy(&body).into_owned());
    Bytes::from(text.to_string())
}

/// Interpret an upstream error body for the `details` field
///
/// JSON bodies are kept as-is, anything else is carried as a string and an
/// empty body becomes `null`.
pub fn parse_error_details(body: &[u8]) -> Value {
    if body.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}
