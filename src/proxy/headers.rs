//! Credential header handling
//!
//! The relay forwards exactly one client header upstream: the API key. It is
//! wrapped in [`ApiKey`] as soon as it is read so that it cannot end up in a
//! log line or an error body by accident.

use std::fmt;

use axum::http::{header::CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

/// Header carrying the Gemini API key, both inbound and upstream
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Header name constant for [`API_KEY_HEADER`]
pub const API_KEY_HEADER_NAME: HeaderName = HeaderName::from_static(API_KEY_HEADER);

/// Client-supplied API key, forwarded unchanged
///
/// `Debug` never prints the value and the inner header value is flagged as
/// sensitive.
#[derive(Clone)]
pub struct ApiKey(HeaderValue);

impl ApiKey {
    /// Wrap a raw header value, rejecting empty ones
    pub fn from_header_value(value: &HeaderValue) -> Option<Self> {
        if value.as_bytes().iter().all(u8::is_ascii_whitespace) {
            return None;
        }
        let mut value = value.clone();
        value.set_sensitive(true);
        Some(Self(value))
    }

    /// Header value to send upstream
    pub fn header_value(&self) -> &HeaderValue {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Read the API key from the inbound headers
///
/// Returns `None` when the header is missing or empty.
pub fn extract_api_key(headers: &HeaderMap) -> Option<ApiKey> {
    headers
        .get(API_KEY_HEADER_NAME)
        .and_then(ApiKey::from_header_value)
}

/// Build the header set for an upstream `generateContent` call
pub fn build_upstream_headers(api_key: &ApiKey) -> HeaderMap {
    let mut headers = HeaderMap::new();

    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(API_KEY_HEADER_NAME, api_key.header_value().clone());

    headers
}
