//! Captured response model.

use http::{HeaderMap, HeaderValue, StatusCode};

/// A fully captured response: status, headers and body.
///
/// The body is owned bytes, so `Clone` is the duplicate operation that lets
/// one copy go back to the page while another is written to the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body.
    pub body: Vec<u8>,
    /// Final URL, when the host reports one.
    pub url: Option<String>,
}

impl FetchResponse {
    /// Create a response with a status and body.
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
            url: None,
        }
    }

    /// A 200 response.
    pub fn ok_with(body: impl Into<Vec<u8>>) -> Self {
        Self::new(StatusCode::OK, body)
    }

    /// Add a header. Invalid values are skipped.
    pub fn with_header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Set the final URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Status in the 200-299 range.
    pub fn ok(&self) -> bool {
        self.status.is_success()
    }

    /// Body length in bytes.
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Whether the body is empty.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Only exact 200 responses are written to the dynamic namespace.
pub fn is_cacheable_status(status: StatusCode) -> bool {
    status == StatusCode::OK
}
