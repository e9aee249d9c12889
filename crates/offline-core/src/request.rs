//! Intercepted request model.

use std::sync::atomic::{AtomicU64, Ordering};

use http::{HeaderMap, Method};
use serde::{Deserialize, Serialize};

/// Identifier correlating the log lines of one dispatched event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventId(pub String);

static EVENT_SEQ: AtomicU64 = AtomicU64::new(1);

impl EventId {
    /// Generate a new event ID.
    pub fn generate() -> Self {
        // No wall clock on wasm32-unknown-unknown.
        let seq = EVENT_SEQ.fetch_add(1, Ordering::Relaxed);
        Self(format!("evt-{:x}", seq))
    }

    /// Create from an existing ID string.
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What kind of resource a request is for (the Fetch `destination`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    /// Top-level navigable document.
    Document,
    Script,
    Style,
    Image,
    Font,
    /// Fetches with no destination (`fetch()` / XHR).
    #[default]
    Empty,
    Other,
}

impl Destination {
    /// Parse a Fetch destination string.
    pub fn parse(value: &str) -> Self {
        match value {
            "document" => Self::Document,
            "script" => Self::Script,
            "style" => Self::Style,
            "image" => Self::Image,
            "font" => Self::Font,
            "" => Self::Empty,
            _ => Self::Other,
        }
    }
}

/// A request intercepted from a controlled page.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute or scope-relative URL.
    pub url: String,
    /// Request destination.
    pub destination: Destination,
    /// Request headers.
    pub headers: HeaderMap,
}

impl FetchRequest {
    /// Create a new request.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            destination: Destination::Empty,
            headers: HeaderMap::new(),
        }
    }

    /// A GET subresource request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    /// A GET navigation request for a document.
    pub fn navigate(url: impl Into<String>) -> Self {
        Self::get(url).with_destination(Destination::Document)
    }

    /// Set the destination.
    pub fn with_destination(mut self, destination: Destination) -> Self {
        self.destination = destination;
        self
    }

    /// Whether this is a GET request.
    pub fn is_get(&self) -> bool {
        self.method == Method::GET
    }

    /// Whether this request loads a top-level document.
    pub fn is_navigation(&self) -> bool {
        self.destination == Destination::Document
    }
}
