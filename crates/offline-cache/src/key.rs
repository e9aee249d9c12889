//! Cache key composition.

use offline_core::{FetchRequest, Method};
use serde::{Deserialize, Serialize};

/// Request identity used to key cache entries: method plus URL.
///
/// The URL fragment never reaches the network, so it is not part of the
/// identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CacheKey {
    method: String,
    url: String,
}

impl CacheKey {
    /// Create a key from a method and URL.
    pub fn new(method: &Method, url: &str) -> Self {
        Self {
            method: method.as_str().to_string(),
            url: strip_fragment(url).to_string(),
        }
    }

    /// Key for an intercepted request.
    pub fn for_request(request: &FetchRequest) -> Self {
        Self::new(&request.method, &request.url)
    }

    /// Key for a GET of `url` (how pre-cached assets are stored).
    pub fn for_url(url: &str) -> Self {
        Self::new(&Method::GET, url)
    }

    /// The request method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The request URL without fragment.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

fn strip_fragment(url: &str) -> &str {
    match url.find('#') {
        Some(idx) => &url[..idx],
        None => url,
    }
}
