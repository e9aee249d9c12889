//! Network fetch seam.

use async_trait::async_trait;
use offline_core::{FetchRequest, FetchResponse};

/// Error type for fetch operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request error: {0}")]
    Request(String),
}

impl FetchError {
    /// Whether the fetch was rejected (as opposed to answered with a bad status).
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::Http { .. })
    }
}

/// Host network access.
///
/// Resolves with any response the server sent, whatever its status; rejects
/// only when no response was obtained (offline, DNS, CORS). No timeout or
/// retry is applied on top of the host's own.
#[async_trait(?Send)]
pub trait Network {
    /// Issue a request.
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError>;

    /// GET `url` and require a 2xx status, the way bulk pre-caching does.
    async fn fetch_ok(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let response = self.fetch(&FetchRequest::get(url)).await?;
        if !response.ok() {
            return Err(FetchError::Http {
                status: response.status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }
}
