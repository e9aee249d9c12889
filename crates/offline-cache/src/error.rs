//! Cache error types.

use thiserror::Error;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors that can occur when using cache storage.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Cache storage is not available in this context.
    #[error("cache storage unavailable: {0}")]
    Unavailable(String),

    /// The namespace does not exist.
    #[error("cache namespace not found: {0}")]
    NamespaceNotFound(String),

    /// Backend storage error.
    #[error("storage error: {0}")]
    Storage(String),
}
