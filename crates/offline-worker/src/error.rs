//! Worker error types.

use offline_cache::CacheError;
use offline_core::LifecycleError;
use offline_network::FetchError;
use thiserror::Error;

use crate::host::HostError;

/// Result type for worker handlers.
pub type WorkerResult<T> = Result<T, WorkerError>;

/// Errors surfaced to the host from lifecycle handlers.
///
/// Fetch handling never fails: network errors are recovered through the
/// offline fallback chain.
#[derive(Error, Debug)]
pub enum WorkerError {
    /// A pre-cached asset could not be fetched; the install is aborted.
    #[error("failed to pre-cache {url}: {source}")]
    Install {
        url: String,
        #[source]
        source: FetchError,
    },

    /// Cache storage failed.
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    /// A host lifecycle control failed.
    #[error("host error: {0}")]
    Host(#[from] HostError),

    /// The background sync routine failed; the host reschedules it.
    #[error("background sync '{tag}' failed: {reason}")]
    Sync { tag: String, reason: String },

    /// Handler invoked out of lifecycle order.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}
