//! Offline fallback chain for failed network fetches.

use offline_cache::{CacheKey, CacheResult, CacheStorage};
use offline_core::{FetchRequest, FetchResponse, WorkerConfig};

/// What the cache can offer for a request the network could not serve.
#[derive(Debug, Clone, PartialEq)]
pub enum OfflineFallback {
    /// An entry for this exact request, from any namespace.
    Cached(FetchResponse),
    /// The application shell, for document requests only.
    Shell(FetchResponse),
    /// Nothing applies.
    Unavailable,
}

/// Resolve the fallback for `request`: exact match across all namespaces,
/// then the shell document for navigations.
pub async fn resolve_offline<S: CacheStorage + ?Sized>(
    storage: &S,
    config: &WorkerConfig,
    request: &FetchRequest,
) -> CacheResult<OfflineFallback> {
    if let Some(cached) = storage.match_any(&CacheKey::for_request(request)).await? {
        return Ok(OfflineFallback::Cached(cached));
    }

    if request.is_navigation() {
        let shell_key = CacheKey::for_url(&config.offline_fallback);
        if let Some(shell) = storage.match_any(&shell_key).await? {
            return Ok(OfflineFallback::Shell(shell));
        }
    }

    Ok(OfflineFallback::Unavailable)
}
