//! Cache storage: named namespaces of captured responses.

use async_trait::async_trait;
use offline_core::FetchResponse;

use crate::error::CacheResult;
use crate::key::CacheKey;

/// Host-provided cache storage.
///
/// Namespaces are created lazily by [`open`](CacheStorage::open) or the first
/// [`put`](CacheStorage::put) and listed in creation order. The host is
/// expected to serialize concurrent writes to the same key.
#[async_trait(?Send)]
pub trait CacheStorage {
    /// Open a namespace, creating it if missing.
    async fn open(&self, namespace: &str) -> CacheResult<()>;

    /// Whether a namespace exists.
    async fn has(&self, namespace: &str) -> CacheResult<bool>;

    /// Store a response under `key`, replacing any previous entry.
    async fn put(
        &self,
        namespace: &str,
        key: &CacheKey,
        response: FetchResponse,
    ) -> CacheResult<()>;

    /// Store a batch of responses.
    async fn put_all(
        &self,
        namespace: &str,
        entries: Vec<(CacheKey, FetchResponse)>,
    ) -> CacheResult<()> {
        self.open(namespace).await?;
        for (key, response) in entries {
            self.put(namespace, &key, response).await?;
        }
        Ok(())
    }

    /// Look up `key` in one namespace.
    async fn match_in(
        &self,
        namespace: &str,
        key: &CacheKey,
    ) -> CacheResult<Option<FetchResponse>>;

    /// Look up `key` across all namespaces in creation order.
    async fn match_any(&self, key: &CacheKey) -> CacheResult<Option<FetchResponse>>;

    /// Remove one entry. Returns whether it existed.
    async fn delete_entry(&self, namespace: &str, key: &CacheKey) -> CacheResult<bool>;

    /// Keys stored in a namespace, in insertion order.
    async fn entries(&self, namespace: &str) -> CacheResult<Vec<CacheKey>>;

    /// Names of all namespaces.
    async fn keys(&self) -> CacheResult<Vec<String>>;

    /// Delete a namespace. Returns whether it existed.
    async fn delete(&self, namespace: &str) -> CacheResult<bool>;
}
