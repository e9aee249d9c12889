//! In-memory cache storage (for native hosts and tests).

use std::cell::RefCell;

use async_trait::async_trait;
use offline_core::FetchResponse;

use crate::error::{CacheError, CacheResult};
use crate::key::CacheKey;
use crate::storage::CacheStorage;

#[derive(Debug)]
struct Namespace {
    name: String,
    entries: Vec<(CacheKey, FetchResponse)>,
}

impl Namespace {
    fn get(&self, key: &CacheKey) -> Option<&FetchResponse> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, r)| r)
    }
}

/// In-memory cache storage.
///
/// Single-threaded: interior mutability through `RefCell`, never borrowed
/// across an await point.
#[derive(Debug, Default)]
pub struct InMemoryCacheStorage {
    namespaces: RefCell<Vec<Namespace>>,
}

impl InMemoryCacheStorage {
    /// Create an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in a namespace (0 if missing).
    pub fn entry_count(&self, namespace: &str) -> usize {
        self.namespaces
            .borrow()
            .iter()
            .find(|ns| ns.name == namespace)
            .map_or(0, |ns| ns.entries.len())
    }

    fn ensure(&self, namespace: &str) {
        let mut namespaces = self.namespaces.borrow_mut();
        if !namespaces.iter().any(|ns| ns.name == namespace) {
            namespaces.push(Namespace {
                name: namespace.to_string(),
                entries: Vec::new(),
            });
        }
    }
}

#[async_trait(?Send)]
impl CacheStorage for InMemoryCacheStorage {
    async fn open(&self, namespace: &str) -> CacheResult<()> {
        self.ensure(namespace);
        Ok(())
    }

    async fn has(&self, namespace: &str) -> CacheResult<bool> {
        Ok(self.namespaces.borrow().iter().any(|ns| ns.name == namespace))
    }

    async fn put(

        &self,

        namespace: &str,

        key: &CacheKey,

        response: FetchResponse,

    ) -> CacheResult<()> {
        self.ensure(namespace);

        let mut namespaces = self.namespaces.borrow_mut();
        let ns = namespaces
            .iter_mut()
            .find(|ns| ns.name == namespace)
            .ok_or_else(|| CacheError::NamespaceNotFound(namespace.to_string()))?;

        match ns.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = response,
            None => ns.entries.push((key.clone(), response)),
        }
        Ok(())
    }

    async fn match_in(

        &self,

        namespace: &str,

        key: &CacheKey,

    ) -> CacheResult<Option<FetchResponse>> {
        Ok(self
            .namespaces
            .borrow()
            .iter()
            .find(|ns| ns.name == namespace)
            .and_then(|ns| ns.get(key))
            .cloned())
    }

    async fn match_any(&self, key: &CacheKey) -> CacheResult<Option<FetchResponse>> {
        Ok(self
            .namespaces
            .borrow()
            .iter()
            .find_map(|ns| ns.get(key))
            .cloned())
    }

    async fn delete_entry(&self, namespace: &str, key: &CacheKey) -> CacheResult<bool> {
        let mut namespaces = self.namespaces.borrow_mut();
        let Some(ns) = namespaces.iter_mut().find(|ns| ns.name == namespace) else {
            return Ok(false);
        };

        let before = ns.entries.len();
        ns.entries.retain(|(k, _)| k != key);
        Ok(ns.entries.len() != before)
    }

    async fn entries(&self, namespace: &str) -> CacheResult<Vec<CacheKey>> {
        self.namespaces
            .borrow()
            .iter()
            .find(|ns| ns.name == namespace)
            .map(|ns| ns.entries.iter().map(|(k, _)| k.clone()).collect())
            .ok_or_else(|| CacheError::NamespaceNotFound(namespace.to_string()))
    }

    async fn keys(&self) -> CacheResult<Vec<String>> {
        Ok(self
            .namespaces
            .borrow()
            .iter()
            .map(|ns| ns.name.clone())
            .collect())
    }

    async fn delete(&self, namespace: &str) -> CacheResult<bool> {
        let mut namespaces = self.namespaces.borrow_mut();
        let before = namespaces.len();
        namespaces.retain(|ns| ns.name != namespace);
        Ok(namespaces.len() != before)
    }
}
