//! Cache API storage.

use async_trait::async_trait;
use js_sys::{Array, Promise};
use offline_cache::{CacheError, CacheKey, CacheResult, CacheStorage};
use offline_core::{FetchResponse, Method};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Cache, Request, Response, ServiceWorkerGlobalScope};

use super::convert::{js_message, response_from_js, response_to_js};

/// Namespaces backed by the browser's `caches` object.
///
/// The Cache API keys entries by GET request URL, so only the URL of a
/// `CacheKey` reaches the browser.
pub(crate) struct WebCacheStorage {
    caches: web_sys::CacheStorage,
}

impl WebCacheStorage {
    pub(crate) fn new(scope: &ServiceWorkerGlobalScope) -> CacheResult<Self> {
        let caches = scope
            .caches()
            .map_err(|e| CacheError::Unavailable(js_message(&e)))?;
        Ok(Self { caches })
    }

    async fn open_cache(&self, namespace: &str) -> CacheResult<Cache> {
        settle(self.caches.open(namespace))
            .await?
            .dyn_into::<Cache>()
            .map_err(|_| {
                CacheError::Storage(format!("'{}' did not open to a Cache", namespace))
            })
    }

    /// Open `namespace` only if it already exists.
    async fn existing(&self, namespace: &str) -> CacheResult<Option<Cache>> {
        if !self.has(namespace).await? {
            return Ok(None);
        }
        self.open_cache(namespace).await.map(Some)
    }
}

async fn settle(promise: Promise) -> CacheResult<JsValue> {
    JsFuture::from(promise)
        .await
        .map_err(|e| CacheError::Storage(js_message(&e)))
}

async fn stored_response(value: JsValue) -> CacheResult<Option<FetchResponse>> {
    if value.is_undefined() {
        return Ok(None);
    }
    let response = value
        .dyn_into::<Response>()
        .map_err(|_| CacheError::Storage("cache match did not return a Response".to_string()))?;
    response_from_js(&response)
        .await
        .map(Some)
        .map_err(CacheError::Storage)
}

#[async_trait(?Send)]
impl CacheStorage for WebCacheStorage {
    async fn open(&self, namespace: &str) -> CacheResult<()> {
        self.open_cache(namespace).await.map(|_| ())
    }

    async fn has(&self, namespace: &str) -> CacheResult<bool> {
        Ok(settle(self.caches.has(namespace)).await?.is_truthy())
    }

    async fn put(
        &self,
        namespace: &str,
        key: &CacheKey,
        response: FetchResponse,
    ) -> CacheResult<()> {
        let cache = self.open_cache(namespace).await?;
        let response =
            response_to_js(&response).map_err(|e| CacheError::Storage(js_message(&e)))?;
        settle(cache.put_with_str(key.url(), &response)).await?;
        Ok(())
    }

    async fn match_in(
        &self,
        namespace: &str,
        key: &CacheKey,
    ) -> CacheResult<Option<FetchResponse>> {
        let Some(cache) = self.existing(namespace).await? else {
            return Ok(None);
        };
        stored_response(settle(cache.match_with_str(key.url())).await?).await
    }

    async fn match_any(&self, key: &CacheKey) -> CacheResult<Option<FetchResponse>> {
        stored_response(settle(self.caches.match_with_str(key.url())).await?).await
    }

    async fn delete_entry(&self, namespace: &str, key: &CacheKey) -> CacheResult<bool> {
        let Some(cache) = self.existing(namespace).await? else {
            return Ok(false);
        };
        Ok(settle(cache.delete_with_str(key.url())).await?.is_truthy())
    }

    async fn entries(&self, namespace: &str) -> CacheResult<Vec<CacheKey>> {
        let cache = self
            .existing(namespace)
            .await?
            .ok_or_else(|| CacheError::NamespaceNotFound(namespace.to_string()))?;
        let requests = Array::from(&settle(cache.keys()).await?);

        Ok(requests
            .iter()
            .filter_map(|value| value.dyn_into::<Request>().ok())
            .map(|request| {
                let method =
                    Method::from_bytes(request.method().as_bytes()).unwrap_or(Method::GET);
                CacheKey::new(&method, &request.url())
            })
            .collect())
    }

    async fn keys(&self) -> CacheResult<Vec<String>> {
        let names = Array::from(&settle(self.caches.keys()).await?);
        Ok(names.iter().filter_map(|name| name.as_string()).collect())
    }

    async fn delete(&self, namespace: &str) -> CacheResult<bool> {
        Ok(settle(self.caches.delete(namespace)).await?.is_truthy())
    }
}
