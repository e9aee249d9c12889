//! Fetch: network-first with cache fallback.

use std::future::Future;
use std::rc::Rc;

use offline_cache::{CacheKey, CacheStatus, CacheStorage};
use offline_core::{is_cacheable_status, FetchRequest, FetchResponse, StatusCode};
use offline_network::Network;
use offline_observability::StructuredLogger;

use crate::event::{EventKind, FetchOutcome, PassthroughReason};
use crate::fallback::{resolve_offline, OfflineFallback};
use crate::host::WorkerHost;
use crate::worker::OfflineWorker;

impl<S, N, H> OfflineWorker<S, N, H>
where
    S: CacheStorage + 'static,
    N: Network,
    H: WorkerHost,
{
    /// Handle a fetch event.
    ///
    /// Non-GET requests and backend traffic pass through untouched. Everything
    /// else goes to the network first; a 200 response is copied into the
    /// dynamic namespace by a detached task and returned without waiting for
    /// the write. When the network rejects, the offline fallback chain
    /// decides the response.
    pub async fn handle_fetch(&self, request: FetchRequest) -> FetchOutcome {
        if let Some(reason) = self.passthrough_reason(&request) {
            let log = self.event_logger(EventKind::Fetch);
            self.record_fetch(&request, CacheStatus::Bypass, &log);
            return FetchOutcome::Passthrough(reason);
        }

        match self.network.fetch(&request).await {
            Ok(response) => {
                self.network_responded(&request, response.status.as_u16(), || {
                    let copy = response.clone();
                    async move { Ok(copy) }
                });
                FetchOutcome::Respond {
                    response,
                    status: CacheStatus::Network,
                }
            }
            Err(e) => self.network_failed(&request, &e.to_string()).await,
        }
    }

    /// Why `request` would be left to the host, if it would.
    ///
    /// Decided without touching network or cache, so a host can skip
    /// intercepting before any asynchronous work starts.
    pub fn passthrough_reason(&self, request: &FetchRequest) -> Option<PassthroughReason> {
        PassthroughReason::for_request(&self.config, request)
    }

    /// Account for a response the network produced for `request`.
    ///
    /// For hosts that fetch with their own request object and hand the
    /// original response back to the page. `read_copy` is called only when
    /// the status is 200; the copy it yields is written to the dynamic
    /// namespace by a detached task. Other statuses are never cached,
    /// including the status 0 of opaque cross-origin responses.
    pub fn network_responded<B, F>(
        &self,
        request: &FetchRequest,
        status: u16,
        read_copy: B,
    ) where
        B: FnOnce() -> F,
        F: Future<Output = Result<FetchResponse, String>> + 'static,
    {
        let log = self.event_logger(EventKind::Fetch);
        if StatusCode::from_u16(status).is_ok_and(is_cacheable_status) {
            self.cache_in_background(request, read_copy(), &log);
        }
        self.record_fetch(request, CacheStatus::Network, &log);
    }

    /// Answer `request` after the network rejected it with `error`.
    pub async fn network_failed(&self, request: &FetchRequest, error: &str) -> FetchOutcome {
        let log = self.event_logger(EventKind::Fetch);
        log.debug_builder("network failed, trying cache")
            .field("url", request.url.as_str())
            .field("error", error)
            .emit();

        let outcome = self.offline_response(request, &log).await;
        self.record_fetch(request, outcome.status(), &log);
        outcome
    }

    async fn offline_response(
        &self,
        request: &FetchRequest,
        log: &StructuredLogger,
    ) -> FetchOutcome {
        match resolve_offline(self.storage.as_ref(), &self.config, request).await {
            Ok(OfflineFallback::Cached(response)) => FetchOutcome::Respond {
                response,
                status: CacheStatus::Hit,
            },
            Ok(OfflineFallback::Shell(response)) => FetchOutcome::Respond {
                response,
                status: CacheStatus::Fallback,
            },
            Ok(OfflineFallback::Unavailable) => FetchOutcome::Unavailable,
            Err(e) => {
                log.warn_builder("cache lookup failed")
                    .field("url", request.url.as_str())
                    .field("error", e.to_string())
                    .emit();
                FetchOutcome::Unavailable
            }
        }
    }

    fn record_fetch(&self, request: &FetchRequest, status: CacheStatus, log: &StructuredLogger) {
        self.metrics.record_fetch(status);
        log.debug_builder("fetch handled")
            .field("url", request.url.as_str())
            .field("status", status.to_string())
            .field_bool("from_cache", status.from_cache())
            .emit();
    }

    fn cache_in_background<F>(&self, request: &FetchRequest, copy: F, log: &StructuredLogger)
    where
        F: Future<Output = Result<FetchResponse, String>> + 'static,
    {
        let storage = Rc::clone(&self.storage);
        let metrics = Rc::clone(&self.metrics);
        let namespace = self.config.dynamic_cache.clone();
        let key = CacheKey::for_request(request);
        let log = log.clone();

        self.spawner.spawn_detached(Box::pin(async move {
            let written = match copy.await {
                Ok(response) => storage
                    .put(&namespace, &key, response)
                    .await
                    .map_err(|e| e.to_string()),
                Err(e) => Err(e),
            };
            match written {
                Ok(()) => {
                    metrics.record_dynamic_write(true);
                    log.debug_builder("cached response")
                        .field("key", key.to_string())
                        .emit();
                }
                Err(e) => {
                    metrics.record_dynamic_write(false);
                    log.warn_builder("dynamic cache write failed")
                        .field("key", key.to_string())
                        .field("error", e)
                        .emit();
                }
            }
        }));
    }
}
