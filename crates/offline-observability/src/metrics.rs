//! Per-worker counters.

use std::cell::Cell;

use offline_cache::CacheStatus;
use serde::{Deserialize, Serialize};

/// Point-in-time copy of the worker counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Assets stored by install.
    pub assets_precached: u64,
    /// Fetches answered by the network.
    pub network_responses: u64,
    /// Fetches answered from a cached entry while offline.
    pub cache_hits: u64,
    /// Navigations answered with the offline shell.
    pub shell_fallbacks: u64,
    /// Fetches with no network and nothing cached.
    pub unavailable: u64,
    /// Requests left to the host untouched.
    pub passthroughs: u64,
    /// Successful dynamic cache writes.
    pub dynamic_writes: u64,
    /// Failed dynamic cache writes.
    pub dynamic_write_failures: u64,
    /// Namespaces removed by activation or clear.
    pub namespaces_deleted: u64,
}

/// Collector for worker metrics.
///
/// Single-threaded like the worker itself.
#[derive(Debug, Default)]
pub struct WorkerMetrics {
    assets_precached: Cell<u64>,
    network_responses: Cell<u64>,
    cache_hits: Cell<u64>,
    shell_fallbacks: Cell<u64>,
    unavailable: Cell<u64>,
    passthroughs: Cell<u64>,
    dynamic_writes: Cell<u64>,
    dynamic_write_failures: Cell<u64>,
    namespaces_deleted: Cell<u64>,
}

fn bump(counter: &Cell<u64>, by: u64) {
    counter.set(counter.get().saturating_add(by));
}

impl WorkerMetrics {
    /// Create a new collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record how a fetch was answered.
    pub fn record_fetch(&self, status: CacheStatus) {
        let counter = match status {
            CacheStatus::Network => &self.network_responses,
            CacheStatus::Hit => &self.cache_hits,
            CacheStatus::Fallback => &self.shell_fallbacks,
            CacheStatus::Miss => &self.unavailable,
            CacheStatus::Bypass => &self.passthroughs,
        };
        bump(counter, 1);
    }

    /// Record the outcome of a dynamic cache write.
    pub fn record_dynamic_write(&self, success: bool) {
        if success {
            bump(&self.dynamic_writes, 1);
        } else {
            bump(&self.dynamic_write_failures, 1);
        }
    }

    /// Record assets stored by install.
    pub fn record_precached(&self, count: usize) {
        bump(&self.assets_precached, count as u64);
    }

    /// Record deleted namespaces.
    pub fn record_namespaces_deleted(&self, count: usize) {
        bump(&self.namespaces_deleted, count as u64);
    }

    /// Copy the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            assets_precached: self.assets_precached.get(),
            network_responses: self.network_responses.get(),
            cache_hits: self.cache_hits.get(),
            shell_fallbacks: self.shell_fallbacks.get(),
            unavailable: self.unavailable.get(),
            passthroughs: self.passthroughs.get(),
            dynamic_writes: self.dynamic_writes.get(),
            dynamic_write_failures: self.dynamic_write_failures.get(),
            namespaces_deleted: self.namespaces_deleted.get(),
        }
    }
}
