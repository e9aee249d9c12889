//! Install: pre-cache the application shell and vendor assets.

use futures::future::join_all;
use offline_cache::{CacheKey, CacheStorage};
use offline_core::{InstallPolicy, WorkerState};
use offline_network::Network;
use offline_observability::StructuredLogger;

use crate::error::{WorkerError, WorkerResult};
use crate::event::{EventKind, InstallReport};
use crate::host::WorkerHost;
use crate::worker::OfflineWorker;

impl<S, N, H> OfflineWorker<S, N, H>
where
    S: CacheStorage + 'static,
    N: Network,
    H: WorkerHost,
{
    /// Handle the install event.
    ///
    /// Fetches every pre-cache URL and stores the responses in the static
    /// namespace. Under [`InstallPolicy::FailFast`] one failed asset aborts
    /// the install before anything is written and the worker becomes
    /// redundant. On success the host is told to skip waiting.
    pub async fn install(&self) -> WorkerResult<InstallReport> {
        let log = self.event_logger(EventKind::Install);
        self.transition(WorkerState::Installing)?;
        log.info("installing");

        let report = match self.precache(&log).await {
            Ok(report) => report,
            Err(e) => {
                self.mark_redundant();
                log.error_builder("install failed")
                    .field("error", e.to_string())
                    .emit();
                return Err(e);
            }
        };

        self.transition(WorkerState::Installed)?;
        self.host.skip_waiting().await?;

        log.info_builder("installed")
            .field_u64("cached", report.cached.len() as u64)
            .field_u64("failed", report.failed.len() as u64)
            .emit();
        Ok(report)
    }

    async fn precache(&self, log: &StructuredLogger) -> WorkerResult<InstallReport> {
        let namespace = self.config.static_cache.as_str();
        self.storage.open(namespace).await?;
        log.info_builder("caching static assets")
            .field("namespace", namespace)
            .emit();
        log.debug_builder("worker config")
            .field("config", self.config.to_json())
            .emit();

        let fetches = self.config.precache_urls().map(|url| async move {
            (url, self.network.fetch_ok(url).await)
        });
        let results = join_all(fetches).await;

        let mut entries = Vec::with_capacity(results.len());
        let mut failed = Vec::new();
        for (url, result) in results {
            match result {
                Ok(response) => entries.push((CacheKey::for_url(url), response)),
                Err(source) => match self.config.install_policy {
                    InstallPolicy::FailFast => {
                        return Err(WorkerError::Install {
                            url: url.to_string(),
                            source,
                        });
                    }
                    InstallPolicy::BestEffort => {
                        log.warn_builder("skipping asset")
                            .field("url", url)
                            .field("error", source.to_string())
                            .field_bool("unreachable", source.is_rejection())
                            .emit();
                        failed.push(url.to_string());
                    }
                },
            }
        }

        let cached: Vec<String> = entries
            .iter()
            .map(|(key, _)| key.url().to_string())
            .collect();
        self.storage.put_all(namespace, entries).await?;
        self.metrics.record_precached(cached.len());

        Ok(InstallReport {
            namespace: namespace.to_string(),
            cached,
            failed,
        })
    }
}
