//! Activate: evict namespaces left by previous versions.

use futures::future::join_all;
use offline_cache::CacheStorage;
use offline_core::WorkerState;
use offline_network::Network;

use crate::error::WorkerResult;
use crate::event::{ActivationReport, EventKind};
use crate::host::WorkerHost;
use crate::worker::OfflineWorker;

impl<S, N, H> OfflineWorker<S, N, H>
where
    S: CacheStorage + 'static,
    N: Network,
    H: WorkerHost,
{
    /// Handle the activate event.
    ///
    /// Deletes every namespace that is neither the static nor the dynamic
    /// namespace, then claims all open clients. Deletion is best-effort: a
    /// namespace that fails to delete is logged and reported, and the
    /// remaining ones are still removed.
    pub async fn activate(&self) -> WorkerResult<ActivationReport> {
        let log = self.event_logger(EventKind::Activate);
        self.transition(WorkerState::Activating)?;
        log.info("activating");

        let mut report = ActivationReport::default();
        let mut stale = Vec::new();
        for name in self.storage.keys().await? {
            if self.config.is_current_namespace(&name) {
                report.retained.push(name);
            } else {
                stale.push(name);
            }
        }

        let deletions = stale.into_iter().map(|name| async move {
            let result = self.storage.delete(&name).await;
            (name, result)
        });

        for (name, result) in join_all(deletions).await {
            match result {
                Ok(_) => {
                    log.info_builder("deleted stale cache")
                        .field("namespace", name.as_str())
                        .emit();
                    report.deleted.push(name);
                }
                Err(e) => {
                    log.warn_builder("failed to delete stale cache")
                        .field("namespace", name.as_str())
                        .field("error", e.to_string())
                        .emit();
                    report.failed.push(name);
                }
            }
        }
        self.metrics.record_namespaces_deleted(report.deleted.len());

        self.host.claim_clients().await?;
        self.transition(WorkerState::Activated)?;

        log.info_builder("activated")
            .field_u64("deleted", report.deleted.len() as u64)
            .field_u64("failed", report.failed.len() as u64)
            .emit();
        Ok(report)
    }
}
