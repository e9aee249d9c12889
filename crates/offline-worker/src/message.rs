//! Message commands from application code.

use futures::future::join_all;
use offline_cache::CacheStorage;
use offline_network::Network;

use crate::error::WorkerResult;
use crate::event::{EventKind, MessageOutcome, WorkerCommand};
use crate::host::WorkerHost;
use crate::worker::OfflineWorker;

impl<S, N, H> OfflineWorker<S, N, H>
where
    S: CacheStorage + 'static,
    N: Network,
    H: WorkerHost,
{
    /// Handle a message event.
    ///
    /// `SKIP_WAITING` asks the host to activate this version now.
    /// `CLEAR_CACHE` deletes every namespace and resolves once all deletions
    /// have settled; the first failure is returned after that. Other payloads
    /// are ignored.
    pub async fn handle_message(
        &self,
        payload: &serde_json::Value,
    ) -> WorkerResult<MessageOutcome> {
        let log = self.event_logger(EventKind::Message);

        match WorkerCommand::parse(payload) {
            Some(WorkerCommand::SkipWaiting) => {
                log.info("skip waiting requested");
                self.host.skip_waiting().await?;
                Ok(MessageOutcome::SkippedWaiting)
            }
            Some(WorkerCommand::ClearCache) => {
                let deleted = self.clear_all().await?;
                log.info_builder("cleared all caches")
                    .field_u64("deleted", deleted.len() as u64)
                    .emit();
                Ok(MessageOutcome::ClearedCache { deleted })
            }
            None => {
                log.debug("ignoring message");
                Ok(MessageOutcome::Ignored)
            }
        }
    }

    async fn clear_all(&self) -> WorkerResult<Vec<String>> {
        let names = self.storage.keys().await?;
        let deletions = names.into_iter().map(|name| async move {
            let result = self.storage.delete(&name).await;
            (name, result)
        });

        let mut deleted = Vec::new();
        let mut first_error = None;
        for (name, result) in join_all(deletions).await {
            match result {
                Ok(_) => deleted.push(name),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        self.metrics.record_namespaces_deleted(deleted.len());

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(deleted),
        }
    }
}
