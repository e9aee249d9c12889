//! Background sync hook.

use async_trait::async_trait;
use offline_cache::CacheStorage;
use offline_network::Network;

use crate::error::{WorkerError, WorkerResult};
use crate::event::{EventKind, SyncOutcome};
use crate::host::WorkerHost;
use crate::worker::OfflineWorker;

/// Work run when the host fires the configured sync tag.
///
/// An `Err` is returned to the host, which reschedules the sync.
#[async_trait(?Send)]
pub trait SyncRoutine {
    async fn run(&self) -> Result<(), String>;
}

/// Auction synchronization. Placeholder: resolves immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuctionSync;

#[async_trait(?Send)]
impl SyncRoutine for AuctionSync {
    async fn run(&self) -> Result<(), String> {
        Ok(())
    }
}

impl<S, N, H> OfflineWorker<S, N, H>
where
    S: CacheStorage + 'static,
    N: Network,
    H: WorkerHost,
{
    /// Handle a background sync event. Only the configured tag runs the routine.
    pub async fn handle_sync(&self, tag: &str) -> WorkerResult<SyncOutcome> {
        let log = self.event_logger(EventKind::Sync);

        if tag != self.config.sync_tag {
            log.debug_builder("ignoring sync tag").field("tag", tag).emit();
            return Ok(SyncOutcome::Ignored);
        }

        log.info("synchronizing auctions");
        match self.sync_routine.run().await {
            Ok(()) => Ok(SyncOutcome::Completed),
            Err(reason) => {
                log.error_builder("sync failed")
                    .field("tag", tag)
                    .field("error", reason.as_str())
                    .emit();
                Err(WorkerError::Sync {
                    tag: tag.to_string(),
                    reason,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RecordingHost;
    use crate::worker::test_support::*;

    struct Unreachable;

    #[async_trait(?Send)]
    impl SyncRoutine for Unreachable {
        async fn run(&self) -> Result<(), String> {
            Err("backend unreachable".to_string())
        }
    }

    #[tokio::test]
    async fn test_auction_sync_completes() {
        let h = harness(small_config(), asset_network(), RecordingHost::new());

        let outcome = h.worker.handle_sync("sync-auctions").await.unwrap();

        assert_eq!(outcome, SyncOutcome::Completed);
    }

    #[tokio::test]
    async fn test_other_tags_ignored() {
        let h = harness(small_config(), asset_network(), RecordingHost::new());

        let outcome = h.worker.handle_sync("sync-bids").await.unwrap();

        assert_eq!(outcome, SyncOutcome::Ignored);
    }

    #[tokio::test]
    async fn test_failure_reaches_host() {
        let h = harness(small_config(), asset_network(), RecordingHost::new());
        let worker = h.worker.with_sync_routine(Unreachable);

        let err = worker.handle_sync("sync-auctions").await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "background sync 'sync-auctions' failed: backend unreachable"
        );
    }

    #[tokio::test]
    async fn test_stub_touches_nothing() {
        let h = harness(small_config(), asset_network(), RecordingHost::new());

        h.worker.handle_sync("sync-auctions").await.unwrap();

        assert!(h.worker.network().calls().is_empty());
        assert_eq!(h.tasks.pending(), 0);
    }
}
