//! The offline cache manager and its event dispatch table.

use std::cell::Cell;
use std::rc::Rc;

use offline_cache::CacheStorage;
use offline_core::{EventId, WorkerConfig, WorkerState};
use offline_network::Network;
use offline_observability::{MetricsSnapshot, StructuredLogger, WorkerMetrics};

use crate::error::WorkerResult;
use crate::event::{EventKind, EventOutcome, WorkerEvent};
use crate::host::{TaskSpawner, WorkerHost};
use crate::sync::{AuctionSync, SyncRoutine};

/// Offline cache manager for one worker version.
///
/// Storage is shared with detached cache writes, so it is held in an `Rc`.
/// The worker is single-threaded: the host dispatches one event at a time
/// and drives the returned futures.
pub struct OfflineWorker<S, N, H> {
    pub(crate) config: Rc<WorkerConfig>,
    pub(crate) storage: Rc<S>,
    pub(crate) network: N,
    pub(crate) host: H,
    pub(crate) spawner: Rc<dyn TaskSpawner>,
    pub(crate) sync_routine: Box<dyn SyncRoutine>,
    pub(crate) metrics: Rc<WorkerMetrics>,
    logger: StructuredLogger,
    state: Cell<WorkerState>,
}

impl<S, N, H> OfflineWorker<S, N, H>
where
    S: CacheStorage + 'static,
    N: Network,
    H: WorkerHost,
{
    /// Create a worker over the host seams.
    pub fn new(
        config: WorkerConfig,
        storage: Rc<S>,
        network: N,
        host: H,
        spawner: Rc<dyn TaskSpawner>,
    ) -> Self {
        let logger = StructuredLogger::new(config.static_cache.clone());
        Self {
            config: Rc::new(config),
            storage,
            network,
            host,
            spawner,
            sync_routine: Box::new(AuctionSync),
            metrics: Rc::new(WorkerMetrics::new()),
            logger,
            state: Cell::new(WorkerState::Parsed),
        }
    }

    /// Replace the logger (format, level, output).
    pub fn with_logger(mut self, logger: StructuredLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Replace the routine run for the configured sync tag.
    pub fn with_sync_routine(mut self, routine: impl SyncRoutine + 'static) -> Self {
        self.sync_routine = Box::new(routine);
        self
    }

    /// Dispatch one event to its handler.
    pub async fn dispatch(&self, event: WorkerEvent) -> WorkerResult<EventOutcome> {
        self.logger
            .debug_builder("dispatching event")
            .field("event", event.kind().as_str())
            .field("state", self.state().to_string())
            .emit();

        match event {
            WorkerEvent::Install => self.install().await.map(EventOutcome::Installed),
            WorkerEvent::Activate => self.activate().await.map(EventOutcome::Activated),
            WorkerEvent::Fetch(request) => {
                Ok(EventOutcome::Fetch(self.handle_fetch(request).await))
            }
            WorkerEvent::Message(payload) => {
                self.handle_message(&payload).await.map(EventOutcome::Message)
            }
            WorkerEvent::Sync { tag } => self.handle_sync(&tag).await.map(EventOutcome::Sync),
        }
    }

    /// Worker configuration.
    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Current lifecycle state.
    pub fn state(&self) -> WorkerState {
        self.state.get()
    }

    /// Host lifecycle controls.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Network seam.
    pub fn network(&self) -> &N {
        &self.network
    }

    /// Counter snapshot.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub(crate) fn event_logger(&self, kind: EventKind) -> StructuredLogger {
        self.logger.for_event(kind.as_str(), EventId::generate())
    }

    pub(crate) fn transition(&self, next: WorkerState) -> WorkerResult<()> {
        let next = self.state.get().transition(next)?;
        self.state.set(next);
        Ok(())
    }

    pub(crate) fn mark_redundant(&self) {
        self.state.set(WorkerState::Redundant);
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::rc::Rc;

    use offline_cache::InMemoryCacheStorage;
    use offline_core::{FetchResponse, WorkerConfig};
    use offline_network::ScriptedNetwork;

    use super::OfflineWorker;
    use crate::host::{RecordingHost, TaskQueue};

    pub type TestWorker = OfflineWorker<InMemoryCacheStorage, ScriptedNetwork, RecordingHost>;

    pub struct Harness {
        pub worker: TestWorker,
        pub storage: Rc<InMemoryCacheStorage>,
        pub tasks: Rc<TaskQueue>,
    }

    /// Config with a short asset list so tests stay readable.
    pub fn small_config() -> WorkerConfig {
        WorkerConfig::default().with_assets(
            vec!["/", "/index.html", "https://cdn.jsdelivr.net/npm/chart.js"],
            vec!["https://www.gstatic.com/firebasejs/10.7.1/firebase-app-compat.js"],
        )
    }

    /// Network that serves every asset of `small_config`.
    pub fn asset_network() -> ScriptedNetwork {
        ScriptedNetwork::new()
            .route("/", FetchResponse::ok_with("<html>root</html>"))
            .route("/index.html", FetchResponse::ok_with("<html>shell</html>"))
            .route("https://cdn.jsdelivr.net/npm/chart.js", FetchResponse::ok_with("chart"))
            .route(
                "https://www.gstatic.com/firebasejs/10.7.1/firebase-app-compat.js",
                FetchResponse::ok_with("firebase"),
            )
    }

    pub fn harness(config: WorkerConfig, network: ScriptedNetwork, host: RecordingHost) -> Harness {
        let storage = Rc::new(InMemoryCacheStorage::new());
        let tasks = Rc::new(TaskQueue::new());
        let worker = OfflineWorker::new(config, Rc::clone(&storage), network, host, tasks.clone());
        Harness {
            worker,
            storage,
            tasks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::event::{FetchOutcome, MessageOutcome, SyncOutcome};
    use crate::host::RecordingHost;
    use offline_cache::{CacheStatus, CacheStorage};
    use offline_core::FetchRequest;
    use serde_json::json;

    #[tokio::test]
    async fn test_new_worker_is_parsed() {
        let h = harness(small_config(), asset_network(), RecordingHost::new());

        assert_eq!(h.worker.state(), WorkerState::Parsed);
        assert_eq!(h.worker.config().static_cache, "subasta-argenta-v1.0.0");
        assert_eq!(h.worker.metrics(), MetricsSnapshot::default());
    }

    #[tokio::test]
    async fn test_dispatch_full_lifecycle() {
        let h = harness(small_config(), asset_network(), RecordingHost::new());

        let installed = h.worker.dispatch(WorkerEvent::Install).await.unwrap();
        assert!(matches!(installed, EventOutcome::Installed(ref r) if r.cached.len() == 4));

        let activated = h.worker.dispatch(WorkerEvent::Activate).await.unwrap();
        assert!(matches!(activated, EventOutcome::Activated(_)));
        assert_eq!(h.worker.state(), WorkerState::Activated);

        let fetched = h
            .worker
            .dispatch(WorkerEvent::Fetch(FetchRequest::get("/")))
            .await
            .unwrap();
        assert!(matches!(
            fetched,
            EventOutcome::Fetch(FetchOutcome::Respond { status: CacheStatus::Network, .. })
        ));

        let message = h
            .worker
            .dispatch(WorkerEvent::Message(json!({ "type": "SKIP_WAITING" })))
            .await
            .unwrap();
        assert_eq!(message, EventOutcome::Message(MessageOutcome::SkippedWaiting));

        let sync = h
            .worker
            .dispatch(WorkerEvent::Sync { tag: "sync-auctions".into() })
            .await
            .unwrap();
        assert_eq!(sync, EventOutcome::Sync(SyncOutcome::Completed));
    }

    #[tokio::test]
    async fn test_fresh_instance_activates() {
        // The host restarted the worker between install and activate.
        let h = harness(small_config(), asset_network(), RecordingHost::new());
        h.storage.open("subasta-argenta-v0.9.0").await.unwrap();

        let activated = h.worker.dispatch(WorkerEvent::Activate).await.unwrap();

        assert!(matches!(activated, EventOutcome::Activated(ref r) if r.deleted.len() == 1));
        assert!(h.storage.keys().await.unwrap().is_empty());
        assert_eq!(h.worker.host().claim_calls(), 1);
        assert_eq!(h.worker.state(), WorkerState::Activated);
    }

    #[tokio::test]
    async fn test_install_after_activate_is_rejected() {
        let h = harness(small_config(), asset_network(), RecordingHost::new());
        h.worker.dispatch(WorkerEvent::Activate).await.unwrap();

        let err = h.worker.dispatch(WorkerEvent::Install).await.unwrap_err();
        assert!(matches!(err, crate::WorkerError::Lifecycle(_)));
    }
}
