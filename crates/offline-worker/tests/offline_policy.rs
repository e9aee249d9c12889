//! End-to-end checks of the offline caching policy against in-memory seams.

use std::cell::Cell;
use std::rc::Rc;

use async_trait::async_trait;
use offline_cache::{CacheKey, CacheResult, CacheStatus, CacheStorage, InMemoryCacheStorage};
use offline_core::{FetchRequest, FetchResponse, Method, WorkerConfig};
use offline_network::ScriptedNetwork;
use offline_worker::{
    FetchOutcome, MessageOutcome, OfflineWorker, PassthroughReason, RecordingHost, TaskQueue,
    WorkerEvent,
};
use serde_json::json;

const STATIC: &str = "subasta-argenta-v1.0.0";
const DYNAMIC: &str = "subasta-argenta-dynamic-v1";

/// Storage wrapper counting every call that reaches the cache.
#[derive(Default)]
struct CountingStorage {
    inner: InMemoryCacheStorage,
    reads: Cell<u32>,
    writes: Cell<u32>,
}

impl CountingStorage {
    fn read(&self) {
        self.reads.set(self.reads.get() + 1);
    }

    fn write(&self) {
        self.writes.set(self.writes.get() + 1);
    }
}

#[async_trait(?Send)]
impl CacheStorage for CountingStorage {
    async fn open(&self, namespace: &str) -> CacheResult<()> {
        self.write();
        self.inner.open(namespace).await
    }

    async fn has(&self, namespace: &str) -> CacheResult<bool> {
        self.read();
        self.inner.has(namespace).await
    }

    async fn put(

        &self,

        namespace: &str,

        key: &CacheKey,

        response: FetchResponse,

    ) -> CacheResult<()> {
        self.write();
        self.inner.put(namespace, key, response).await
    }

    async fn match_in(

        &self,

        namespace: &str,

        key: &CacheKey,

    ) -> CacheResult<Option<FetchResponse>> {
        self.read();
        self.inner.match_in(namespace, key).await
    }

    async fn match_any(&self, key: &CacheKey) -> CacheResult<Option<FetchResponse>> {
        self.read();
        self.inner.match_any(key).await
    }

    async fn delete_entry(&self, namespace: &str, key: &CacheKey) -> CacheResult<bool> {
        self.write();
        self.inner.delete_entry(namespace, key).await
    }

    async fn entries(&self, namespace: &str) -> CacheResult<Vec<CacheKey>> {
        self.read();
        self.inner.entries(namespace).await
    }

    async fn keys(&self) -> CacheResult<Vec<String>> {
        self.read();
        self.inner.keys().await
    }

    async fn delete(&self, namespace: &str) -> CacheResult<bool> {
        self.write();
        self.inner.delete(namespace).await
    }
}

/// Network serving every asset the config pre-caches.
fn network_for(config: &WorkerConfig) -> ScriptedNetwork {
    config.precache_urls().fold(ScriptedNetwork::new(), |network, url| {
        let body = if url == "/index.html" {
            "<html>subasta argenta</html>".to_string()
        } else {
            format!("asset {url}")
        };
        network.route(url, FetchResponse::ok_with(body))
    })
}

fn worker_over<S: CacheStorage + 'static>(
    storage: Rc<S>,
    network: ScriptedNetwork,
) -> (OfflineWorker<S, ScriptedNetwork, RecordingHost>, Rc<TaskQueue>) {
    let tasks = Rc::new(TaskQueue::new());
    let worker = OfflineWorker::new(
        WorkerConfig::default(),
        storage,
        network,
        RecordingHost::new(),
        tasks.clone(),
    );
    (worker, tasks)
}

/// Installed and activated worker; `extra` adds routes beyond the assets.
async fn installed_worker(
    extra: &[(&str, &str)],
) -> (
    OfflineWorker<InMemoryCacheStorage, ScriptedNetwork, RecordingHost>,
    Rc<InMemoryCacheStorage>,
    Rc<TaskQueue>,
) {
    let network = extra
        .iter()
        .fold(network_for(&WorkerConfig::default()), |network, (url, body)| {
            network.route(url, FetchResponse::ok_with(*body))
        });
    let storage = Rc::new(InMemoryCacheStorage::new());
    let (worker, tasks) = worker_over(Rc::clone(&storage), network);
    worker.dispatch(WorkerEvent::Install).await.unwrap();
    worker.dispatch(WorkerEvent::Activate).await.unwrap();
    (worker, storage, tasks)
}

#[tokio::test]
async fn test_install_precaches_every_asset() {
    let config = WorkerConfig::default();
    let storage = Rc::new(InMemoryCacheStorage::new());
    let (worker, _tasks) = worker_over(Rc::clone(&storage), network_for(&config));

    worker.install().await.unwrap();

    let urls: Vec<&str> = config.precache_urls().collect();
    assert_eq!(urls.len(), 11);
    for url in urls {
        let cached = storage.match_in(STATIC, &CacheKey::for_url(url)).await.unwrap();
        assert!(cached.is_some(), "{url} missing from {STATIC}");
    }
    assert_eq!(worker.host().skip_waiting_calls(), 1);
}

#[tokio::test]
async fn test_activation_leaves_only_current_namespaces() {
    let storage = Rc::new(InMemoryCacheStorage::new());
    for stale in ["subasta-argenta-v0.9.0", "subasta-argenta-dynamic-v0", "otra-app"] {
        storage.open(stale).await.unwrap();
    }
    storage.open(DYNAMIC).await.unwrap();
    let network = network_for(&WorkerConfig::default());
    let (worker, _tasks) = worker_over(Rc::clone(&storage), network);

    worker.install().await.unwrap();
    let report = worker.activate().await.unwrap();

    let remaining = storage.keys().await.unwrap();
    assert!(remaining
        .iter()
        .all(|name| name == STATIC || name == DYNAMIC));
    assert_eq!(report.deleted.len(), 3);
    assert_eq!(worker.host().claim_calls(), 1);
}

#[tokio::test]
async fn test_restarted_worker_activates_over_installed_storage() {
    let storage = Rc::new(InMemoryCacheStorage::new());
    storage.open("subasta-argenta-v0.9.0").await.unwrap();
    let config = WorkerConfig::default();
    let (installer, _tasks) = worker_over(Rc::clone(&storage), network_for(&config));
    installer.install().await.unwrap();

    // The host stopped the installing instance; a fresh one gets activate.
    drop(installer);
    let (worker, _tasks) = worker_over(Rc::clone(&storage), network_for(&config));
    worker.dispatch(WorkerEvent::Activate).await.unwrap();

    assert_eq!(storage.keys().await.unwrap(), vec![STATIC.to_string()]);
    assert_eq!(worker.host().claim_calls(), 1);
}

#[tokio::test]
async fn test_network_success_is_returned_then_cached() {
    let (worker, storage, tasks) = installed_worker(&[("/subastas/42", "lote 42")]).await;

    let outcome = worker.handle_fetch(FetchRequest::navigate("/subastas/42")).await;

    assert_eq!(
        outcome,
        FetchOutcome::Respond {
            response: FetchResponse::ok_with("lote 42"),
            status: CacheStatus::Network,
        }
    );

    tasks.run_pending().await;
    let cached = storage
        .match_in(DYNAMIC, &CacheKey::for_url("/subastas/42"))
        .await
        .unwrap();
    assert_eq!(cached, Some(FetchResponse::ok_with("lote 42")));
}

#[tokio::test]
async fn test_offline_returns_cached_entry_unchanged() {
    let (worker, storage, _tasks) = installed_worker(&[]).await;
    let stored = FetchResponse::ok_with("precio: 1500").with_header("content-type", "text/plain");
    storage
        .put(DYNAMIC, &CacheKey::for_url("/api-cache/lote/7"), stored.clone())
        .await
        .unwrap();
    worker.network().set_offline(true);

    let from_dynamic = worker.handle_fetch(FetchRequest::get("/api-cache/lote/7")).await;
    let from_static = worker
        .handle_fetch(FetchRequest::get("https://cdn.jsdelivr.net/npm/chart.js"))
        .await;

    assert_eq!(from_dynamic.into_response(), Some(stored));
    assert_eq!(
        from_static.into_response(),
        Some(FetchResponse::ok_with("asset https://cdn.jsdelivr.net/npm/chart.js"))
    );
}

#[tokio::test]
async fn test_offline_navigation_falls_back_to_shell() {
    let (worker, _storage, _tasks) = installed_worker(&[]).await;
    worker.network().set_offline(true);

    let outcome = worker.handle_fetch(FetchRequest::navigate("/perfil/ofertas")).await;

    assert_eq!(
        outcome,
        FetchOutcome::Respond {
            response: FetchResponse::ok_with("<html>subasta argenta</html>"),
            status: CacheStatus::Fallback,
        }
    );
}

#[tokio::test]
async fn test_non_get_never_touches_cache() {
    let storage = Rc::new(CountingStorage::default());
    let (worker, tasks) = worker_over(Rc::clone(&storage), ScriptedNetwork::new());

    for method in [Method::POST, Method::PUT, Method::DELETE] {
        let outcome = worker
            .handle_fetch(FetchRequest::new(method, "/api/pujas"))
            .await;
        assert_eq!(outcome, FetchOutcome::Passthrough(PassthroughReason::Method));
    }

    worker.network().set_offline(true);
    worker
        .handle_fetch(FetchRequest::new(Method::POST, "/api/pujas"))
        .await;

    assert_eq!(tasks.pending(), 0);
    assert_eq!(storage.reads.get(), 0);
    assert_eq!(storage.writes.get(), 0);
}

#[tokio::test]
async fn test_firestore_requests_are_not_controlled() {
    let storage = Rc::new(CountingStorage::default());
    let (worker, tasks) = worker_over(Rc::clone(&storage), ScriptedNetwork::new());
    let url = "https://firestore.googleapis.com/google.firestore.v1.Firestore/Listen/channel";

    let online = worker.handle_fetch(FetchRequest::get(url)).await;
    worker.network().set_offline(true);
    let offline = worker.handle_fetch(FetchRequest::get(url)).await;

    let excluded = FetchOutcome::Passthrough(PassthroughReason::Excluded);
    assert_eq!(online, excluded);
    assert_eq!(offline, excluded);
    assert!(worker.network().calls().is_empty());
    assert_eq!(tasks.pending(), 0);
    assert_eq!(storage.reads.get() + storage.writes.get(), 0);
}

#[tokio::test]
async fn test_clear_cache_empties_storage() {
    let (worker, storage, tasks) = installed_worker(&[("/lotes", "listado")]).await;
    worker.handle_fetch(FetchRequest::get("/lotes")).await;
    tasks.run_pending().await;
    assert!(storage.has(DYNAMIC).await.unwrap());

    let outcome = worker
        .dispatch(WorkerEvent::Message(json!({ "type": "CLEAR_CACHE" })))
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        offline_worker::EventOutcome::Message(MessageOutcome::ClearedCache { .. })
    ));
    assert!(storage.keys().await.unwrap().is_empty());
}
