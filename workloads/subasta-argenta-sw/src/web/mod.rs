//! Browser entry points.

mod convert;
mod host;
mod network;
mod storage;

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{anyhow, Context};
use js_sys::Reflect;
use offline_core::{FetchRequest, WorkerConfig};
use offline_observability::LogOutput;
use offline_worker::{OfflineWorker, PassthroughReason, WorkerEvent};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::future_to_promise;
use web_sys::{
    ExtendableEvent, ExtendableMessageEvent, FetchEvent, Request, Response,
    ServiceWorkerGlobalScope,
};

use self::convert::{js_message, request_from_js, response_from_js, response_to_js};
use self::host::{console_sink, LocalSpawner, WebHost};
use self::network::{fetch_as_issued, WebNetwork};
use self::storage::WebCacheStorage;
use crate::{message_payload, worker_config, worker_logger};

type BrowserWorker = OfflineWorker<WebCacheStorage, WebNetwork, WebHost>;

thread_local! {
    static WORKER: RefCell<Option<Rc<BrowserWorker>>> = const { RefCell::new(None) };
}

#[cfg(test)]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_service_worker);

#[wasm_bindgen(start)]
fn start() {
    console_error_panic_hook::set_once();
}

fn reject(error: impl Into<anyhow::Error>) -> JsValue {
    js_sys::Error::new(&format!("{:#}", error.into())).into()
}

/// The worker for this scope, built on first use.
fn worker() -> anyhow::Result<Rc<BrowserWorker>> {
    WORKER.with(|slot| {
        if let Some(worker) = slot.borrow().as_ref() {
            return Ok(Rc::clone(worker));
        }

        let scope = js_sys::global()
            .dyn_into::<ServiceWorkerGlobalScope>()
            .map_err(|_| anyhow!("not running in a service worker scope"))?;
        let config = worker_config();
        let storage = WebCacheStorage::new(&scope).context("opening the Cache API")?;
        let logger = worker_logger(&config, LogOutput::Custom(console_sink));

        let worker = Rc::new(
            OfflineWorker::new(
                config,
                Rc::new(storage),
                WebNetwork::new(scope.clone()),
                WebHost::new(scope),
                Rc::new(LocalSpawner),
            )
            .with_logger(logger),
        );
        *slot.borrow_mut() = Some(Rc::clone(&worker));
        Ok(worker)
    })
}

/// Dispatch `worker_event` and keep the worker alive until it settles.
fn extend(event: &ExtendableEvent, worker_event: WorkerEvent) -> Result<(), JsValue> {
    let worker = worker().map_err(reject)?;
    let promise = future_to_promise(async move {
        worker.dispatch(worker_event).await.map_err(reject)?;
        Ok(JsValue::UNDEFINED)
    });
    event.wait_until(&promise)
}

#[wasm_bindgen]
pub fn on_install(event: ExtendableEvent) -> Result<(), JsValue> {
    extend(&event, WorkerEvent::Install)
}

#[wasm_bindgen]
pub fn on_activate(event: ExtendableEvent) -> Result<(), JsValue> {
    extend(&event, WorkerEvent::Activate)
}

/// The worker's view of a page request, or `None` when the page's own
/// fetch should proceed as if uncontrolled.
fn intercepted(config: &WorkerConfig, request: &Request) -> Option<FetchRequest> {
    let request = request_from_js(request).ok()?;
    PassthroughReason::for_request(config, &request)
        .is_none()
        .then_some(request)
}

/// Answer a fetch event, or leave it alone for passthrough traffic.
///
/// The page's own `Request` goes to the network, and its `Response` is
/// handed back untouched; only a clone is read for the cache write.
#[wasm_bindgen]
pub fn on_fetch(event: FetchEvent) -> Result<(), JsValue> {
    let worker = worker().map_err(reject)?;
    let page_request = event.request();
    let Some(request) = intercepted(worker.config(), &page_request) else {
        return Ok(());
    };
    let scope = worker.network().scope().clone();

    let promise = future_to_promise(async move {
        match fetch_as_issued(&scope, &page_request).await {
            Ok(response) => {
                worker.network_responded(&request, response.status(), || {
                    let copy = response.clone();
                    async move {
                        let copy = copy.map_err(|e| js_message(&e))?;
                        response_from_js(&copy).await
                    }
                });
                Ok(response.into())
            }
            Err(e) => {
                let outcome = worker.network_failed(&request, &js_message(&e)).await;
                match outcome.into_response() {
                    Some(response) => response_to_js(&response).map(JsValue::from),
                    None => Ok(Response::error().into()),
                }
            }
        }
    });
    event.respond_with(&promise)
}

/// Only the `type` field selects a command, so it is read directly off the
/// posted value whatever else the value holds.
#[wasm_bindgen]
pub fn on_message(event: ExtendableMessageEvent) -> Result<(), JsValue> {
    let kind = Reflect::get(&event.data(), &JsValue::from_str("type"))
        .ok()
        .and_then(|kind| kind.as_string());
    extend(&event, WorkerEvent::Message(message_payload(kind.as_deref())))
}

#[wasm_bindgen]
pub fn on_sync(event: ExtendableEvent) -> Result<(), JsValue> {
    let tag = Reflect::get(&event, &JsValue::from_str("tag"))
        .ok()
        .and_then(|tag| tag.as_string())
        .unwrap_or_default();
    extend(&event, WorkerEvent::Sync { tag })
}
