//! Lifecycle controls, detached tasks and the console log sink.

use async_trait::async_trait;
use futures::future::LocalBoxFuture;
use offline_observability::LogLevel;
use offline_worker::{HostError, TaskSpawner, WorkerHost};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{console, ServiceWorkerGlobalScope};

use super::convert::js_message;

pub(crate) struct WebHost {
    scope: ServiceWorkerGlobalScope,
}

impl WebHost {
    pub(crate) fn new(scope: ServiceWorkerGlobalScope) -> Self {
        Self { scope }
    }
}

fn host_error(value: JsValue) -> HostError {
    HostError(js_message(&value))
}

#[async_trait(?Send)]
impl WorkerHost for WebHost {
    async fn skip_waiting(&self) -> Result<(), HostError> {
        let promise = self.scope.skip_waiting().map_err(host_error)?;
        JsFuture::from(promise).await.map_err(host_error)?;
        Ok(())
    }

    async fn claim_clients(&self) -> Result<(), HostError> {
        JsFuture::from(self.scope.clients().claim())
            .await
            .map_err(host_error)?;
        Ok(())
    }
}

/// Runs detached tasks on the browser event loop.
pub(crate) struct LocalSpawner;

impl TaskSpawner for LocalSpawner {
    fn spawn_detached(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}

pub(crate) fn console_sink(level: LogLevel, line: &str) {
    let line = JsValue::from_str(line);
    match level {
        LogLevel::Trace | LogLevel::Debug => console::debug_1(&line),
        LogLevel::Info => console::log_1(&line),
        LogLevel::Warn => console::warn_1(&line),
        LogLevel::Error => console::error_1(&line),
    }
}
