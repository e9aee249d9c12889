//! Service worker for the Subasta Argenta web app.
//!
//! This workload wires the offline cache manager to the browser:
//! - `CacheStorage` over the Cache API
//! - `Network` over `fetch()`
//! - lifecycle controls over `skipWaiting()` and `clients.claim()`
//! - detached cache writes on the microtask queue
//! - log lines on the browser console
//!
//! The JS glue registers one listener per event and forwards it to the
//! matching `on_*` export.

use offline_core::WorkerConfig;
use offline_observability::{LogFormat, LogLevel, LogOutput, StructuredLogger};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{on_activate, on_fetch, on_install, on_message, on_sync};

/// Configuration of the deployed worker version.
pub fn worker_config() -> WorkerConfig {
    WorkerConfig::default()
}

/// Logger for the deployed worker: human-readable lines, info and above.
pub fn worker_logger(config: &WorkerConfig, output: LogOutput) -> StructuredLogger {
    StructuredLogger::new(config.static_cache.clone())
        .with_format(LogFormat::Human)
        .with_min_level(LogLevel::Info)
        .with_output(output)
}

/// Message payload carrying the `type` read off a posted value.
///
/// A value without a string `type` becomes `null`, which the worker ignores.
pub fn message_payload(kind: Option<&str>) -> serde_json::Value {
    match kind {
        Some(kind) => serde_json::json!({ "type": kind }),
        None => serde_json::Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use offline_worker::WorkerCommand;
    use serde_json::json;
    use std::cell::RefCell;

    thread_local! {
        static LINES: RefCell<Vec<(LogLevel, String)>> = const { RefCell::new(Vec::new()) };
    }

    fn capture(level: LogLevel, line: &str) {
        LINES.with(|lines| lines.borrow_mut().push((level, line.to_string())));
    }

    #[test]
    fn test_deployed_config() {
        let config = worker_config();

        assert_eq!(config.static_cache, "subasta-argenta-v1.0.0");
        assert_eq!(config.dynamic_cache, "subasta-argenta-dynamic-v1");
        assert_eq!(config.precache_urls().count(), 11);
    }

    #[test]
    fn test_logger_drops_debug() {
        let logger = worker_logger(&worker_config(), LogOutput::Custom(capture));

        logger.debug("detail");
        logger.warn("cache lookup failed");

        LINES.with(|lines| {
            let lines = lines.borrow();
            assert_eq!(lines.len(), 1);
            assert_eq!(lines[0].0, LogLevel::Warn);
            assert!(lines[0].1.contains("cache lookup failed"));
        });
    }

    #[test]
    fn test_message_payload() {
        assert_eq!(message_payload(Some("CLEAR_CACHE")), json!({ "type": "CLEAR_CACHE" }));
        assert_eq!(message_payload(None), serde_json::Value::Null);
    }

    #[test]
    fn test_message_payload_selects_command() {
        assert_eq!(
            WorkerCommand::parse(&message_payload(Some("SKIP_WAITING"))),
            Some(WorkerCommand::SkipWaiting)
        );
        assert_eq!(WorkerCommand::parse(&message_payload(Some("PING"))), None);
        assert_eq!(WorkerCommand::parse(&message_payload(None)), None);
    }
}
