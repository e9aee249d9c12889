//! Offline cache manager for the Subasta Argenta web app.
//!
//! `OfflineWorker` handles the five service-worker events:
//! - install - pre-cache the shell and vendor assets
//! - activate - delete namespaces of older versions, claim clients
//! - fetch - network-first, cache fallback, backend traffic untouched
//! - message - `SKIP_WAITING` and `CLEAR_CACHE` commands
//! - sync - the `sync-auctions` hook
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use offline_cache::InMemoryCacheStorage;
//! use offline_core::{FetchRequest, WorkerConfig};
//! use offline_worker::{OfflineWorker, RecordingHost, TaskQueue, WorkerEvent};
//!
//! let tasks = Rc::new(TaskQueue::new());
//! let worker = OfflineWorker::new(
//!     WorkerConfig::default(),
//!     Rc::new(InMemoryCacheStorage::new()),
//!     network,
//!     RecordingHost::new(),
//!     tasks.clone(),
//! );
//!
//! worker.dispatch(WorkerEvent::Install).await?;
//! worker.dispatch(WorkerEvent::Activate).await?;
//! let outcome = worker.handle_fetch(FetchRequest::navigate("/")).await;
//! tasks.run_pending().await;
//! ```

mod activate;
mod error;
mod event;
mod fallback;
mod fetch;
mod host;
mod install;
mod message;
mod sync;
mod worker;

pub use error::*;
pub use event::*;
pub use fallback::*;
pub use host::*;
pub use sync::*;
pub use worker::*;
