//! Core types for the Subasta Argenta offline worker.
//!
//! This crate provides the fundamental types:
//! - `WorkerConfig` - Cache names, asset lists and exclusions
//! - `FetchRequest` / `FetchResponse` - Intercepted traffic
//! - `WorkerState` - Install/activate lifecycle tracking
//! - `EventId` - Log correlation for dispatched events

mod config;
mod lifecycle;
mod request;
mod response;

pub use config::*;
pub use lifecycle::*;
pub use request::*;
pub use response::*;

pub use http::{HeaderMap, Method, StatusCode};
