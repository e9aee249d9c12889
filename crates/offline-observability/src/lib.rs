//! Observability for the Subasta Argenta offline worker.
//!
//! This crate provides:
//! - `StructuredLogger` - Structured logging with worker and event context
//! - `WorkerMetrics` - Counters for fetch outcomes and cache maintenance

mod logging;
mod metrics;

pub use logging::*;
pub use metrics::*;

// Re-export EventId from offline-core for convenience
pub use offline_core::EventId;
