//! Network access for the offline worker.
//!
//! This crate provides:
//! - `Network` - Host fetch seam
//! - `FetchError` - Rejections and bad statuses
//! - `ScriptedNetwork` - Route-table network for native hosts and tests

mod client;
mod scripted;

pub use client::*;
pub use scripted::*;
