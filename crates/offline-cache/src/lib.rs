//! Cache storage for the Subasta Argenta offline worker.
//!
//! This crate provides:
//! - `CacheStorage` - Host-provided store of named namespaces
//! - `InMemoryCacheStorage` - Storage for native hosts and tests
//! - `CacheKey` - Request identity (method + URL)
//! - `CacheStatus` - How an intercepted fetch was answered
//!
//! # Example
//!
//! ```ignore
//! use offline_cache::{CacheKey, CacheStorage, InMemoryCacheStorage};
//!
//! let storage = InMemoryCacheStorage::new();
//! storage.put("subasta-argenta-dynamic-v1", &CacheKey::for_url("/"), response).await?;
//! let cached = storage.match_any(&CacheKey::for_url("/")).await?;
//! ```

mod error;
mod key;
mod memory;
mod status;
mod storage;

pub use error::*;
pub use key::*;
pub use memory::*;
pub use status::*;
pub use storage::*;
