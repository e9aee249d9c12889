//! How a fetch was answered.

use serde::{Deserialize, Serialize};

/// Status of an intercepted fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    /// Answered by the network.
    Network,
    /// Network failed, answered from a cached entry.
    Hit,
    /// Network failed, answered with the offline shell document.
    Fallback,
    /// Network failed and nothing cached applied.
    Miss,
    /// Not handled by the worker.
    Bypass,
}

impl CacheStatus {
    /// Whether the response came out of cache storage.
    pub fn from_cache(&self) -> bool {
        matches!(self, Self::Hit | Self::Fallback)
    }
}

impl std::fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network => write!(f, "NETWORK"),
            Self::Hit => write!(f, "HIT"),
            Self::Fallback => write!(f, "FALLBACK"),
            Self::Miss => write!(f, "MISS"),
            Self::Bypass => write!(f, "BYPASS"),
        }
    }
}
