//! Worker configuration.

use serde::{Deserialize, Serialize};

/// Versioned name of the static (pre-cached) namespace.
pub const STATIC_CACHE_NAME: &str = "subasta-argenta-v1.0.0";

/// Name of the runtime-populated namespace.
pub const DYNAMIC_CACHE_NAME: &str = "subasta-argenta-dynamic-v1";

/// Cached document served to navigations when offline.
pub const OFFLINE_FALLBACK_URL: &str = "/index.html";

/// Background sync tag for auction synchronization.
pub const SYNC_AUCTIONS_TAG: &str = "sync-auctions";

/// Application shell assets.
pub const SHELL_ASSETS: &[&str] = &[
    "/",
    "/index.html",
    "https://cdn.tailwindcss.com",
    "https://cdn.jsdelivr.net/npm/bootstrap@5.3.2/dist/css/bootstrap.min.css",
    "https://cdn.jsdelivr.net/npm/bootstrap@5.3.2/dist/js/bootstrap.bundle.min.js",
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.4.0/css/all.min.css",
    "https://cdn.jsdelivr.net/npm/chart.js",
];

/// Third-party vendor assets (Firebase compat SDK).
pub const VENDOR_ASSETS: &[&str] = &[
    "https://www.gstatic.com/firebasejs/10.7.1/firebase-app-compat.js",
    "https://www.gstatic.com/firebasejs/10.7.1/firebase-auth-compat.js",
    "https://www.gstatic.com/firebasejs/10.7.1/firebase-firestore-compat.js",
    "https://www.gstatic.com/firebasejs/10.7.1/firebase-storage-compat.js",
];

/// URL fragments identifying backend traffic that must never be cached.
pub const EXCLUDED_FRAGMENTS: &[&str] =
    &["firestore.googleapis.com", "firebase", "firebasestorage"];

/// How install treats individual asset failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallPolicy {
    /// Any failed asset aborts the install and nothing is stored.
    #[default]
    FailFast,
    /// Store what succeeded and report the rest.
    BestEffort,
}

/// Immutable configuration for one worker version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Static namespace name (carries the version tag).
    pub static_cache: String,
    /// Dynamic namespace name.
    pub dynamic_cache: String,
    /// Application shell assets.
    pub shell_assets: Vec<String>,
    /// Vendor assets.
    pub vendor_assets: Vec<String>,
    /// Substrings that exclude a URL from caching.
    pub excluded_fragments: Vec<String>,
    /// Document returned to offline navigations with no cached match.
    pub offline_fallback: String,
    /// Background sync tag handled by the worker.
    pub sync_tag: String,
    /// Install failure policy.
    #[serde(default)]
    pub install_policy: InstallPolicy,
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            static_cache: STATIC_CACHE_NAME.to_string(),
            dynamic_cache: DYNAMIC_CACHE_NAME.to_string(),
            shell_assets: owned(SHELL_ASSETS),
            vendor_assets: owned(VENDOR_ASSETS),
            excluded_fragments: owned(EXCLUDED_FRAGMENTS),
            offline_fallback: OFFLINE_FALLBACK_URL.to_string(),
            sync_tag: SYNC_AUCTIONS_TAG.to_string(),
            install_policy: InstallPolicy::FailFast,
        }
    }
}

impl WorkerConfig {
    /// Set the static namespace name.
    pub fn with_static_cache(mut self, name: impl Into<String>) -> Self {
        self.static_cache = name.into();
        self
    }

    /// Set the dynamic namespace name.
    pub fn with_dynamic_cache(mut self, name: impl Into<String>) -> Self {
        self.dynamic_cache = name.into();
        self
    }

    /// Replace both asset lists.
    pub fn with_assets(mut self, shell: Vec<&str>, vendor: Vec<&str>) -> Self {
        self.shell_assets = owned(&shell);
        self.vendor_assets = owned(&vendor);
        self
    }

    /// Set the install failure policy.
    pub fn with_install_policy(mut self, policy: InstallPolicy) -> Self {
        self.install_policy = policy;
        self
    }

    /// Every URL pre-cached on install: shell assets followed by vendor assets.
    pub fn precache_urls(&self) -> impl Iterator<Item = &str> {
        self.shell_assets
            .iter()
            .chain(self.vendor_assets.iter())
            .map(String::as_str)
    }

    /// Whether a URL targets backend traffic that bypasses the worker.
    pub fn is_excluded(&self, url: &str) -> bool {
        self.excluded_fragments
            .iter()
            .any(|fragment| url.contains(fragment.as_str()))
    }

    /// Whether a namespace belongs to this worker version.
    pub fn is_current_namespace(&self, name: &str) -> bool {
        name == self.static_cache || name == self.dynamic_cache
    }

    /// Serialize for diagnostics.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.static_cache.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_names() {
        let config = WorkerConfig::default();

        assert_eq!(config.static_cache, "subasta-argenta-v1.0.0");
        assert_eq!(config.dynamic_cache, "subasta-argenta-dynamic-v1");
        assert_eq!(config.offline_fallback, "/index.html");
        assert_eq!(config.sync_tag, "sync-auctions");
        assert_eq!(config.install_policy, InstallPolicy::FailFast);
    }

    #[test]
    fn test_precache_urls_order() {
        let config = WorkerConfig::default();
        let urls: Vec<&str> = config.precache_urls().collect();

        assert_eq!(urls.len(), 11);
        assert_eq!(urls[0], "/");
        assert_eq!(urls[1], "/index.html");
        assert_eq!(
            urls[10],
            "https://www.gstatic.com/firebasejs/10.7.1/firebase-storage-compat.js"
        );
    }

    #[test]
    fn test_is_excluded() {
        let config = WorkerConfig::default();

        assert!(config.is_excluded(
            "https://firestore.googleapis.com/google.firestore.v1.Firestore/Listen"
        ));
        assert!(config.is_excluded("https://firebasestorage.googleapis.com/v0/b/img.png"));
        assert!(config.is_excluded("https://subasta.firebaseapp.com/__/auth"));
        assert!(!config.is_excluded("https://cdn.jsdelivr.net/npm/chart.js"));
        assert!(!config.is_excluded("/lotes/42"));
    }

    #[test]
    fn test_vendor_assets_match_exclusion() {
        // "firebasejs" contains "firebase": the SDK is pre-cached but runtime
        // requests for it bypass the worker.
        let config = WorkerConfig::default();
        assert!(config.vendor_assets.iter().all(|u| config.is_excluded(u)));
        assert!(config.shell_assets.iter().all(|u| !config.is_excluded(u)));
    }

    #[test]
    fn test_is_current_namespace() {
        let config = WorkerConfig::default();

        assert!(config.is_current_namespace("subasta-argenta-v1.0.0"));
        assert!(config.is_current_namespace("subasta-argenta-dynamic-v1"));
        assert!(!config.is_current_namespace("subasta-argenta-v0.9.0"));
    }

    #[test]
    fn test_builder_chain() {
        let config = WorkerConfig::default()
            .with_static_cache("static-v2")
            .with_dynamic_cache("dynamic-v2")
            .with_assets(vec!["/", "/index.html"], vec![])
            .with_install_policy(InstallPolicy::BestEffort);

        assert_eq!(config.static_cache, "static-v2");
        assert_eq!(config.dynamic_cache, "dynamic-v2");
        assert_eq!(config.precache_urls().count(), 2);
        assert_eq!(config.install_policy, InstallPolicy::BestEffort);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = WorkerConfig::default();
        let parsed: WorkerConfig = serde_json::from_str(&config.to_json()).unwrap();

        assert_eq!(parsed, config);
    }
}
