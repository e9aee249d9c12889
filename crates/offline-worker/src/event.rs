//! Events delivered by the host and what handling them produced.

use std::fmt;

use offline_cache::CacheStatus;
use offline_core::{FetchRequest, FetchResponse, WorkerConfig};
use serde::{Deserialize, Serialize};

/// Kind of lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Install,
    Activate,
    Fetch,
    Message,
    Sync,
}

impl EventKind {
    /// Event type name as the host spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Activate => "activate",
            Self::Fetch => "fetch",
            Self::Message => "message",
            Self::Sync => "sync",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event dispatched to the worker.
#[derive(Debug, Clone)]
pub enum WorkerEvent {
    /// A new version was registered.
    Install,
    /// This version is taking control.
    Activate,
    /// A controlled page issued a request.
    Fetch(FetchRequest),
    /// Application code posted a message.
    Message(serde_json::Value),
    /// A background sync opportunity arrived for a tag.
    Sync { tag: String },
}

impl WorkerEvent {
    /// The event kind.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Install => EventKind::Install,
            Self::Activate => EventKind::Activate,
            Self::Fetch(_) => EventKind::Fetch,
            Self::Message(_) => EventKind::Message,
            Self::Sync { .. } => EventKind::Sync,
        }
    }
}

/// Commands accepted over the message channel, selected by `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerCommand {
    /// Activate immediately.
    SkipWaiting,
    /// Delete every cache namespace.
    ClearCache,
}

impl WorkerCommand {
    /// Parse a message payload. Anything without a known `type` is `None`.
    pub fn parse(payload: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(payload.clone()).ok()
    }
}

/// Result of a successful install.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    /// Namespace the assets went into.
    pub namespace: String,
    /// URLs stored.
    pub cached: Vec<String>,
    /// URLs skipped (best-effort installs only).
    pub failed: Vec<String>,
}

/// Result of activation cleanup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivationReport {
    /// Stale namespaces removed.
    pub deleted: Vec<String>,
    /// Current namespaces kept.
    pub retained: Vec<String>,
    /// Stale namespaces whose deletion failed.
    pub failed: Vec<String>,
}

/// Why a request was left to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PassthroughReason {
    /// Not a GET.
    Method,
    /// Backend traffic.
    Excluded,
}

impl PassthroughReason {
    /// Why `request` would be left to the host under `config`, if it would.
    pub fn for_request(config: &WorkerConfig, request: &FetchRequest) -> Option<Self> {
        if !request.is_get() {
            Some(Self::Method)
        } else if config.is_excluded(&request.url) {
            Some(Self::Excluded)
        } else {
            None
        }
    }
}

/// What the fetch handler decided.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Do not intercept; the request proceeds as if uncontrolled.
    Passthrough(PassthroughReason),
    /// Respond with this response.
    Respond {
        response: FetchResponse,
        status: CacheStatus,
    },
    /// Intercepted but nothing to respond with; the page sees a network error.
    Unavailable,
}

impl FetchOutcome {
    /// How the request was answered.
    pub fn status(&self) -> CacheStatus {
        match self {
            Self::Passthrough(_) => CacheStatus::Bypass,
            Self::Respond { status, .. } => *status,
            Self::Unavailable => CacheStatus::Miss,
        }
    }

    /// The response, if the worker responded with one.
    pub fn response(&self) -> Option<&FetchResponse> {
        match self {
            Self::Respond { response, .. } => Some(response),
            _ => None,
        }
    }

    /// Take the response, if any.
    pub fn into_response(self) -> Option<FetchResponse> {
        match self {
            Self::Respond { response, .. } => Some(response),
            _ => None,
        }
    }
}

/// Result of a message command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutcome {
    /// `SKIP_WAITING` forwarded to the host.
    SkippedWaiting,
    /// `CLEAR_CACHE` removed these namespaces.
    ClearedCache { deleted: Vec<String> },
    /// Unknown or malformed payload.
    Ignored,
}

/// Result of a background sync event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The routine for the tag completed.
    Completed,
    /// The tag is not handled by this worker.
    Ignored,
}

/// Outcome of a dispatched event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    Installed(InstallReport),
    Activated(ActivationReport),
    Fetch(FetchOutcome),
    Message(MessageOutcome),
    Sync(SyncOutcome),
}
