//! Host seams: lifecycle controls and detached tasks.

use std::cell::{Cell, RefCell};

use async_trait::async_trait;
use futures::future::{join_all, LocalBoxFuture};

/// Error reported by a host lifecycle control.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct HostError(pub String);

/// Lifecycle controls exposed by the host runtime.
#[async_trait(?Send)]
pub trait WorkerHost {
    /// Activate this version without waiting for old clients to close.
    async fn skip_waiting(&self) -> Result<(), HostError>;

    /// Take control of every open client page.
    async fn claim_clients(&self) -> Result<(), HostError>;
}

/// Runs work the handler does not wait for.
pub trait TaskSpawner {
    /// Start `task` without tying it to the current response.
    fn spawn_detached(&self, task: LocalBoxFuture<'static, ()>);
}

/// Spawner that queues detached tasks until the host drains them.
#[derive(Default)]
pub struct TaskQueue {
    tasks: RefCell<Vec<LocalBoxFuture<'static, ()>>>,
}

impl TaskQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Run every queued task to completion. Returns how many ran.
    pub async fn run_pending(&self) -> usize {
        let tasks = std::mem::take(&mut *self.tasks.borrow_mut());
        let count = tasks.len();
        join_all(tasks).await;
        count
    }
}

impl TaskSpawner for TaskQueue {
    fn spawn_detached(&self, task: LocalBoxFuture<'static, ()>) {
        self.tasks.borrow_mut().push(task);
    }
}

impl std::fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskQueue")
            .field("pending", &self.pending())
            .finish()
    }
}

/// Host that records lifecycle calls (for native embedding and tests).
#[derive(Debug, Default)]
pub struct RecordingHost {
    skip_waiting_calls: Cell<u32>,
    claim_calls: Cell<u32>,
    fail_claim: Cell<bool>,
}

impl RecordingHost {
    /// Create a new host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `claim_clients` fail.
    pub fn failing_claim(self) -> Self {
        self.fail_claim.set(true);
        self
    }

    /// Times `skip_waiting` was called.
    pub fn skip_waiting_calls(&self) -> u32 {
        self.skip_waiting_calls.get()
    }

    /// Times `claim_clients` was called.
    pub fn claim_calls(&self) -> u32 {
        self.claim_calls.get()
    }
}

#[async_trait(?Send)]
impl WorkerHost for RecordingHost {
    async fn skip_waiting(&self) -> Result<(), HostError> {
        self.skip_waiting_calls.set(self.skip_waiting_calls.get() + 1);
        Ok(())
    }

    async fn claim_clients(&self) -> Result<(), HostError> {
        self.claim_calls.set(self.claim_calls.get() + 1);
        if self.fail_claim.get() {
            return Err(HostError("clients.claim() rejected".to_string()));
        }
        Ok(())
    }
}
