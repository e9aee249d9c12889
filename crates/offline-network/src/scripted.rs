//! Scripted network for native hosts and tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use async_trait::async_trait;
use offline_core::{FetchRequest, FetchResponse};

use crate::client::{FetchError, Network};

/// Network that answers from a fixed route table.
///
/// Unknown URLs resolve with 404. While offline, every fetch rejects with a
/// connection error.
#[derive(Debug, Default)]
pub struct ScriptedNetwork {
    routes: RefCell<HashMap<String, Result<FetchResponse, FetchError>>>,
    offline: Cell<bool>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedNetwork {
    /// Create an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with `response`.
    pub fn route(self, url: &str, response: FetchResponse) -> Self {
        self.routes.borrow_mut().insert(url.to_string(), Ok(response));
        self
    }

    /// Reject fetches of `url`.
    pub fn reject(self, url: &str) -> Self {
        self.routes.borrow_mut().insert(
            url.to_string(),
            Err(FetchError::Connection(format!("failed to fetch {}", url))),
        );
        self
    }

    /// Toggle offline mode.
    pub fn set_offline(&self, offline: bool) {
        self.offline.set(offline);
    }

    /// URLs fetched so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Network for ScriptedNetwork {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
        self.calls.borrow_mut().push(request.url.clone());

        if self.offline.get() {
            return Err(FetchError::Connection("offline".to_string()));
        }

        match self.routes.borrow().get(&request.url) {
            Some(result) => result.clone(),
            None => Ok(FetchResponse::new(offline_core::StatusCode::NOT_FOUND, "")),
        }
    }
}
