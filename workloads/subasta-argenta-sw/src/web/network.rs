//! `fetch()` from the worker scope, for requests the worker issues itself.
//!
//! Page requests are not rebuilt here: the fetch handler forwards the
//! page's own `Request` so its mode, credentials and redirect policy hold.

use async_trait::async_trait;
use offline_core::{FetchRequest, FetchResponse};
use offline_network::{FetchError, Network};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response, ServiceWorkerGlobalScope};

use super::convert::{headers_to_js, js_message, response_from_js};

pub(crate) struct WebNetwork {
    scope: ServiceWorkerGlobalScope,
}

impl WebNetwork {
    pub(crate) fn new(scope: ServiceWorkerGlobalScope) -> Self {
        Self { scope }
    }

    pub(crate) fn scope(&self) -> &ServiceWorkerGlobalScope {
        &self.scope
    }
}

fn request_error(value: JsValue) -> FetchError {
    FetchError::Request(js_message(&value))
}

/// `fetch()` a page request as issued, resolving to the raw response.
///
/// A rejection means the network was unreachable.
pub(crate) async fn fetch_as_issued(
    scope: &ServiceWorkerGlobalScope,
    request: &Request,
) -> Result<Response, JsValue> {
    JsFuture::from(scope.fetch_with_request(request))
        .await?
        .dyn_into::<Response>()
        .map_err(|_| JsValue::from_str("fetch() did not resolve to a Response"))
}

#[async_trait(?Send)]
impl Network for WebNetwork {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
        let init = RequestInit::new();
        init.set_method(request.method.as_str());
        init.set_headers(&headers_to_js(&request.headers).map_err(request_error)?);
        let js_request =
            Request::new_with_str_and_init(&request.url, &init).map_err(request_error)?;

        let response = fetch_as_issued(&self.scope, &js_request)
            .await
            .map_err(|e| FetchError::Connection(js_message(&e)))?;
        response_from_js(&response).await.map_err(FetchError::Request)
    }
}
