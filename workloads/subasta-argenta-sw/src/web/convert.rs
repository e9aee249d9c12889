//! Conversions between browser objects and worker types.

use http::header::{HeaderName, HeaderValue, CONTENT_ENCODING, CONTENT_LENGTH};
use js_sys::{Array, Reflect, Uint8Array};
use offline_core::{Destination, FetchRequest, FetchResponse, HeaderMap, Method, StatusCode};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, Response, ResponseInit};

/// Best human-readable text for a thrown JS value.
pub(crate) fn js_message(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    format!("{:?}", value)
}

/// Copy a browser `Request` into a `FetchRequest`.
pub(crate) fn request_from_js(request: &Request) -> Result<FetchRequest, String> {
    let method = Method::from_bytes(request.method().as_bytes())
        .map_err(|e| e.to_string())?;
    let destination = Reflect::get(request, &JsValue::from_str("destination"))
        .ok()
        .and_then(|value| value.as_string())
        .map(|value| Destination::parse(&value))
        .unwrap_or_default();

    let mut fetch = FetchRequest::new(method, request.url()).with_destination(destination);
    fetch.headers = headers_from_js(&request.headers());
    Ok(fetch)
}

/// Read a browser `Response`, consuming its body.
///
/// The body arrives already decoded, so the encoding and length headers of
/// the wire response are dropped.
pub(crate) async fn response_from_js(response: &Response) -> Result<FetchResponse, String> {
    // Opaque responses report status 0.
    let status = StatusCode::from_u16(response.status())
        .map_err(|_| format!("unusable response status {}", response.status()))?;
    let promise = response.array_buffer().map_err(|e| js_message(&e))?;
    let buffer = JsFuture::from(promise).await.map_err(|e| js_message(&e))?;

    let mut fetched = FetchResponse::new(status, Uint8Array::new(&buffer).to_vec());
    fetched.headers = headers_from_js(&response.headers());
    fetched.headers.remove(CONTENT_ENCODING);
    fetched.headers.remove(CONTENT_LENGTH);
    if !response.url().is_empty() {
        fetched = fetched.with_url(response.url());
    }
    Ok(fetched)
}

/// Build a browser `Response` from a stored or fetched one.
pub(crate) fn response_to_js(response: &FetchResponse) -> Result<Response, JsValue> {
    let init = ResponseInit::new();
    init.set_status(response.status.as_u16());
    init.set_headers(&headers_to_js(&response.headers)?);

    if response.is_empty() {
        Response::new_with_opt_buffer_source_and_init(None, &init)
    } else {
        let body = Uint8Array::from(response.body.as_slice());
        Response::new_with_opt_buffer_source_and_init(Some(&*body), &init)
    }
}

pub(crate) fn headers_to_js(headers: &HeaderMap) -> Result<Headers, JsValue> {
    let js = Headers::new()?;
    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            js.append(name.as_str(), value)?;
        }
    }
    Ok(js)
}

fn headers_from_js(headers: &Headers) -> HeaderMap {
    let mut map = HeaderMap::new();
    let Ok(Some(entries)) = js_sys::try_iter(headers) else {
        return map;
    };

    for entry in entries.flatten() {
        let pair = Array::from(&entry);
        let (Some(name), Some(value)) = (pair.get(0).as_string(), pair.get(1).as_string())
        else {
            continue;
        };
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            map.append(name, value);
        }
    }
    map
}
