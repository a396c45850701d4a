//! HTTP request wrapper
//!
//! Thin layer over `web_sys::fetch`. Requests are same-origin: the session
//! cookie travels automatically and is never visible to this code.

use baiclass_shared::protocol::HttpMethod;
use serde::Serialize;
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestCredentials, RequestInit, Response};

/// Transport-level failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    #[error("failed to build request: {0}")]
    RequestBuildFailed(String),
    #[error("network error: {0}")]
    NetworkError(String),
    #[error("failed to read response: {0}")]
    ResponseParseFailed(String),
}

/// HTTP response wrapper
pub struct HttpResponse {
    inner: Response,
}

impl HttpResponse {
    pub fn status(&self) -> u16 {
        self.inner.status()
    }

    pub async fn text(self) -> Result<String, HttpError> {
        let promise = self
            .inner
            .text()
            .map_err(|e| HttpError::ResponseParseFailed(format!("{:?}", e)))?;

        let text = JsFuture::from(promise)
            .await
            .map_err(|e| HttpError::ResponseParseFailed(format!("{:?}", e)))?;

        text.as_string()
            .ok_or_else(|| HttpError::ResponseParseFailed("body is not a string".to_string()))
    }
}

/// HTTP request builder
pub struct HttpRequestBuilder {
    url: String,
    method: HttpMethod,
    headers: Vec<(String, String)>,
    body: Option<String>,
}

impl HttpRequestBuilder {
    fn new(url: String, method: HttpMethod) -> Self {
        Self {
            url,
            method,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    /// Serializes `body` as JSON and sets the content type.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, HttpError> {
        let encoded = serde_json_wasm::to_string(body)
            .map_err(|e| HttpError::RequestBuildFailed(e.to_string()))?;
        self.body = Some(encoded);
        Ok(self.header("Content-Type", "application/json"))
    }

    pub async fn send(self) -> Result<HttpResponse, HttpError> {
        let headers = Headers::new()
            .map_err(|e| HttpError::RequestBuildFailed(format!("Headers: {:?}", e)))?;

        for (key, value) in &self.headers {
            headers
                .set(key, value)
                .map_err(|e| HttpError::RequestBuildFailed(format!("header {}: {:?}", key, e)))?;
        }

        let opts = RequestInit::new();
        opts.set_method(self.method.as_str());
        opts.set_headers(&headers.into());
        opts.set_credentials(RequestCredentials::SameOrigin);

        if let Some(body) = &self.body {
            opts.set_body(&JsValue::from_str(body));
        }

        let request = Request::new_with_str_and_init(&self.url, &opts)
            .map_err(|e| HttpError::RequestBuildFailed(format!("{:?}", e)))?;

        let window = web_sys::window()
            .ok_or_else(|| HttpError::NetworkError("no window".to_string()))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| HttpError::NetworkError(format!("{:?}", e)))?;

        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| HttpError::ResponseParseFailed(format!("not a Response: {:?}", e)))?;

        Ok(HttpResponse { inner: response })
    }
}

/// Lightweight HTTP client
pub struct HttpClient;

impl HttpClient {
    pub fn request(method: HttpMethod, url: &str) -> HttpRequestBuilder {
        HttpRequestBuilder::new(url.to_string(), method)
    }
}
