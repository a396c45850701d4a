use baiclass_shared::protocol::HttpMethod;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use worker::{Fetch, Headers, Request, RequestInit, wasm_bindgen};

use crate::error::{PosError, Result};

#[cfg(test)]
use std::cell::RefCell;

// =========================================================
// HTTP interface abstraction
// =========================================================

fn to_worker_method(method: HttpMethod) -> worker::Method {
    match method {
        HttpMethod::Get => worker::Method::Get,
        HttpMethod::Post => worker::Method::Post,
        HttpMethod::Put => worker::Method::Put,
        HttpMethod::Patch => worker::Method::Patch,
        HttpMethod::Delete => worker::Method::Delete,
    }
}

/// Maps an incoming worker method onto the ones the POS API accepts.
pub fn from_worker_method(method: &worker::Method) -> Option<HttpMethod> {
    match method {
        worker::Method::Get => Some(HttpMethod::Get),
        worker::Method::Post => Some(HttpMethod::Post),
        worker::Method::Put => Some(HttpMethod::Put),
        worker::Method::Patch => Some(HttpMethod::Patch),
        worker::Method::Delete => Some(HttpMethod::Delete),
        _ => None,
    }
}

#[derive(Clone, Debug)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_json(mut self, body: &serde_json::Value) -> Self {
        self.body = Some(body.to_string());
        self.with_header("Content-Type", "application/json")
    }

    pub fn with_body(mut self, body: Option<String>) -> Self {
        self.body = body;
        self
    }
}

#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|e| PosError::upstream(e.to_string()))
    }
}

#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse>;
}

// =========================================================
// Worker implementation
// =========================================================

#[derive(Clone)]
pub struct WorkerHttpClient;

#[async_trait::async_trait(?Send)]
impl HttpClient for WorkerHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse> {
        let headers = Headers::new();
        for (k, v) in &req.headers {
            headers.set(k, v)?;
        }

        let mut init = RequestInit {
            method: to_worker_method(req.method),
            headers,
            ..Default::default()
        };

        if let Some(body_str) = &req.body {
            init.body = Some(wasm_bindgen::JsValue::from_str(body_str));
        }

        let worker_req = Request::new_with_init(&req.url, &init)?;
        let mut response = Fetch::Request(worker_req)
            .send()
            .await
            .map_err(|e| PosError::upstream(e.to_string()).in_op("fetch"))?;

        Ok(HttpResponse {
            status: response.status_code(),
            content_type: response.headers().get("Content-Type")?,
            body: response.text().await?,
        })
    }
}

// =========================================================
// Test double: MockHttpClient
// =========================================================

#[cfg(test)]
pub struct MockHttpClient {
    // URL -> (status, body)
    responses: RefCell<HashMap<String, (u16, String)>>,
    // URLs that fail at the transport level
    unreachable: RefCell<Vec<String>>,
    // (URL, method, headers, body) of every request sent
    pub requests: RefCell<Vec<(String, HttpMethod, HashMap<String, String>, Option<String>)>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: RefCell::new(HashMap::new()),
            unreachable: RefCell::new(Vec::new()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn mock_response(&self, url: &str, status: u16, body: serde_json::Value) {
        self.mock_raw(url, status, &body.to_string());
    }

    pub fn mock_raw(&self, url: &str, status: u16, body: &str) {
        self.responses
            .borrow_mut()
            .insert(url.to_string(), (status, body.to_string()));
    }

    pub fn mock_unreachable(&self, url: &str) {
        self.unreachable.borrow_mut().push(url.to_string());
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse> {
        self.requests.borrow_mut().push((
            req.url.clone(),
            req.method,
            req.headers.clone(),
            req.body.clone(),
        ));

        if self.unreachable.borrow().contains(&req.url) {
            return Err(PosError::upstream("connection refused").in_op("fetch"));
        }

        let responses = self.responses.borrow();
        if let Some((status, body)) = responses.get(&req.url) {
            Ok(HttpResponse {
                status: *status,
                content_type: Some("application/json".to_string()),
                body: body.clone(),
            })
        } else {
            Ok(HttpResponse {
                status: 404,
                content_type: None,
                body: "Not Found".to_string(),
            })
        }
    }
}
