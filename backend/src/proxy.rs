//! Authenticated pass-through to the POS API.

use baiclass_shared::SessionToken;
use baiclass_shared::protocol::HttpMethod;

use crate::error::Result;
use crate::utils::request::{HttpClient, HttpRequest, HttpResponse};

/// Forwards `/api/<rest>` to `{api_base}/<rest>` with the session as a
/// bearer token. Status and body come back untouched.
pub struct ApiProxy<'a, C: HttpClient> {
    client: &'a C,
    api_base_url: &'a str,
}

impl<'a, C: HttpClient> ApiProxy<'a, C> {
    pub fn new(client: &'a C, api_base_url: &'a str) -> Self {
        Self {
            client,
            api_base_url,
        }
    }

    pub fn build_request(
        &self,
        method: HttpMethod,
        upstream_path: &str,
        token: &SessionToken,
        content_type: Option<&str>,
        body: Option<String>,
    ) -> HttpRequest {
        let url = format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            upstream_path.trim_start_matches('/')
        );

        let mut req = HttpRequest::new(&url, method)
            .with_header("Authorization", &token.bearer())
            .with_header("Accept", "application/json");

        if method.has_body() {
            if let Some(ct) = content_type {
                req = req.with_header("Content-Type", ct);
            }
            req = req.with_body(body);
        }
        req
    }

    pub async fn forward(
        &self,
        method: HttpMethod,
        upstream_path: &str,
        token: &SessionToken,
        content_type: Option<&str>,
        body: Option<String>,
    ) -> Result<HttpResponse> {
        let req = self.build_request(method, upstream_path, token, content_type, body);
        self.client
            .send(req)
            .await
            .map_err(|e| e.in_op("proxy.forward"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PosErrorStatus;
    use crate::utils::request::MockHttpClient;
    use serde_json::json;

    fn token() -> SessionToken {
        SessionToken::parse("tok-9").unwrap()
    }

    #[test]
    fn test_build_request_get_drops_body() {
        let client = MockHttpClient::new();
        let proxy = ApiProxy::new(&client, "https://pos.example.com/v1/");

        let req = proxy.build_request(
            HttpMethod::Get,
            "/branches/b1/stock",
            &token(),
            Some("application/json"),
            Some("{}".into()),
        );
        assert_eq!(req.url, "https://pos.example.com/v1/branches/b1/stock");
        assert_eq!(req.headers.get("Authorization").unwrap(), "Bearer tok-9");
        assert!(req.body.is_none());
        assert!(!req.headers.contains_key("Content-Type"));
    }

    #[test]
    fn test_build_request_post_keeps_body() {
        let client = MockHttpClient::new();
        let proxy = ApiProxy::new(&client, "https://pos.example.com/v1");

        let req = proxy.build_request(
            HttpMethod::Post,
            "/sales",
            &token(),
            Some("application/json"),
            Some(r#"{"total":3}"#.into()),
        );
        assert_eq!(req.url, "https://pos.example.com/v1/sales");
        assert_eq!(req.body.as_deref(), Some(r#"{"total":3}"#));
        assert_eq!(req.headers.get("Content-Type").unwrap(), "application/json");
    }

    #[tokio::test]
    async fn test_forward_passes_status_and_body_through() {
        let client = MockHttpClient::new();
        client.mock_response(
            "https://pos.example.com/v1/company",
            403,
            json!({ "data": "Forbidden branch" }),
        );
        let proxy = ApiProxy::new(&client, "https://pos.example.com/v1");

        let resp = proxy
            .forward(HttpMethod::Get, "/company", &token(), None, None)
            .await
            .unwrap();
        assert_eq!(resp.status, 403);
        assert_eq!(resp.body, json!({ "data": "Forbidden branch" }).to_string());
        assert_eq!(client.requests.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_forward_keeps_query_string() {
        let client = MockHttpClient::new();
        let url = "https://pos.example.com/v1/branches/b1/sales?from=2024-01-01&to=2024-01-02";
        client.mock_response(url, 200, json!({ "data": [] }));
        let proxy = ApiProxy::new(&client, "https://pos.example.com/v1");

        let resp = proxy
            .forward(
                HttpMethod::Get,
                "/branches/b1/sales?from=2024-01-01&to=2024-01-02",
                &token(),
                None,
                None,
            )
            .await
            .unwrap();
        assert!(resp.ok());
        assert_eq!(client.requests.borrow()[0].0, url);
    }

    #[tokio::test]
    async fn test_forward_unreachable_is_upstream_error() {
        let client = MockHttpClient::new();
        client.mock_unreachable("https://pos.example.com/v1/company");
        let proxy = ApiProxy::new(&client, "https://pos.example.com/v1");

        let err = proxy
            .forward(HttpMethod::Get, "/company", &token(), None, None)
            .await
            .unwrap_err();
        assert_eq!(err.status, PosErrorStatus::Upstream);
        assert_eq!(err.spans(), ["fetch", "proxy.forward"]);
    }
}
