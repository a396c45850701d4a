//! Worker API client
//!
//! Everything goes to the same origin: the login action and the `/api/*`
//! proxy, which attaches the session server-side.

use baiclass_shared::protocol::{ApiRequest, LoginOutcome, LoginRequest};
use baiclass_shared::ApiEnvelope;
use serde::Deserialize;
use thiserror::Error;

use crate::web::{HttpClient, HttpError};

/// Generic message for failures without a usable server message.
const GENERIC_ERROR: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    /// No session or the POS API rejected it.
    #[error("session missing or expired")]
    Unauthorized,
    #[error("request failed with status {status}")]
    Status { status: u16, message: Option<String> },
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text for a toast.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => "Connection problem. Check your network.".to_string(),
            ApiError::Unauthorized => "Your session has expired. Please sign in again.".to_string(),
            ApiError::Status {
                message: Some(m), ..
            } => m.clone(),
            ApiError::Status { message: None, .. } | ApiError::Decode(_) => {
                GENERIC_ERROR.to_string()
            }
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

impl From<HttpError> for ApiError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::ResponseParseFailed(m) => ApiError::Decode(m),
            other => ApiError::Network(other.to_string()),
        }
    }
}

// Worker errors carry `error`, POS API errors carry `data`.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    data: Option<String>,
}

fn error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json_wasm::from_str(body).ok()?;
    parsed
        .error
        .or(parsed.data)
        .filter(|m| !m.trim().is_empty())
}

pub struct PosApi;

impl PosApi {
    async fn send_raw<R: ApiRequest>(req: &R) -> Result<(u16, String), ApiError> {
        let mut builder = HttpClient::request(R::METHOD, &req.path())
            .header("Accept", "application/json");
        if R::METHOD.has_body() {
            builder = builder.json(req)?;
        }
        let resp = builder.send().await?;
        let status = resp.status();
        Ok((status, resp.text().await?))
    }

    /// Sends `req` and decodes a 2xx body.
    pub async fn send<R: ApiRequest>(req: &R) -> Result<R::Response, ApiError> {
        let (status, body) = Self::send_raw(req).await?;
        match status {
            200..=299 => serde_json_wasm::from_str(&body).map_err(|e| ApiError::Decode(e.to_string())),
            401 => Err(ApiError::Unauthorized),
            _ => Err(ApiError::Status {
                status,
                message: error_message(&body),
            }),
        }
    }

    /// Like [`PosApi::send`] for endpoints wrapped in `{ "data": ... }`.
    pub async fn fetch_data<T, R>(req: &R) -> Result<T, ApiError>
    where
        R: ApiRequest<Response = ApiEnvelope<T>>,
    {
        Self::send(req).await.map(ApiEnvelope::into_inner)
    }

    /// Posts credentials. The outcome body is read whatever the status.
    pub async fn login(credentials: &LoginRequest) -> Result<LoginOutcome, ApiError> {
        let (_, body) = Self::send_raw(credentials).await?;
        serde_json_wasm::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_worker_error_then_data() {
        assert_eq!(
            error_message(r#"{"code":"UNAUTHORIZED","error":"No session"}"#).as_deref(),
            Some("No session")
        );
        assert_eq!(
            error_message(r#"{"data":"Branch not found"}"#).as_deref(),
            Some("Branch not found")
        );
        assert_eq!(error_message("<html>"), None);
        assert_eq!(error_message(r#"{"error":"  "}"#), None);
    }

    #[test]
    fn test_user_messages() {
        let err = ApiError::Status {
            status: 404,
            message: Some("Branch not found".into()),
        };
        assert_eq!(err.user_message(), "Branch not found");
        assert_eq!(ApiError::Decode("x".into()).user_message(), GENERIC_ERROR);
        assert!(ApiError::Unauthorized.is_unauthorized());
    }
}
