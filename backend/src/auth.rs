//! Login action
//!
//! Forwards credentials to the POS API and turns its answer into either a
//! session token or a display string. Nothing past this boundary sees an
//! upstream error shape.

use std::fmt;

use baiclass_shared::protocol::{HttpMethod, LoginRequest};
use baiclass_shared::{ApiEnvelope, SessionToken};
use serde_json::json;

use crate::utils::request::{HttpClient, HttpRequest};

/// Shown when the POS API gives no usable message.
pub const LOGIN_FALLBACK_MESSAGE: &str = "Unable to sign in right now. Please try again.";

/// Why a login attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginError {
    /// Credentials missing before any upstream call.
    InvalidInput,
    /// The POS API refused; carries its `data` message verbatim.
    Rejected(String),
    /// The POS API answered without a usable message or token.
    MalformedResponse,
    /// The POS API could not be reached.
    Unreachable,
}

impl LoginError {
    /// Display string for the login form.
    pub fn user_message(&self) -> String {
        match self {
            LoginError::InvalidInput => "Enter your email or phone and password.".to_string(),
            LoginError::Rejected(message) => message.clone(),
            LoginError::MalformedResponse | LoginError::Unreachable => {
                LOGIN_FALLBACK_MESSAGE.to_string()
            }
        }
    }

    /// HTTP status the worker answers with.
    pub fn status_code(&self) -> u16 {
        match self {
            LoginError::InvalidInput => 400,
            LoginError::Rejected(_) => 401,
            LoginError::MalformedResponse | LoginError::Unreachable => 502,
        }
    }
}

impl fmt::Display for LoginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginError::InvalidInput => write!(f, "incomplete credentials"),
            LoginError::Rejected(message) => write!(f, "rejected by POS API: {}", message),
            LoginError::MalformedResponse => write!(f, "malformed POS API response"),
            LoginError::Unreachable => write!(f, "POS API unreachable"),
        }
    }
}

/// Calls `POST {api_base}{login_path}` through an [`HttpClient`].
pub struct LoginAction<'a, C: HttpClient> {
    client: &'a C,
    login_url: String,
}

impl<'a, C: HttpClient> LoginAction<'a, C> {
    pub fn new(client: &'a C, api_base_url: &str, login_path: &str) -> Self {
        let base = api_base_url.trim_end_matches('/');
        let login_url = if login_path.starts_with('/') {
            format!("{}{}", base, login_path)
        } else {
            format!("{}/{}", base, login_path)
        };
        Self { client, login_url }
    }

    pub async fn login(&self, credentials: &LoginRequest) -> Result<SessionToken, LoginError> {
        if !credentials.is_complete() {
            return Err(LoginError::InvalidInput);
        }

        let body = json!({
            "medium": credentials.medium.trim(),
            "password": credentials.password,
        });
        let req = HttpRequest::new(&self.login_url, HttpMethod::Post)
            .with_header("Accept", "application/json")
            .with_json(&body);

        let resp = self
            .client
            .send(req)
            .await
            .map_err(|_| LoginError::Unreachable)?;

        // Both outcomes carry their payload in `data`.
        let data = resp
            .json::<ApiEnvelope<String>>()
            .ok()
            .map(ApiEnvelope::into_inner);

        match (resp.ok(), data) {
            (true, Some(token)) => SessionToken::parse(&token).ok_or(LoginError::MalformedResponse),
            (true, None) => Err(LoginError::MalformedResponse),
            (false, Some(message)) if !message.trim().is_empty() => {
                Err(LoginError::Rejected(message))
            }
            (false, _) => Err(LoginError::MalformedResponse),
        }
    }
}
