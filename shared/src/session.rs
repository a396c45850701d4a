//! Session cookie
//!
//! The token is opaque: it is extracted from the `Cookie` header and written
//! back in `Set-Cookie`, never inspected. Validity is the POS API's call.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::SESSION_COOKIE_NAME;

/// Cookie lifetime: 7 days from issuance.
pub const SESSION_MAX_AGE: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Opaque bearer token carried by the `__baiclass` cookie.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Accepts a raw cookie value.
    ///
    /// Returns `None` for values that cannot have come from the login action
    /// (empty, or containing characters outside RFC 6265 cookie-octets), so
    /// a malformed cookie is indistinguishable from a missing one.
    pub fn parse(raw: &str) -> Option<Self> {
        let value = raw.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value);

        if value.is_empty() || !value.bytes().all(is_cookie_octet) {
            return None;
        }
        Some(Self(value.to_string()))
    }

    /// Extracts the session token from a `Cookie` request header.
    pub fn from_cookie_header(header: Option<&str>) -> Option<Self> {
        header?
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| name.trim() == SESSION_COOKIE_NAME)
            .and_then(|(_, value)| Self::parse(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for an `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

// Tokens stay out of logs.
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

fn is_cookie_octet(b: u8) -> bool {
    matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E)
}

/// `Set-Cookie` builder for a freshly issued session.
#[derive(Debug, Clone)]
pub struct SessionCookie {
    token: SessionToken,
    issued_at: DateTime<Utc>,
}

impl SessionCookie {
    pub fn new(token: SessionToken, issued_at: DateTime<Utc>) -> Self {
        Self { token, issued_at }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.issued_at + chrono::Duration::seconds(SESSION_MAX_AGE.as_secs() as i64)
    }

    /// Serialises the cookie as a `Set-Cookie` header value.
    pub fn to_header_value(&self) -> String {
        format!(
            "{}={}; Path=/; Max-Age={}; Expires={}; HttpOnly; Secure; SameSite=Lax",
            SESSION_COOKIE_NAME,
            self.token.as_str(),
            SESSION_MAX_AGE.as_secs(),
            self.expires_at().format("%a, %d %b %Y %H:%M:%S GMT"),
        )
    }

    /// `Set-Cookie` value that makes the browser drop the session cookie.
    pub fn expired_header_value() -> String {
        format!(
            "{}=; Path=/; Max-Age=0; HttpOnly; Secure; SameSite=Lax",
            SESSION_COOKIE_NAME
        )
    }
}
