use std::fmt;

use serde::{Deserialize, Serialize};

// =========================================================
// Error status
// =========================================================

/// Error status, carrying the HTTP semantics of each failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PosErrorStatus {
    /// 401: no session cookie
    Unauthorized,
    /// 405: method the proxy does not forward
    MethodNotAllowed,
    /// 500: missing or broken worker configuration
    Config,
    /// 500: worker runtime failure
    Internal,
    /// 502: POS API unreachable or answered garbage
    Upstream,
}

impl PosErrorStatus {
    pub fn status_code(&self) -> u16 {
        match self {
            PosErrorStatus::Unauthorized => 401,
            PosErrorStatus::MethodNotAllowed => 405,
            PosErrorStatus::Config | PosErrorStatus::Internal => 500,
            PosErrorStatus::Upstream => 502,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            PosErrorStatus::Unauthorized => "UNAUTHORIZED",
            PosErrorStatus::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            PosErrorStatus::Config => "CONFIG_ERROR",
            PosErrorStatus::Internal => "INTERNAL_ERROR",
            PosErrorStatus::Upstream => "UPSTREAM_ERROR",
        }
    }
}

// =========================================================
// Core error
// =========================================================

/// Worker error with status, message and the operations it passed through.
#[derive(Debug)]
pub struct PosError {
    pub status: PosErrorStatus,
    pub message: String,
    spans: Vec<String>,
}

impl PosError {
    pub fn new(status: PosErrorStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            spans: Vec::new(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(PosErrorStatus::Unauthorized, message)
    }

    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self::new(PosErrorStatus::MethodNotAllowed, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(PosErrorStatus::Config, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(PosErrorStatus::Internal, message)
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(PosErrorStatus::Upstream, message)
    }

    /// Records the operation the error passed through.
    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(operation.into());
        self
    }

    pub fn status_code(&self) -> u16 {
        self.status.status_code()
    }

    pub fn error_code(&self) -> &'static str {
        self.status.error_code()
    }

    pub fn spans(&self) -> &[String] {
        &self.spans
    }

    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

impl fmt::Display for PosError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;
        if !self.spans.is_empty() {
            write!(f, " | trace: {}", self.spans.join(" -> "))?;
        }
        Ok(())
    }
}

impl std::error::Error for PosError {}

impl From<worker::Error> for PosError {
    fn from(e: worker::Error) -> Self {
        PosError::internal(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PosError>;

// =========================================================
// Wire format
// =========================================================

/// JSON body returned for every worker-generated error.
///
/// Server errors are masked: the message is replaced with a generic one
/// and the detail only goes to the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub error: String,
}

impl From<&PosError> for ErrorResponse {
    fn from(e: &PosError) -> Self {
        let error = if e.is_server_error() {
            "Internal Server Error".to_string()
        } else {
            e.message.clone()
        };
        Self {
            code: e.error_code().to_string(),
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(PosError::unauthorized("x").status_code(), 401);
        assert_eq!(PosError::upstream("x").status_code(), 502);
        assert_eq!(PosError::config("x").status_code(), 500);
        assert_eq!(PosError::method_not_allowed("x").status_code(), 405);
    }

    #[test]
    fn test_display_includes_trace() {
        let err = PosError::upstream("timeout")
            .in_op("proxy.forward")
            .in_op("fetch");
        assert_eq!(
            err.to_string(),
            "[UPSTREAM_ERROR] timeout | trace: proxy.forward -> fetch"
        );
    }

    #[test]
    fn test_server_errors_are_masked_on_the_wire() {
        let body = ErrorResponse::from(&PosError::config("API_BASE_URL missing"));
        assert_eq!(body.error, "Internal Server Error");
        assert_eq!(body.code, "CONFIG_ERROR");

        let body = ErrorResponse::from(&PosError::unauthorized("No session"));
        assert_eq!(body.error, "No session");
    }
}
