use crate::date::SalesWindow;
use crate::route::AppRoute;
use crate::sales::Sale;
use crate::stock::ProductSnapshot;
use crate::{ApiEnvelope, CompanyProfile, LOGIN_ACTION_PATH};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    pub fn has_body(&self) -> bool {
        !matches!(self, HttpMethod::Get | HttpMethod::Delete)
    }
}

/// A trait that defines the request-response relationship and metadata for an endpoint
/// served (or proxied) by the worker.
pub trait ApiRequest: Serialize {
    /// The response body type.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Path on the worker, including any query string.
    fn path(&self) -> String;
}

// =========================================================
// Login action
// =========================================================

/// Credentials posted to the login action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email or phone number.
    pub medium: String,
    pub password: String,
}

impl LoginRequest {
    pub fn is_complete(&self) -> bool {
        !self.medium.trim().is_empty() && !self.password.is_empty()
    }
}

/// Result of the login action, always returned as a JSON body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoginOutcome {
    Success { redirect: String },
    Failure { error: String },
}

impl LoginOutcome {
    pub fn success() -> Self {
        Self::Success {
            redirect: AppRoute::auth_success_redirect().to_path(),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
        }
    }
}

impl ApiRequest for LoginRequest {
    type Response = LoginOutcome;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        LOGIN_ACTION_PATH.to_string()
    }
}

// =========================================================
// Proxied POS API
// =========================================================

/// Company, account and catalog of the signed-in user.
#[derive(Debug, Serialize, Deserialize)]
pub struct CompanyProfileRequest;

impl ApiRequest for CompanyProfileRequest {
    type Response = ApiEnvelope<CompanyProfile>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/api/company".to_string()
    }
}

/// Current stock of one branch.
#[derive(Debug, Serialize, Deserialize)]
pub struct BranchStockRequest {
    pub branch_id: String,
}

impl ApiRequest for BranchStockRequest {
    type Response = ApiEnvelope<Vec<ProductSnapshot>>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/api/branches/{}/stock", self.branch_id)
    }
}

/// Sales of one branch within a date window.
#[derive(Debug, Serialize, Deserialize)]
pub struct BranchSalesRequest {
    pub branch_id: String,
    pub window: SalesWindow,
}

impl ApiRequest for BranchSalesRequest {
    type Response = ApiEnvelope<Vec<Sale>>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!(
            "/api/branches/{}/sales?{}",
            self.branch_id,
            self.window.to_query()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_outcome_wire_format() {
        let ok = serde_json::to_value(LoginOutcome::success()).unwrap();
        assert_eq!(
            ok,
            serde_json::json!({"status": "success", "redirect": "/select-branch"})
        );

        let err: LoginOutcome =
            serde_json::from_str(r#"{"status":"failure","error":"Wrong password"}"#).unwrap();
        assert_eq!(err, LoginOutcome::failure("Wrong password"));
    }

    #[test]
    fn test_request_paths() {
        let window = SalesWindow::parse("2024-01-01", "2024-01-31").unwrap();
        let req = BranchSalesRequest {
            branch_id: "b7".into(),
            window,
        };
        assert_eq!(req.path(), "/api/branches/b7/sales?from=2024-01-01&to=2024-01-31");
        assert_eq!(
            BranchStockRequest {
                branch_id: "b7".into()
            }
            .path(),
            "/api/branches/b7/stock"
        );
        assert_eq!(BranchSalesRequest::METHOD, HttpMethod::Get);
    }

    #[test]
    fn test_login_request_completeness() {
        let mut req = LoginRequest {
            medium: " ".into(),
            password: "x".into(),
        };
        assert!(!req.is_complete());
        req.medium = "ana@example.com".into();
        assert!(req.is_complete());
    }
}
