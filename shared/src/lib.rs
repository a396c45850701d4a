//! Baiclass POS shared domain layer
//!
//! Everything here is plain Rust so the worker, the browser app and the
//! tests share one definition of the session-gating rules and the client
//! state stores:
//! - `route` / `gate`: route classification and the redirect guards
//! - `session`: the `__baiclass` cookie
//! - `state`: the backing-cell abstraction behind every client context
//! - `company` / `sales` / `stock` / `toast`: the four client stores

use serde::{Deserialize, Serialize};

pub mod company;
pub mod date;
pub mod fetch;
pub mod gate;
pub mod protocol;
pub mod route;
pub mod sales;
pub mod session;
pub mod state;
pub mod stock;
pub mod toast;

// =========================================================
// Constants
// =========================================================

/// Name of the session cookie issued by the login action.
pub const SESSION_COOKIE_NAME: &str = "__baiclass";

/// Worker endpoint that performs the login action.
pub const LOGIN_ACTION_PATH: &str = "/api/auth/login";

/// Prefix of every request the worker proxies to the POS API.
pub const API_PREFIX: &str = "/api/";

// =========================================================
// Domain Models
// =========================================================

/// A store location under a company. Sales and stock are scoped to one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub branches: Vec<Branch>,
}

/// The signed-in account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    /// Login identifier (email or phone).
    pub medium: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Everything the company context needs, as returned by `GET /api/company`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub company: Company,
    pub account: Account,
    #[serde(default)]
    pub catalog: Vec<Product>,
}

/// Response envelope used by the POS API: both payloads and error messages
/// travel in `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: T,
}

impl<T> ApiEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }

    pub fn into_inner(self) -> T {
        self.data
    }
}

pub use company::{CompanyState, CompanyStore};
pub use date::{Clock, FixedClock, SalesWindow, SystemClock};
pub use gate::{GateDecision, RouteGate};
pub use route::{AppRoute, RouteClass};
pub use sales::{Sale, SaleLine, SalesState, SalesStore, SalesSummary};
pub use session::{SessionCookie, SessionToken};
pub use state::{ContextError, StateCell};
pub use stock::{ProductSnapshot, StockMap, StockState, StockStore};
pub use toast::{Scheduler, Toast, ToastId, ToastQueue, ToastVariant, Toaster};
