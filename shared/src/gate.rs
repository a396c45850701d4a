//! Route gate and session guards
//!
//! Three independent checks share the same outcome type:
//! - [`RouteGate::evaluate`]: runs on every request, prefix based
//! - [`RouteGate::login_guard`]: keeps signed-in users off the login page
//! - [`RouteGate::section_guard`]: render-time re-check for the
//!   authenticated section
//!
//! All of them only look at token presence.

use crate::route::{AppRoute, RouteClass};
use crate::session::SessionToken;

/// HTTP "Found".
pub const REDIRECT_STATUS: u16 = 302;

/// Outcome of a guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Let the request through unmodified.
    Continue,
    /// Terminal redirect.
    Redirect { location: String, status: u16 },
}

impl GateDecision {
    pub fn redirect(route: AppRoute) -> Self {
        Self::Redirect {
            location: route.to_path(),
            status: REDIRECT_STATUS,
        }
    }

    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Continue => None,
            Self::Redirect { location, .. } => Some(location),
        }
    }
}

/// Stateless guard set.
pub struct RouteGate;

impl RouteGate {
    /// Main gate. A missing path fails closed.
    pub fn evaluate(path: Option<&str>, token: Option<&SessionToken>) -> GateDecision {
        let protected = match path {
            Some(p) if !p.is_empty() => RouteClass::of(p).is_protected(),
            _ => true,
        };

        if protected && token.is_none() {
            GateDecision::redirect(AppRoute::auth_failure_redirect())
        } else {
            GateDecision::Continue
        }
    }

    /// Login entry guard.
    pub fn login_guard(token: Option<&SessionToken>) -> GateDecision {
        if token.is_some() {
            GateDecision::redirect(AppRoute::auth_success_redirect())
        } else {
            GateDecision::Continue
        }
    }

    /// Authenticated-section guard, applied when a page is about to render.
    pub fn section_guard(route: &AppRoute, token: Option<&SessionToken>) -> GateDecision {
        if route.requires_auth() && token.is_none() {
            GateDecision::redirect(AppRoute::auth_failure_redirect())
        } else {
            GateDecision::Continue
        }
    }
}
