use baiclass_shared::protocol::{HttpMethod, LoginOutcome};
use baiclass_shared::{
    API_PREFIX, AppRoute, Clock, GateDecision, LOGIN_ACTION_PATH, RouteGate, SessionCookie,
    SessionToken,
};

use crate::auth::LoginError;

/// What the worker does with one incoming request.
///
/// Pure data: no `worker` types, so the whole routing table is unit tested
/// natively. The fetch handler only executes the plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestPlan {
    /// Terminal redirect issued by the gate or a guard.
    Redirect { location: String, status: u16 },
    /// `POST /api/auth/login`.
    Login,
    /// Authenticated forward to the POS API.
    Proxy {
        method: HttpMethod,
        /// Path and query relative to the API base, always starting with `/`.
        upstream_path: String,
    },
    /// `/api/*` without a session cookie.
    Unauthorized,
    /// Method the worker never forwards.
    MethodNotAllowed,
    /// SPA page that passed its guard.
    Page(AppRoute),
    /// Anything else, served from the asset binding.
    Asset,
}

fn redirect_of(decision: GateDecision) -> Option<RequestPlan> {
    match decision {
        GateDecision::Continue => None,
        GateDecision::Redirect { location, status } => {
            Some(RequestPlan::Redirect { location, status })
        }
    }
}

/// Routes a request in a fixed order: gate, login action, API proxy,
/// login guard, section guard, assets.
pub fn plan(
    method: Option<HttpMethod>,
    path: &str,
    query: Option<&str>,
    token: Option<&SessionToken>,
) -> RequestPlan {
    // 1. Prefix gate runs first for every request.
    if let Some(redirect) = redirect_of(RouteGate::evaluate(Some(path), token)) {
        return redirect;
    }

    // 2. Login action.
    if path == LOGIN_ACTION_PATH {
        return match method {
            Some(HttpMethod::Post) => RequestPlan::Login,
            _ => RequestPlan::MethodNotAllowed,
        };
    }

    // 3. Everything else under /api/ is proxied with the session token.
    if let Some(rest) = path.strip_prefix(API_PREFIX) {
        let Some(method) = method else {
            return RequestPlan::MethodNotAllowed;
        };
        if token.is_none() {
            return RequestPlan::Unauthorized;
        }
        let upstream_path = match query {
            Some(q) if !q.is_empty() => format!("/{}?{}", rest, q),
            _ => format!("/{}", rest),
        };
        return RequestPlan::Proxy {
            method,
            upstream_path,
        };
    }

    // 4/5. Page guards.
    let route = AppRoute::from_path(path);
    let guard = if route.should_redirect_when_authenticated() {
        RouteGate::login_guard(token)
    } else if route.requires_auth() {
        RouteGate::section_guard(&route, token)
    } else {
        return RequestPlan::Asset;
    };

    redirect_of(guard).unwrap_or(RequestPlan::Page(route))
}

// =========================================================
// Replies
// =========================================================

/// Status, body and cookie the login action answers with.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginReply {
    pub status: u16,
    pub outcome: LoginOutcome,
    pub set_cookie: Option<String>,
}

impl LoginReply {
    /// A session cookie is issued only on success.
    pub fn new(result: Result<SessionToken, LoginError>, clock: &impl Clock) -> Self {
        match result {
            Ok(token) => Self {
                status: 200,
                outcome: LoginOutcome::success(),
                set_cookie: Some(SessionCookie::new(token, clock.now()).to_header_value()),
            },
            Err(e) => Self {
                status: e.status_code(),
                outcome: LoginOutcome::failure(e.user_message()),
                set_cookie: None,
            },
        }
    }
}

/// `Set-Cookie` for a proxied response.
///
/// A 401 from the POS API means the token in the cookie is no longer
/// accepted, so the cookie is expired and the next `/login` load passes the
/// login guard.
pub fn proxy_set_cookie(upstream_status: u16) -> Option<String> {
    (upstream_status == 401).then(SessionCookie::expired_header_value)
}

// =========================================================
// Unit tests (native, no Miniflare)
// =========================================================
#[cfg(test)]
mod tests {
    use super::*;
    use baiclass_shared::FixedClock;
    use chrono::{TimeZone, Utc};

    fn token() -> SessionToken {
        SessionToken::parse("tok-abc").unwrap()
    }

    fn redirect(location: &str) -> RequestPlan {
        RequestPlan::Redirect {
            location: location.into(),
            status: 302,
        }
    }

    #[test]
    fn test_protected_page_without_cookie_redirects() {
        for path in ["/dashboard", "/products/42", "/sales", "/select-branch"] {
            assert_eq!(
                plan(Some(HttpMethod::Get), path, None, None),
                redirect("/login"),
                "{path}"
            );
        }
    }

    #[test]
    fn test_protected_page_with_cookie_is_served() {
        let t = token();
        assert_eq!(
            plan(Some(HttpMethod::Get), "/dashboard", None, Some(&t)),
            RequestPlan::Page(AppRoute::Dashboard)
        );
        // Unknown path under a protected prefix still passes the gate.
        assert_eq!(
            plan(Some(HttpMethod::Get), "/products/42", None, Some(&t)),
            RequestPlan::Asset
        );
    }

    #[test]
    fn test_login_page_with_cookie_goes_to_branch_picker() {
        let t = token();
        for path in ["/login", "/"] {
            assert_eq!(
                plan(Some(HttpMethod::Get), path, None, Some(&t)),
                redirect("/select-branch"),
                "{path}"
            );
        }
        assert_eq!(
            plan(Some(HttpMethod::Get), "/login", None, None),
            RequestPlan::Page(AppRoute::Login)
        );
    }

    #[test]
    fn test_branch_menu_is_guarded_at_render_time() {
        // Not a protected prefix, so the gate lets it through...
        assert!(RouteGate::evaluate(Some("/b7/menu"), None).is_continue());
        // ...but the section guard catches it.
        assert_eq!(
            plan(Some(HttpMethod::Get), "/b7/menu", None, None),
            redirect("/login")
        );
        let t = token();
        assert_eq!(
            plan(Some(HttpMethod::Get), "/b7/menu", None, Some(&t)),
            RequestPlan::Page(AppRoute::branch_selected("b7"))
        );
    }

    #[test]
    fn test_login_action_routing() {
        assert_eq!(
            plan(Some(HttpMethod::Post), "/api/auth/login", None, None),
            RequestPlan::Login
        );
        // A stale cookie does not block a new login.
        let t = token();
        assert_eq!(
            plan(Some(HttpMethod::Post), "/api/auth/login", None, Some(&t)),
            RequestPlan::Login
        );
        assert_eq!(
            plan(Some(HttpMethod::Get), "/api/auth/login", None, None),
            RequestPlan::MethodNotAllowed
        );
    }

    #[test]
    fn test_api_proxy_requires_cookie() {
        assert_eq!(
            plan(Some(HttpMethod::Get), "/api/company", None, None),
            RequestPlan::Unauthorized
        );

        let t = token();
        assert_eq!(
            plan(
                Some(HttpMethod::Get),
                "/api/branches/b1/sales",
                Some("from=2024-01-01&to=2024-01-02"),
                Some(&t)
            ),
            RequestPlan::Proxy {
                method: HttpMethod::Get,
                upstream_path: "/branches/b1/sales?from=2024-01-01&to=2024-01-02".into(),
            }
        );
        assert_eq!(
            plan(None, "/api/company", None, Some(&t)),
            RequestPlan::MethodNotAllowed
        );
    }

    #[test]
    fn test_neutral_paths_are_assets() {
        for path in ["/favicon.ico", "/pkg/app.wasm", "/settings"] {
            assert_eq!(
                plan(Some(HttpMethod::Get), path, None, None),
                RequestPlan::Asset,
                "{path}"
            );
        }
    }

    #[test]
    fn test_successful_login_sets_session_cookie() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap());
        let reply = LoginReply::new(Ok(token()), &clock);

        assert_eq!(reply.status, 200);
        assert_eq!(reply.outcome, LoginOutcome::success());
        assert_eq!(
            reply.set_cookie.as_deref(),
            Some(
                "__baiclass=tok-abc; Path=/; Max-Age=604800; Expires=Fri, 08 Mar 2024 08:30:00 GMT; HttpOnly; Secure; SameSite=Lax"
            )
        );
    }

    #[test]
    fn test_failed_login_sets_no_cookie() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap());

        let reply = LoginReply::new(Err(LoginError::Rejected("Wrong password".into())), &clock);
        assert_eq!(reply.status, 401);
        assert_eq!(reply.outcome, LoginOutcome::failure("Wrong password"));
        assert!(reply.set_cookie.is_none());

        let reply = LoginReply::new(Err(LoginError::Unreachable), &clock);
        assert_eq!(reply.status, 502);
        assert!(reply.set_cookie.is_none());
    }

    #[test]
    fn test_proxy_only_expires_cookie_on_upstream_401() {
        assert_eq!(
            proxy_set_cookie(401).as_deref(),
            Some("__baiclass=; Path=/; Max-Age=0; HttpOnly; Secure; SameSite=Lax")
        );
        for status in [200, 204, 400, 403, 404, 500, 502] {
            assert!(proxy_set_cookie(status).is_none(), "{status}");
        }
    }

    #[test]
    fn test_rejected_token_does_not_bounce_between_login_and_branch_picker() {
        let t = token();
        assert_eq!(
            plan(Some(HttpMethod::Get), "/select-branch", None, Some(&t)),
            RequestPlan::Page(AppRoute::SelectBranch)
        );
        assert!(matches!(
            plan(Some(HttpMethod::Get), "/api/company", None, Some(&t)),
            RequestPlan::Proxy { .. }
        ));

        // The POS API rejects the token; the browser applies the expired cookie.
        let set_cookie = proxy_set_cookie(401).unwrap();
        let (pair, _) = set_cookie.split_once(';').unwrap();
        let next = SessionToken::from_cookie_header(Some(pair));
        assert!(next.is_none());

        // The login page now renders instead of redirecting back.
        assert_eq!(
            plan(Some(HttpMethod::Get), "/login", None, next.as_ref()),
            RequestPlan::Page(AppRoute::Login)
        );
    }
}
