//! Route definitions
//!
//! Pure path logic shared by the worker gate and the browser router.
//! Nothing here touches the DOM or the worker runtime.

use std::fmt::Display;

/// Paths that require a session cookie. Matching is a plain prefix test.
pub const PROTECTED_PREFIXES: [&str; 4] = ["/select-branch", "/dashboard", "/products", "/sales"];

/// Static classification of a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Starts with one of [`PROTECTED_PREFIXES`].
    Protected,
    /// The login entry point.
    Public,
    /// Everything else (assets, API calls, branch pages).
    Neutral,
}

impl RouteClass {
    pub fn of(path: &str) -> Self {
        if PROTECTED_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
            Self::Protected
        } else if matches!(AppRoute::from_path(path), AppRoute::Login) {
            Self::Public
        } else {
            Self::Neutral
        }
    }

    pub fn is_protected(&self) -> bool {
        matches!(self, Self::Protected)
    }
}

/// Application page routes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// Login form (default route)
    #[default]
    Login,
    /// Branch picker shown right after login
    SelectBranch,
    Dashboard,
    Products,
    Sales,
    /// Landing page of a selected branch
    BranchMenu { branch_id: String },
    NotFound,
}

impl AppRoute {
    /// Parse a URL path (query string allowed) into a route.
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');

        match trimmed {
            "" | "/login" => Self::Login,
            "/select-branch" => Self::SelectBranch,
            "/dashboard" => Self::Dashboard,
            "/products" => Self::Products,
            "/sales" => Self::Sales,
            _ => {
                let segments: Vec<&str> = trimmed.trim_start_matches('/').split('/').collect();
                match segments.as_slice() {
                    [segment, "menu"] => match decode_branch_segment(segment) {
                        Some(branch_id) => Self::BranchMenu { branch_id },
                        None => Self::NotFound,
                    },
                    _ => Self::NotFound,
                }
            }
        }
    }

    /// URL path of the route.
    pub fn to_path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::SelectBranch => "/select-branch".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::Products => "/products".to_string(),
            Self::Sales => "/sales".to_string(),
            Self::BranchMenu { branch_id } => format!("/{}/menu", encode_branch_segment(branch_id)),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// Whether the page belongs to the authenticated section.
    ///
    /// Covers every protected prefix plus the branch pages, which the
    /// prefix gate alone does not see.
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Self::SelectBranch
                | Self::Dashboard
                | Self::Products
                | Self::Sales
                | Self::BranchMenu { .. }
        )
    }

    /// Whether an authenticated user should be sent away from this route.
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login)
    }

    /// Where unauthenticated users are sent.
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// Where authenticated users hitting the login page are sent.
    pub fn auth_success_redirect() -> Self {
        Self::SelectBranch
    }

    /// Where a user lands after picking a branch.
    pub fn branch_selected(branch_id: impl Into<String>) -> Self {
        Self::BranchMenu {
            branch_id: branch_id.into(),
        }
    }
}

/// Percent-encodes every byte outside `[A-Za-z0-9_-]`.
fn encode_branch_segment(branch_id: &str) -> String {
    let mut out = String::with_capacity(branch_id.len());
    for b in branch_id.bytes() {
        if b.is_ascii_alphanumeric() || b == b'-' || b == b'_' {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}

/// Inverse of [`encode_branch_segment`]. Malformed escapes, invalid UTF-8
/// and reserved first segments yield `None`.
fn decode_branch_segment(segment: &str) -> Option<String> {
    let raw = segment.as_bytes();
    let mut bytes = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        match raw[i] {
            b'%' => {
                let hex = std::str::from_utf8(raw.get(i + 1..i + 3)?).ok()?;
                bytes.push(u8::from_str_radix(hex, 16).ok()?);
                i += 3;
            }
            b if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~') => {
                bytes.push(b);
                i += 1;
            }
            _ => return None,
        }
    }

    let branch_id = String::from_utf8(bytes).ok()?;
    let reserved = matches!(
        branch_id.as_str(),
        "" | "." | ".." | "api" | "pkg" | "assets" | "static"
    );
    (!reserved).then_some(branch_id)
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_prefixes_classify_as_protected() {
        for path in [
            "/select-branch",
            "/dashboard",
            "/dashboard/today",
            "/products",
            "/products/42",
            "/sales",
            "/sales?from=2024-01-01",
        ] {
            assert_eq!(RouteClass::of(path), RouteClass::Protected, "{path}");
        }
    }

    #[test]
    fn test_login_is_public_and_rest_is_neutral() {
        assert_eq!(RouteClass::of("/login"), RouteClass::Public);
        assert_eq!(RouteClass::of("/"), RouteClass::Public);
        assert_eq!(RouteClass::of("/b-12/menu"), RouteClass::Neutral);
        assert_eq!(RouteClass::of("/pkg/app.wasm"), RouteClass::Neutral);
        assert_eq!(RouteClass::of("/api/company"), RouteClass::Neutral);
    }

    #[test]
    fn test_from_path_parses_pages() {
        assert_eq!(AppRoute::from_path("/"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/login/"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/sales?from=x"), AppRoute::Sales);
        assert_eq!(
            AppRoute::from_path("/b-12/menu"),
            AppRoute::BranchMenu {
                branch_id: "b-12".into()
            }
        );
        assert_eq!(AppRoute::from_path("/api/menu"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/a/b/c"), AppRoute::NotFound);
    }

    #[test]
    fn test_to_path_round_trips_for_pages() {
        for route in [
            AppRoute::Login,
            AppRoute::SelectBranch,
            AppRoute::Dashboard,
            AppRoute::Products,
            AppRoute::Sales,
            AppRoute::branch_selected("7"),
        ] {
            assert_eq!(AppRoute::from_path(&route.to_path()), route);
        }
    }

    #[test]
    fn test_branch_ids_with_url_characters_survive_the_path() {
        for id in ["b 1", "north/east", "caf\u{e9}", "a%b", "x.y", "50%"] {
            let route = AppRoute::branch_selected(id);
            let path = route.to_path();
            assert_eq!(path.matches('/').count(), 2, "{path}");
            assert_eq!(AppRoute::from_path(&path), route, "{path}");
        }
        assert_eq!(
            AppRoute::branch_selected("b 1/2").to_path(),
            "/b%201%2F2/menu"
        );
    }

    #[test]
    fn test_malformed_branch_segments_are_not_found() {
        for path in ["/%zz/menu", "/%4/menu", "/%FF/menu", "/%61pi/menu", "/../menu"] {
            assert_eq!(AppRoute::from_path(path), AppRoute::NotFound, "{path}");
        }
    }

    #[test]
    fn test_auth_section_covers_branch_pages() {
        assert!(AppRoute::branch_selected("7").requires_auth());
        assert!(AppRoute::Dashboard.requires_auth());
        assert!(!AppRoute::Login.requires_auth());
        assert!(!AppRoute::NotFound.requires_auth());
    }
}
