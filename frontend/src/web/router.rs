//! Router service
//!
//! The session cookie is http-only, so the browser cannot decide access.
//! Every navigation is a full page load that goes back through the worker
//! gate; this module only parses the current URL and renders the match.

use baiclass_shared::AppRoute;
use leptos::prelude::*;

fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// Router service, provided by [`Router`].
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
}

impl RouterService {
    fn new() -> Self {
        let (current_route, _) = signal(AppRoute::from_path(&current_path()));
        Self { current_route }
    }

    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// Navigates to `route`, keeping the current page in history.
    pub fn navigate(&self, route: &AppRoute) {
        self.navigate_path(&route.to_path());
    }

    /// Navigates to a worker-provided path (e.g. a login redirect).
    pub fn navigate_path(&self, path: &str) {
        log::debug!("[Router] navigate -> {}", path);
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.location().assign(path) {
                log::error!("[Router] navigation to {} failed: {:?}", path, e);
            }
        }
    }

    /// Sends the user back to the login page without a history entry.
    pub fn to_login(&self) {
        let path = AppRoute::auth_failure_redirect().to_path();
        log::info!("[Router] session rejected, redirecting to {}", path);
        if let Some(window) = web_sys::window() {
            let _ = window.location().replace(&path);
        }
    }

    /// Reloads the current page.
    pub fn reload(&self) {
        if let Some(window) = web_sys::window() {
            let _ = window.location().reload();
        }
    }
}

/// Gets the router service from context.
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Render inside <Router>.")
}

// ============================================================================
// UI components
// ============================================================================

/// Provides the router context; mount at the app root.
#[component]
pub fn Router(children: Children) -> impl IntoView {
    provide_context(RouterService::new());
    children()
}

/// Renders the view for the current route.
#[component]
pub fn RouterOutlet(matcher: fn(AppRoute) -> AnyView) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}
