//! Baiclass POS frontend
//!
//! Context-driven layout:
//! - `context`: the four client state stores and their providers
//! - `web::router`: route parsing and full-page navigation
//! - `api` / `loaders`: worker calls and publishing results into stores
//! - `components`: pages, thin consumers of the contexts

mod api;
mod components {
    pub mod branch_menu;
    pub mod dashboard;
    pub mod login;
    pub mod products;
    pub mod sales;
    pub mod select_branch;
    pub mod toast;
}
mod context;
mod loaders;

use crate::components::branch_menu::BranchMenuPage;
use crate::components::dashboard::DashboardPage;
use crate::components::login::LoginPage;
use crate::components::products::ProductsPage;
use crate::components::sales::SalesPage;
use crate::components::select_branch::SelectBranchPage;
use crate::components::toast::ToastViewport;
use crate::context::{CompanyProvider, SalesProvider, StockProvider, ToastProvider};

use baiclass_shared::AppRoute;
use leptos::prelude::*;

// Native Web API wrappers, used instead of the gloo-* crates to keep the
// WASM binary small.
pub(crate) mod web {
    mod http;
    pub mod router;
    mod storage;
    mod timer;

    pub use http::{HttpClient, HttpError};
    pub use storage::{ACTIVE_BRANCH_KEY, LAST_MEDIUM_KEY, LocalStorage};
    pub use timer::Timeout;
}

use web::router::{Router, RouterOutlet, use_router};

/// Maps the current route to its page.
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::SelectBranch => view! { <SelectBranchPage /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::Products => view! { <ProductsPage /> }.into_any(),
        AppRoute::Sales => view! { <SalesPage /> }.into_any(),
        AppRoute::BranchMenu { branch_id } => view! { <BranchMenuPage branch_id=branch_id /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

/// Fallback for anything a page throws while rendering.
#[component]
fn PageFailure(errors: ArcRwSignal<Errors>) -> impl IntoView {
    let router = use_router();

    Effect::new({
        let errors = errors.clone();
        move |_| {
            errors.with(|errs| {
                for (_, e) in errs.iter() {
                    log::error!("[App] render error: {}", e);
                }
            })
        }
    });

    view! {
        <div class="flex flex-col items-center justify-center min-h-screen gap-4 bg-base-200">
            <h1 class="text-2xl font-bold">"Something went wrong"</h1>
            <button class="btn btn-primary" on:click=move |_| router.reload()>
                "Try again"
            </button>
        </div>
    }
}

#[component]
pub fn App() -> impl IntoView {
    view! {
        <CompanyProvider>
            <SalesProvider>
                <StockProvider>
                    <ToastProvider>
                        <Router>
                            <ErrorBoundary fallback=|errors| view! { <PageFailure errors=errors /> }>
                                <RouterOutlet matcher=route_matcher />
                            </ErrorBoundary>
                        </Router>
                        <ToastViewport />
                    </ToastProvider>
                </StockProvider>
            </SalesProvider>
        </CompanyProvider>
    }
}
