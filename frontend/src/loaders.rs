//! Fetch-and-publish helpers shared by the pages.
//!
//! Each loader takes a fetch ticket from its store before the request and
//! hands it back with the result, so a late answer for a discarded view or
//! an outdated window never overwrites newer data.

use baiclass_shared::protocol::{BranchSalesRequest, BranchStockRequest, CompanyProfileRequest};
use leptos::task::spawn_local;

use crate::api::{ApiError, PosApi};
use crate::context::{CompanyContext, SalesContext, StockContext, ToastContext};
use crate::web::router::RouterService;

/// Routes an API failure: a dead session goes back to login, anything else
/// becomes an error toast.
pub fn report(err: &ApiError, toasts: ToastContext, router: RouterService) {
    log::warn!("[API] {}", err);
    if err.is_unauthorized() {
        router.to_login();
    } else {
        toasts.error(err.user_message());
    }
}

/// Loads company, account and catalog unless already present.
pub fn load_company(company: CompanyContext, toasts: ToastContext, router: RouterService) {
    if company.is_loaded() {
        return;
    }
    spawn_local(async move {
        match PosApi::fetch_data(&CompanyProfileRequest).await {
            Ok(profile) => company.apply_profile(profile),
            Err(e) => report(&e, toasts, router),
        }
    });
}

pub fn load_stock(
    stock: StockContext,
    branch_id: String,
    toasts: ToastContext,
    router: RouterService,
) {
    let ticket = stock.begin_fetch(&branch_id);
    spawn_local(async move {
        match PosApi::fetch_data(&BranchStockRequest { branch_id }).await {
            Ok(items) => {
                if !stock.complete_fetch(ticket, items) {
                    log::debug!("[Stock] dropped stale response {}", ticket.generation());
                }
            }
            Err(e) => {
                if stock.fail_fetch(ticket) {
                    report(&e, toasts, router);
                }
            }
        }
    });
}

/// Loads sales for the store's current window.
pub fn load_sales(
    sales: SalesContext,
    branch_id: String,
    toasts: ToastContext,
    router: RouterService,
) {
    let (ticket, window) = sales.begin_fetch();
    spawn_local(async move {
        match PosApi::fetch_data(&BranchSalesRequest { branch_id, window }).await {
            Ok(history) => {
                if !sales.complete_fetch(ticket, history) {
                    log::debug!("[Sales] dropped stale response {}", ticket.generation());
                }
            }
            Err(e) => {
                if sales.fail_fetch(ticket) {
                    report(&e, toasts, router);
                }
            }
        }
    });
}
