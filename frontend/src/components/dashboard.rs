use baiclass_shared::AppRoute;
use leptos::prelude::*;

use crate::components::branch_menu::NoBranch;
use crate::context::{use_sales, use_stock, use_toasts};
use crate::loaders::{load_sales, load_stock};
use crate::web::router::use_router;
use crate::web::{ACTIVE_BRANCH_KEY, LocalStorage};

/// Threshold under which a product counts as low stock.
const LOW_STOCK_THRESHOLD: i64 = 5;

/// Reporting overview of the active branch.
#[component]
pub fn DashboardPage() -> impl IntoView {
    let Some(branch_id) = LocalStorage::get(ACTIVE_BRANCH_KEY) else {
        return view! { <NoBranch /> }.into_any();
    };

    let sales = use_sales();
    let stock = use_stock();
    let toasts = use_toasts();
    let router = use_router();

    load_sales(sales, branch_id.clone(), toasts, router);
    load_stock(stock, branch_id.clone(), toasts, router);

    on_cleanup(move || {
        sales.invalidate();
        stock.invalidate();
    });

    let summary = Memo::new(move |_| sales.summary());
    let low_stock = move || stock.low_stock(LOW_STOCK_THRESHOLD).len();
    let window_label = move || {
        let w = sales.window();
        format!("{} to {}", w.start_iso(), w.end_iso())
    };
    let menu = AppRoute::branch_selected(branch_id);

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8">
            <div class="max-w-5xl mx-auto space-y-6">
                <div class="navbar bg-base-100 rounded-box shadow">
                    <div class="flex-1 text-xl font-bold">"Reports"</div>
                    <button class="btn btn-ghost" on:click=move |_| router.navigate(&menu)>
                        "Back to menu"
                    </button>
                </div>
                <p class="text-base-content/70">{window_label}</p>

                <Show
                    when=move || !sales.is_loading()
                    fallback=|| view! { <span class="loading loading-spinner loading-lg text-primary"></span> }
                >
                    <div class="stats shadow w-full">
                        <div class="stat">
                            <div class="stat-title">"Sales"</div>
                            <div class="stat-value">{move || summary.get().count}</div>
                        </div>
                        <div class="stat">
                            <div class="stat-title">"Revenue"</div>
                            <div class="stat-value">{move || format!("{:.2}", summary.get().revenue)}</div>
                        </div>
                        <div class="stat">
                            <div class="stat-title">"Average ticket"</div>
                            <div class="stat-value">
                                {move || format!("{:.2}", summary.get().average_ticket())}
                            </div>
                        </div>
                        <div class="stat">
                            <div class="stat-title">"Items sold"</div>
                            <div class="stat-value">{move || summary.get().items_sold}</div>
                        </div>
                    </div>
                </Show>

                <div class="alert" class:alert-warning=move || { low_stock() > 0 }>
                    <span>
                        {move || match low_stock() {
                            0 => "Stock levels look fine.".to_string(),
                            n => format!("{} products are running low.", n),
                        }}
                    </span>
                </div>
            </div>
        </div>
    }
    .into_any()
}
