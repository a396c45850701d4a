use baiclass_shared::{AppRoute, ProductSnapshot};
use leptos::prelude::*;

use crate::components::branch_menu::NoBranch;
use crate::context::{use_stock, use_toasts};
use crate::loaders::load_stock;
use crate::web::router::use_router;
use crate::web::{ACTIVE_BRANCH_KEY, LocalStorage};

const LOW_STOCK_THRESHOLD: i64 = 5;

/// Stock of the active branch.
#[component]
pub fn ProductsPage() -> impl IntoView {
    let Some(branch_id) = LocalStorage::get(ACTIVE_BRANCH_KEY) else {
        return view! { <NoBranch /> }.into_any();
    };

    let stock = use_stock();
    let toasts = use_toasts();
    let router = use_router();

    let reload = {
        let branch_id = branch_id.clone();
        move |_: leptos::ev::MouseEvent| load_stock(stock, branch_id.clone(), toasts, router)
    };
    load_stock(stock, branch_id.clone(), toasts, router);
    on_cleanup(move || stock.invalidate());

    let menu = AppRoute::branch_selected(branch_id);

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8">
            <div class="max-w-5xl mx-auto space-y-6">
                <div class="navbar bg-base-100 rounded-box shadow">
                    <div class="flex-1 text-xl font-bold">"Products & stock"</div>
                    <button class="btn btn-ghost" disabled=move || stock.is_loading() on:click=reload>
                        "Refresh"
                    </button>
                    <button class="btn btn-ghost" on:click=move |_| router.navigate(&menu)>
                        "Back to menu"
                    </button>
                </div>

                <Show
                    when=move || !(stock.is_loading() && stock.is_empty())
                    fallback=|| view! { <span class="loading loading-spinner loading-lg text-primary"></span> }
                >
                    <table class="table bg-base-100 rounded-box shadow">
                        <thead>
                            <tr>
                                <th>"Product"</th>
                                <th>"Category"</th>
                                <th class="text-right">"Quantity"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=move || stock.items()
                                key=|p| (p.product_id.clone(), p.quantity)
                                children=move |p: ProductSnapshot| {
                                    let low = p.quantity <= LOW_STOCK_THRESHOLD;
                                    let quantity = match &p.unit {
                                        Some(unit) => format!("{} {}", p.quantity, unit),
                                        None => p.quantity.to_string(),
                                    };
                                    view! {
                                        <tr class:text-warning=low>
                                            <td>{p.name}</td>
                                            <td>{p.category.unwrap_or_default()}</td>
                                            <td class="text-right">{quantity}</td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </Show>
            </div>
        </div>
    }
    .into_any()
}
