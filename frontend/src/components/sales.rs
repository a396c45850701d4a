use baiclass_shared::date::parse_iso_date;
use baiclass_shared::{AppRoute, Sale, SalesWindow};
use leptos::prelude::*;

use crate::components::branch_menu::NoBranch;
use crate::context::{use_sales, use_toasts};
use crate::loaders::load_sales;
use crate::web::router::use_router;
use crate::web::{ACTIVE_BRANCH_KEY, LocalStorage};

/// Which end of the window an input edits.
#[derive(Clone, Copy)]
enum Bound {
    Start,
    End,
}

/// Sales history of the active branch within the selected window.
#[component]
pub fn SalesPage() -> impl IntoView {
    let Some(branch_id) = LocalStorage::get(ACTIVE_BRANCH_KEY) else {
        return view! { <NoBranch /> }.into_any();
    };

    let sales = use_sales();
    let toasts = use_toasts();
    let router = use_router();

    load_sales(sales, branch_id.clone(), toasts, router);
    on_cleanup(move || sales.invalidate());

    let on_date = {
        let branch_id = branch_id.clone();
        move |bound: Bound, raw: String| {
            let current = sales.window();
            let next: Result<SalesWindow, _> = parse_iso_date(&raw).and_then(|d| match bound {
                Bound::Start => current.with_start(d),
                Bound::End => current.with_end(d),
            });
            match next {
                Ok(window) if window != current => {
                    sales.set_window(window);
                    load_sales(sales, branch_id.clone(), toasts, router);
                }
                Ok(_) => {}
                Err(e) => {
                    toasts.warning(e.to_string());
                }
            }
        }
    };
    let on_start = {
        let on_date = on_date.clone();
        move |ev: leptos::ev::Event| on_date(Bound::Start, event_target_value(&ev))
    };
    let on_end = move |ev: leptos::ev::Event| on_date(Bound::End, event_target_value(&ev));

    let summary = Memo::new(move |_| sales.summary());
    let menu = AppRoute::branch_selected(branch_id);

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8">
            <div class="max-w-5xl mx-auto space-y-6">
                <div class="navbar bg-base-100 rounded-box shadow">
                    <div class="flex-1 text-xl font-bold">"Sales"</div>
                    <button class="btn btn-ghost" on:click=move |_| router.navigate(&menu)>
                        "Back to menu"
                    </button>
                </div>

                <div class="flex gap-4 items-end">
                    <label class="form-control">
                        <span class="label-text">"From"</span>
                        <input
                            type="date"
                            class="input input-bordered"
                            prop:value=move || sales.window().start_iso()
                            on:change=on_start
                        />
                    </label>
                    <label class="form-control">
                        <span class="label-text">"To"</span>
                        <input
                            type="date"
                            class="input input-bordered"
                            prop:value=move || sales.window().end_iso()
                            on:change=on_end
                        />
                    </label>
                    <div class="ml-auto text-right">
                        <div class="text-sm opacity-70">
                            {move || format!("{} sales", summary.get().count)}
                        </div>
                        <div class="text-xl font-bold">
                            {move || format!("{:.2}", summary.get().revenue)}
                        </div>
                    </div>
                </div>

                <Show
                    when=move || !sales.is_loading()
                    fallback=|| view! { <span class="loading loading-spinner loading-lg text-primary"></span> }
                >
                    <table class="table bg-base-100 rounded-box shadow">
                        <thead>
                            <tr>
                                <th>"Date"</th>
                                <th>"Ticket"</th>
                                <th class="text-right">"Items"</th>
                                <th class="text-right">"Total"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=move || sales.history()
                                key=|s| s.id.clone()
                                children=move |sale: Sale| {
                                    let items: i64 = sale.lines.iter().map(|l| l.quantity).sum();
                                    view! {
                                        <tr>
                                            <td>{sale.date.to_string()}</td>
                                            <td>{sale.id}</td>
                                            <td class="text-right">{items}</td>
                                            <td class="text-right">{format!("{:.2}", sale.total)}</td>
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
