use baiclass_shared::{AppRoute, Branch};
use leptos::prelude::*;

use crate::context::{use_company, use_toasts};
use crate::loaders::load_company;
use crate::web::router::use_router;
use crate::web::{ACTIVE_BRANCH_KEY, LocalStorage};

#[component]
pub fn SelectBranchPage() -> impl IntoView {
    let company = use_company();
    let toasts = use_toasts();
    let router = use_router();

    load_company(company, toasts, router);

    let pick = move |branch: Branch| {
        LocalStorage::set(ACTIVE_BRANCH_KEY, &branch.id);
        router.navigate(&AppRoute::branch_selected(branch.id));
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8">
            <div class="max-w-3xl mx-auto space-y-6">
                <div>
                    <h1 class="text-2xl font-bold">
                        {move || company.company().map(|c| c.name).unwrap_or_default()}
                    </h1>
                    <p class="text-base-content/70">
                        {move || company.account().map(|a| format!("Signed in as {}", a.name))}
                    </p>
                </div>

                <Show
                    when=move || company.is_loaded()
                    fallback=|| view! { <span class="loading loading-spinner loading-lg text-primary"></span> }
                >
                    <Show
                        when=move || !company.branches().is_empty()
                        fallback=|| view! { <p>"This company has no branches yet."</p> }
                    >
                        <ul class="menu bg-base-100 rounded-box shadow">
                            <For
                                each=move || company.branches()
                                key=|b| b.id.clone()
                                children=move |branch: Branch| {
                                    let label = branch.name.clone();
                                    let address = branch.address.clone().unwrap_or_default();
                                    view! {
                                        <li>
                                            <button on:click=move |_| pick(branch.clone())>
                                                <span class="font-semibold">{label}</span>
                                                <span class="text-sm opacity-70">{address}</span>
                                            </button>
                                        </li>
                                    }
                                }
                            />
                        </ul>
                    </Show>
                </Show>
            </div>
        </div>
    }
}
