use baiclass_shared::{AppRoute, Branch, CompanyState, CompanyStore, StateCell};
use leptos::prelude::*;
use thiserror::Error;

use crate::context::{use_company, use_toasts};
use crate::loaders::load_company;
use crate::web::router::use_router;
use crate::web::{ACTIVE_BRANCH_KEY, LocalStorage};

/// Render-time failures caught by the app's error boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("branch {0} does not belong to this company")]
    UnknownBranch(String),
}

/// Looks the branch up in the company and, only when it belongs there,
/// hands its id to `remember`.
fn activate_branch<C: StateCell<CompanyState>>(
    company: &CompanyStore<C>,
    branch_id: &str,
    remember: impl FnOnce(&str),
) -> Result<Branch, PageError> {
    let branch = company
        .branch(branch_id)
        .ok_or_else(|| PageError::UnknownBranch(branch_id.to_string()))?;
    remember(&branch.id);
    Ok(branch)
}

#[component]
pub fn BranchMenuPage(branch_id: String) -> impl IntoView {
    let company = use_company();
    let toasts = use_toasts();
    let router = use_router();

    load_company(company, toasts, router);

    move || -> Result<AnyView, PageError> {
        if !company.is_loaded() {
            return Ok(view! { <span class="loading loading-spinner loading-lg text-primary"></span> }
                .into_any());
        }
        let branch = activate_branch(&company, &branch_id, |id| {
            LocalStorage::set(ACTIVE_BRANCH_KEY, id);
        })?;

        let entries = [
            (AppRoute::Sales, "Sales"),
            (AppRoute::Products, "Products & stock"),
            (AppRoute::Dashboard, "Reports"),
        ];

        Ok(view! {
            <div class="min-h-screen bg-base-200 p-4 md:p-8">
                <div class="max-w-3xl mx-auto space-y-6">
                    <div class="navbar bg-base-100 rounded-box shadow">
                        <div class="flex-1 text-xl font-bold">{branch.name}</div>
                        <button
                            class="btn btn-ghost"
                            on:click=move |_| router.navigate(&AppRoute::SelectBranch)
                        >
                            "Change branch"
                        </button>
                    </div>
                    <div class="grid gap-4 md:grid-cols-3">
                        {entries
                            .into_iter()
                            .map(|(route, label)| {
                                view! {
                                    <button
                                        class="btn btn-lg btn-primary"
                                        on:click=move |_| router.navigate(&route)
                                    >
                                        {label}
                                    </button>
                                }
                            })
                            .collect_view()}
                    </div>
                </div>
            </div>
        }
        .into_any())
    }
}

/// Shown by branch-scoped pages when no branch has been picked yet.
#[component]
pub fn NoBranch() -> impl IntoView {
    let router = use_router();

    view! {
        <div class="flex flex-col items-center justify-center min-h-screen gap-4 bg-base-200">
            <p class="text-lg">"Pick a branch first."</p>
            <button
                class="btn btn-primary"
                on:click=move |_| router.navigate(&AppRoute::SelectBranch)
            >
                "Select branch"
            </button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use baiclass_shared::Company;
    use baiclass_shared::state::local_cell;

    fn company() -> CompanyStore<std::rc::Rc<std::cell::RefCell<CompanyState>>> {
        let store = CompanyStore::new(local_cell(CompanyState::default()));
        store.set_company(Some(Company {
            id: "c1".into(),
            name: "Baiclass".into(),
            branches: vec![Branch {
                id: "b1".into(),
                name: "Centro".into(),
                address: None,
            }],
        }));
        store
    }

    #[test]
    fn test_known_branch_is_remembered() {
        let mut remembered = None;
        let branch = activate_branch(&company(), "b1", |id| remembered = Some(id.to_string()));
        assert_eq!(branch.unwrap().name, "Centro");
        assert_eq!(remembered.as_deref(), Some("b1"));
    }

    #[test]
    fn test_unknown_branch_is_not_remembered() {
        let mut remembered = None;
        let result = activate_branch(&company(), "b9", |id| remembered = Some(id.to_string()));
        assert_eq!(result, Err(PageError::UnknownBranch("b9".into())));
        assert!(remembered.is_none());
    }
}
