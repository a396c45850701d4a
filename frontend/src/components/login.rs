use baiclass_shared::protocol::{LoginOutcome, LoginRequest};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::PosApi;
use crate::web::router::use_router;
use crate::web::{LAST_MEDIUM_KEY, LocalStorage};

#[component]
pub fn LoginPage() -> impl IntoView {
    let router = use_router();

    let (medium, set_medium) = signal(LocalStorage::get(LAST_MEDIUM_KEY).unwrap_or_default());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let credentials = LoginRequest {
            medium: medium.get_untracked().trim().to_string(),
            password: password.get_untracked(),
        };
        if !credentials.is_complete() {
            set_error_msg.set(Some("Enter your email or phone and password.".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            match PosApi::login(&credentials).await {
                Ok(LoginOutcome::Success { redirect }) => {
                    LocalStorage::set(LAST_MEDIUM_KEY, &credentials.medium);
                    router.navigate_path(&redirect);
                }
                Ok(LoginOutcome::Failure { error }) => set_error_msg.set(Some(error)),
                Err(e) => {
                    log::error!("[Login] {}", e);
                    set_error_msg.set(Some(e.user_message()));
                }
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <h1 class="text-3xl font-bold">"Baiclass POS"</h1>
                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="medium">
                                <span class="label-text">"Email or phone"</span>
                            </label>
                            <input
                                id="medium"
                                type="text"
                                autocomplete="username"
                                on:input=move |ev| set_medium.set(event_target_value(&ev))
                                prop:value=medium
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                autocomplete="current-password"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Signing in..." }.into_any()
                                } else {
                                    "Sign in".into_any()
                                }}
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
