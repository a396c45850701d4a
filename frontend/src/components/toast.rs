use baiclass_shared::{Toast, ToastVariant};
use leptos::prelude::*;

use crate::context::use_toasts;

fn alert_class(variant: ToastVariant) -> &'static str {
    match variant {
        ToastVariant::Success => "alert alert-success shadow-lg",
        ToastVariant::Error => "alert alert-error shadow-lg",
        ToastVariant::Info => "alert alert-info shadow-lg",
        ToastVariant::Warning => "alert alert-warning shadow-lg",
    }
}

/// Renders the toast queue in insertion order.
#[component]
pub fn ToastViewport() -> impl IntoView {
    let toasts = use_toasts();

    view! {
        <div class="toast toast-top toast-end z-50">
            <For
                each=move || toasts.toasts()
                key=|t| t.id.clone()
                children=move |toast: Toast| {
                    let id = toast.id.clone();
                    view! {
                        <div role="status" class=alert_class(toast.variant) data-variant=toast.variant.as_str()>
                            <span>{toast.message}</span>
                            <button class="btn btn-sm btn-ghost" on:click=move |_| toasts.dismiss(&id)>
                                "✕"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
