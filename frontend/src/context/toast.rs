//! Toast context and its browser scheduler.

use std::time::Duration;

use baiclass_shared::state::require;
use baiclass_shared::{ContextError, Scheduler, ToastQueue, Toaster};
use leptos::prelude::*;

use super::SignalCell;
use crate::web::Timeout;

/// Runs scheduled tasks through `setTimeout`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce() + 'static>) {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        match Timeout::new(millis, task) {
            // Toasts only expire; nothing ever cancels the timer.
            Some(timeout) => timeout.forget(),
            None => log::error!("[Toast] could not schedule expiry timer"),
        }
    }
}

pub type ToastContext = Toaster<SignalCell<ToastQueue>, BrowserScheduler>;

#[component]
pub fn ToastProvider(children: Children) -> impl IntoView {
    provide_context::<ToastContext>(Toaster::new(
        SignalCell::new(ToastQueue::new()),
        BrowserScheduler,
    ));
    children()
}

pub fn try_use_toasts() -> Result<ToastContext, ContextError> {
    require(use_context(), "ToastContext", "ToastProvider")
}

/// # Panics
/// Outside of `<ToastProvider>`.
pub fn use_toasts() -> ToastContext {
    try_use_toasts().unwrap_or_else(|e| panic!("{}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(
        expected = "ToastContext was used outside of its provider; render this component inside <ToastProvider>"
    )]
    fn test_use_toasts_outside_provider_panics() {
        use_toasts();
    }

    #[test]
    fn test_persistent_toast_in_provided_context() {
        let owner = Owner::new();
        owner.with(|| {
            provide_context::<ToastContext>(Toaster::new(
                SignalCell::new(ToastQueue::new()),
                BrowserScheduler,
            ));
            let toasts = use_toasts();
            // zero duration never reaches the scheduler
            let id = toasts.enqueue("Saved", baiclass_shared::ToastVariant::Success, Duration::ZERO);
            assert_eq!(toasts.len(), 1);
            toasts.dismiss(&id);
            assert!(toasts.is_empty());
        });
    }
}
