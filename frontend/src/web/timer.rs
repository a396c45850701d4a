//! Timer wrapper
//!
//! Native `setTimeout` through `web_sys`, used for toast expiry.

use wasm_bindgen::prelude::*;

/// One-shot timer. Dropping it before it fires cancels the callback.
pub struct Timeout {
    handle: i32,
    closure: Option<Closure<dyn FnMut()>>,
}

impl Timeout {
    /// Schedules `callback` after `millis`. `None` when there is no window.
    pub fn new<F>(millis: u32, callback: F) -> Option<Self>
    where
        F: FnOnce() + 'static,
    {
        let closure: Closure<dyn FnMut()> = Closure::once(callback);
        let window = web_sys::window()?;

        let handle = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                millis.min(i32::MAX as u32) as i32,
            )
            .ok()?;

        Some(Self {
            handle,
            closure: Some(closure),
        })
    }

    pub fn cancel(&self) {
        if let Some(window) = web_sys::window() {
            window.clear_timeout_with_handle(self.handle);
        }
    }

    /// Lets the timer outlive this handle. The closure is leaked until it fires.
    pub fn forget(mut self) {
        if let Some(closure) = self.closure.take() {
            closure.forget();
        }
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        if self.closure.is_some() {
            self.cancel();
        }
    }
}
