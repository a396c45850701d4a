//! Toast queue
//!
//! `ToastQueue` is the plain ordered list; `Toaster` wraps it in a
//! [`StateCell`] and a [`Scheduler`] so enqueued toasts expire on their own.

use std::fmt;
use std::time::Duration;

use uuid::Uuid;

use crate::state::StateCell;

/// Default lifetime of a toast.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastVariant {
    Success,
    Error,
    #[default]
    Info,
    Warning,
}

impl ToastVariant {
    /// Stable lowercase name, also used as a CSS modifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ToastId(String);

impl ToastId {
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An immutable notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub variant: ToastVariant,
    /// Zero means "until dismissed".
    pub duration: Duration,
}

impl Toast {
    pub fn new(message: impl Into<String>, variant: ToastVariant, duration: Duration) -> Self {
        Self {
            id: ToastId::random(),
            message: message.into(),
            variant,
            duration,
        }
    }

    pub fn is_persistent(&self) -> bool {
        self.duration.is_zero()
    }
}

// =========================================================
// ToastQueue
// =========================================================

/// Insertion-ordered toast list with unique ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a toast. Returns `false` (and keeps the list) on an id clash.
    pub fn push(&mut self, toast: Toast) -> bool {
        if self.contains(&toast.id) {
            return false;
        }
        self.toasts.push(toast);
        true
    }

    /// Removes a toast. Idempotent: returns `false` if it was already gone.
    pub fn remove(&mut self, id: &ToastId) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| &t.id != id);
        self.toasts.len() != before
    }

    pub fn contains(&self, id: &ToastId) -> bool {
        self.toasts.iter().any(|t| &t.id == id)
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn to_vec(&self) -> Vec<Toast> {
        self.toasts.clone()
    }
}

// =========================================================
// Scheduler + Toaster
// =========================================================

/// Fire-once deferred execution on the host event loop.
pub trait Scheduler: Clone + 'static {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce() + 'static>);
}

/// Toast context: the queue plus its expiry timers.
#[derive(Clone, Copy)]
pub struct Toaster<C, S> {
    queue: C,
    scheduler: S,
}

impl<C, S> Toaster<C, S>
where
    C: StateCell<ToastQueue>,
    S: Scheduler,
{
    pub fn new(queue: C, scheduler: S) -> Self {
        Self { queue, scheduler }
    }

    /// Adds a toast and, unless `duration` is zero, schedules its removal.
    pub fn enqueue(
        &self,
        message: impl Into<String>,
        variant: ToastVariant,
        duration: Duration,
    ) -> ToastId {
        let toast = Toast::new(message, variant, duration);
        let id = toast.id.clone();
        let persistent = toast.is_persistent();
        self.queue.update(|q| {
            q.push(toast);
        });

        if !persistent {
            let queue = self.queue.clone();
            let expired = id.clone();
            self.scheduler.schedule(
                duration,
                Box::new(move || {
                    // no-op when the toast was dismissed by hand
                    queue.update(|q| {
                        q.remove(&expired);
                    });
                }),
            );
        }
        id
    }

    /// Removes a toast right away. Unknown ids are ignored.
    pub fn dismiss(&self, id: &ToastId) {
        self.queue.update(|q| {
            q.remove(id);
        });
    }

    pub fn success(&self, message: impl Into<String>) -> ToastId {
        self.enqueue(message, ToastVariant::Success, DEFAULT_TOAST_DURATION)
    }

    pub fn error(&self, message: impl Into<String>) -> ToastId {
        self.enqueue(message, ToastVariant::Error, DEFAULT_TOAST_DURATION)
    }

    pub fn info(&self, message: impl Into<String>) -> ToastId {
        self.enqueue(message, ToastVariant::Info, DEFAULT_TOAST_DURATION)
    }

    pub fn warning(&self, message: impl Into<String>) -> ToastId {
        self.enqueue(message, ToastVariant::Warning, DEFAULT_TOAST_DURATION)
    }

    /// Current toasts in insertion order.
    pub fn toasts(&self) -> Vec<Toast> {
        self.queue.with(ToastQueue::to_vec)
    }

    pub fn len(&self) -> usize {
        self.queue.with(ToastQueue::len)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.with(ToastQueue::is_empty)
    }
}
