//! Backing cells for the client state stores
//!
//! Every store (`CompanyStore`, `SalesStore`, `StockStore`, `Toaster`) is
//! generic over a [`StateCell`]. The browser app backs them with reactive
//! signals; tests use a plain `Rc<RefCell<T>>`. Stores are built and handed
//! out by the composition root, never reached through globals.

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

/// Single mutable container with last-write-wins semantics.
pub trait StateCell<T>: Clone + 'static {
    /// Read access.
    fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R;

    /// Write access. Writes are applied in call order.
    fn update(&self, f: impl FnOnce(&mut T));

    /// Replaces the whole value.
    fn set(&self, value: T) {
        self.update(move |slot| *slot = value);
    }

    fn get(&self) -> T
    where
        T: Clone,
    {
        self.with(T::clone)
    }
}

impl<T: 'static> StateCell<T> for Rc<RefCell<T>> {
    fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.borrow())
    }

    fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.borrow_mut());
    }
}

/// Creates a standalone cell, handy for tests and isolated instances.
pub fn local_cell<T: 'static>(value: T) -> Rc<RefCell<T>> {
    Rc::new(RefCell::new(value))
}

/// Programming error: a store was requested where none was provided.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("{context} was used outside of its provider; render this component inside <{provider}>")]
    MissingProvider {
        context: &'static str,
        provider: &'static str,
    },
}

impl ContextError {
    pub fn missing(context: &'static str, provider: &'static str) -> Self {
        Self::MissingProvider { context, provider }
    }
}

/// Resolves an optional store, turning absence into a [`ContextError`].
pub fn require<T>(
    found: Option<T>,
    context: &'static str,
    provider: &'static str,
) -> Result<T, ContextError> {
    found.ok_or_else(|| ContextError::missing(context, provider))
}
