//! Client state contexts
//!
//! The stores live in `baiclass-shared`; this module backs them with
//! signals and hands them out through Leptos context. Each provider
//! component owns one store for the lifetime of the tab.

pub mod toast;

use baiclass_shared::state::require;
use baiclass_shared::{
    CompanyState, CompanyStore, ContextError, SalesState, SalesStore, StateCell, StockState,
    StockStore, SystemClock,
};
use leptos::prelude::*;

pub use toast::{ToastContext, ToastProvider, use_toasts};

// =========================================================
// Signal-backed cell
// =========================================================

/// [`StateCell`] over an [`RwSignal`]; reads inside reactive scopes track.
pub struct SignalCell<T: 'static>(RwSignal<T>);

impl<T: Send + Sync + 'static> SignalCell<T> {
    pub fn new(value: T) -> Self {
        Self(RwSignal::new(value))
    }
}

impl<T: 'static> Clone for SignalCell<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for SignalCell<T> {}

impl<T: Send + Sync + 'static> StateCell<T> for SignalCell<T> {
    fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.0.with(f)
    }

    fn update(&self, f: impl FnOnce(&mut T)) {
        self.0.update(f);
    }
}

pub type CompanyContext = CompanyStore<SignalCell<CompanyState>>;
pub type SalesContext = SalesStore<SignalCell<SalesState>>;
pub type StockContext = StockStore<SignalCell<StockState>>;

// =========================================================
// Providers
// =========================================================

#[component]
pub fn CompanyProvider(children: Children) -> impl IntoView {
    provide_context::<CompanyContext>(CompanyStore::new(SignalCell::new(
        CompanyState::default(),
    )));
    children()
}

/// Seeds the window with yesterday..today from the wall clock.
#[component]
pub fn SalesProvider(children: Children) -> impl IntoView {
    provide_context::<SalesContext>(SalesStore::new(SignalCell::new(SalesState::new(
        &SystemClock,
    ))));
    children()
}

#[component]
pub fn StockProvider(children: Children) -> impl IntoView {
    provide_context::<StockContext>(StockStore::new(SignalCell::new(StockState::new())));
    children()
}

// =========================================================
// Consumers
// =========================================================

pub fn try_use_company() -> Result<CompanyContext, ContextError> {
    require(use_context(), "CompanyContext", "CompanyProvider")
}

pub fn try_use_sales() -> Result<SalesContext, ContextError> {
    require(use_context(), "SalesContext", "SalesProvider")
}

pub fn try_use_stock() -> Result<StockContext, ContextError> {
    require(use_context(), "StockContext", "StockProvider")
}

/// # Panics
/// Outside of `<CompanyProvider>`.
pub fn use_company() -> CompanyContext {
    try_use_company().unwrap_or_else(|e| panic!("{}", e))
}

/// # Panics
/// Outside of `<SalesProvider>`.
pub fn use_sales() -> SalesContext {
    try_use_sales().unwrap_or_else(|e| panic!("{}", e))
}

/// # Panics
/// Outside of `<StockProvider>`.
pub fn use_stock() -> StockContext {
    try_use_stock().unwrap_or_else(|e| panic!("{}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consumers_outside_provider_report_the_provider() {
        assert_eq!(
            try_use_company().err(),
            Some(ContextError::missing("CompanyContext", "CompanyProvider"))
        );
        assert!(try_use_sales().is_err());
        assert!(try_use_stock().is_err());
    }

    #[test]
    #[should_panic(expected = "render this component inside <StockProvider>")]
    fn test_use_stock_outside_provider_panics() {
        use_stock();
    }

    #[test]
    fn test_provided_store_is_found() {
        let owner = Owner::new();
        owner.with(|| {
            provide_context::<StockContext>(StockStore::new(SignalCell::new(StockState::new())));
            let stock = use_stock();
            assert!(stock.is_empty());
            assert!(!stock.is_loading());
        });
    }
}
