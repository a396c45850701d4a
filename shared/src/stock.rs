//! Stock context
//!
//! In-memory snapshot of product quantities for the active branch. At most
//! one entry per product id; writing an entry replaces it wholesale.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::fetch::{FetchGuard, FetchTicket};
use crate::state::StateCell;

/// Point-in-time stock level of one product at one branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub product_id: String,
    pub name: String,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

pub type StockMap = BTreeMap<String, ProductSnapshot>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockState {
    items: StockMap,
    loading: bool,
    branch_id: Option<String>,
    fetches: FetchGuard,
}

impl StockState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Stock context handle.
#[derive(Clone, Copy)]
pub struct StockStore<C> {
    cell: C,
}

impl<C: StateCell<StockState>> StockStore<C> {
    pub fn new(cell: C) -> Self {
        Self { cell }
    }

    pub fn get(&self, product_id: &str) -> Option<ProductSnapshot> {
        self.cell.with(|s| s.items.get(product_id).cloned())
    }

    /// All snapshots ordered by product id.
    pub fn items(&self) -> Vec<ProductSnapshot> {
        self.cell.with(|s| s.items.values().cloned().collect())
    }

    pub fn len(&self) -> usize {
        self.cell.with(|s| s.items.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_loading(&self) -> bool {
        self.cell.with(|s| s.loading)
    }

    /// Branch the current snapshot belongs to.
    pub fn branch(&self) -> Option<String> {
        self.cell.with(|s| s.branch_id.clone())
    }

    /// Products at or below `threshold` units, lowest first.
    pub fn low_stock(&self, threshold: i64) -> Vec<ProductSnapshot> {
        let mut low: Vec<_> = self.cell.with(|s| {
            s.items
                .values()
                .filter(|p| p.quantity <= threshold)
                .cloned()
                .collect()
        });
        low.sort_by_key(|p| p.quantity);
        low
    }

    /// Writes one entry, overwriting any previous snapshot for that id.
    pub fn set_product(&self, snapshot: ProductSnapshot) {
        self.cell.update(|s| {
            s.items.insert(snapshot.product_id.clone(), snapshot);
        });
    }

    /// Replaces the whole map.
    pub fn set_stock(&self, snapshots: Vec<ProductSnapshot>) {
        self.cell.update(|s| s.items = to_map(snapshots));
    }

    pub fn set_loading(&self, loading: bool) {
        self.cell.update(|s| s.loading = loading);
    }

    /// Starts a fetch for `branch_id`.
    ///
    /// Switching branches drops the previous branch's snapshot right away.
    pub fn begin_fetch(&self, branch_id: &str) -> FetchTicket {
        let mut ticket = None;
        self.cell.update(|s| {
            if s.branch_id.as_deref() != Some(branch_id) {
                s.items.clear();
                s.branch_id = Some(branch_id.to_string());
            }
            s.loading = true;
            ticket = Some(s.fetches.issue());
        });
        ticket.unwrap_or(FetchTicket::DETACHED)
    }

    /// Applies a fetch result if `ticket` is still current.
    pub fn complete_fetch(&self, ticket: FetchTicket, snapshots: Vec<ProductSnapshot>) -> bool {
        let mut applied = false;
        self.cell.update(|s| {
            if s.fetches.is_current(ticket) {
                s.items = to_map(snapshots);
                s.loading = false;
                applied = true;
            }
        });
        applied
    }

    /// Clears the loading flag of a failed fetch if it is still current.
    pub fn fail_fetch(&self, ticket: FetchTicket) -> bool {
        let mut applied = false;
        self.cell.update(|s| {
            if s.fetches.is_current(ticket) {
                s.loading = false;
                applied = true;
            }
        });
        applied
    }

    /// Discards every in-flight fetch, e.g. when the requesting view goes away.
    pub fn invalidate(&self) {
        self.cell.update(|s| {
            s.fetches.invalidate();
            s.loading = false;
        });
    }
}

fn to_map(snapshots: Vec<ProductSnapshot>) -> StockMap {
    snapshots
        .into_iter()
        .map(|p| (p.product_id.clone(), p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::local_cell;

    fn snapshot(id: &str, quantity: i64) -> ProductSnapshot {
        ProductSnapshot {
            product_id: id.into(),
            name: format!("Product {id}"),
            quantity,
            unit: None,
            price: Some(2.5),
            category: None,
        }
    }

    fn store() -> StockStore<std::rc::Rc<std::cell::RefCell<StockState>>> {
        StockStore::new(local_cell(StockState::new()))
    }

    #[test]
    fn test_distinct_ids_both_kept() {
        let stock = store();
        stock.set_product(snapshot("a", 1));
        stock.set_product(snapshot("b", 2));
        assert_eq!(stock.len(), 2);
        assert_eq!(stock.get("a").unwrap().quantity, 1);
        assert_eq!(stock.get("b").unwrap().quantity, 2);
    }

    #[test]
    fn test_same_id_keeps_latest_only() {
        let stock = store();
        stock.set_product(snapshot("a", 1));
        let mut replacement = snapshot("a", 9);
        replacement.price = None;
        stock.set_product(replacement.clone());

        assert_eq!(stock.len(), 1);
        // full overwrite, no field merge
        assert_eq!(stock.get("a"), Some(replacement));
    }

    #[test]
    fn test_fetch_completion_replaces_map() {
        let stock = store();
        stock.set_product(snapshot("old", 1));

        let ticket = stock.begin_fetch("b1");
        assert!(stock.is_loading());
        assert!(stock.is_empty(), "new branch starts empty");

        assert!(stock.complete_fetch(ticket, vec![snapshot("x", 3), snapshot("y", 4)]));
        assert!(!stock.is_loading());
        assert_eq!(stock.items().len(), 2);
        assert_eq!(stock.branch().as_deref(), Some("b1"));
    }

    #[test]
    fn test_stale_fetch_is_discarded() {
        let stock = store();
        let first = stock.begin_fetch("b1");
        let second = stock.begin_fetch("b1");

        assert!(stock.complete_fetch(second, vec![snapshot("fresh", 1)]));
        assert!(!stock.complete_fetch(first, vec![snapshot("stale", 1)]));
        assert!(stock.get("stale").is_none());
        assert!(stock.get("fresh").is_some());
    }

    #[test]
    fn test_invalidated_fetch_cannot_write() {
        let stock = store();
        let ticket = stock.begin_fetch("b1");
        stock.invalidate();

        assert!(!stock.complete_fetch(ticket, vec![snapshot("late", 1)]));
        assert!(!stock.fail_fetch(ticket));
        assert!(stock.is_empty());
        assert!(!stock.is_loading());
    }

    #[test]
    fn test_same_branch_refetch_keeps_snapshot_while_loading() {
        let stock = store();
        let ticket = stock.begin_fetch("b1");
        stock.complete_fetch(ticket, vec![snapshot("a", 1)]);

        let _refresh = stock.begin_fetch("b1");
        assert_eq!(stock.len(), 1);
    }

    #[test]
    fn test_low_stock_sorted() {
        let stock = store();
        stock.set_stock(vec![snapshot("a", 5), snapshot("b", 0), snapshot("c", 20), snapshot("d", 2)]);
        let low: Vec<_> = stock.low_stock(5).into_iter().map(|p| p.product_id).collect();
        assert_eq!(low, vec!["b", "d", "a"]);
    }
}
