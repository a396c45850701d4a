//! Sales context
//!
//! Holds the selected date window and the sale records fetched for it.
//! The window starts as yesterday..today from the injected [`Clock`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date::{Clock, SalesWindow};
use crate::fetch::{FetchGuard, FetchTicket};
use crate::state::StateCell;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleLine {
    pub product_id: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: String,
    pub branch_id: String,
    pub date: NaiveDate,
    pub total: f64,
    #[serde(default)]
    pub lines: Vec<SaleLine>,
}

/// Aggregate figures for the reporting screens.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SalesSummary {
    pub count: usize,
    pub revenue: f64,
    pub items_sold: i64,
}

impl SalesSummary {
    pub fn of(sales: &[Sale]) -> Self {
        sales.iter().fold(Self::default(), |acc, sale| Self {
            count: acc.count + 1,
            revenue: acc.revenue + sale.total,
            items_sold: acc.items_sold + sale.lines.iter().map(|l| l.quantity).sum::<i64>(),
        })
    }

    pub fn average_ticket(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.revenue / self.count as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SalesState {
    window: SalesWindow,
    history: Vec<Sale>,
    loading: bool,
    fetches: FetchGuard,
}

impl SalesState {
    pub fn new(clock: &impl Clock) -> Self {
        Self {
            window: SalesWindow::default_for(clock),
            history: Vec::new(),
            loading: false,
            fetches: FetchGuard::default(),
        }
    }
}

/// Sales context handle.
#[derive(Clone, Copy)]
pub struct SalesStore<C> {
    cell: C,
}

impl<C: StateCell<SalesState>> SalesStore<C> {
    pub fn new(cell: C) -> Self {
        Self { cell }
    }

    pub fn window(&self) -> SalesWindow {
        self.cell.with(|s| s.window)
    }

    pub fn history(&self) -> Vec<Sale> {
        self.cell.with(|s| s.history.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.cell.with(|s| s.loading)
    }

    pub fn summary(&self) -> SalesSummary {
        self.cell.with(|s| SalesSummary::of(&s.history))
    }

    /// Changes the window. In-flight fetches for the old window go stale.
    pub fn set_window(&self, window: SalesWindow) {
        self.cell.update(|s| {
            if s.window != window {
                s.window = window;
                s.fetches.invalidate();
                s.loading = false;
            }
        });
    }

    pub fn set_history(&self, history: Vec<Sale>) {
        self.cell.update(|s| s.history = history);
    }

    /// Starts a fetch and returns the window it should cover.
    pub fn begin_fetch(&self) -> (FetchTicket, SalesWindow) {
        let mut started = None;
        self.cell.update(|s| {
            s.loading = true;
            started = Some((s.fetches.issue(), s.window));
        });
        started.unwrap_or_else(|| (FetchTicket::DETACHED, self.window()))
    }

    /// Applies the fetched records if `ticket` is still current.
    pub fn complete_fetch(&self, ticket: FetchTicket, history: Vec<Sale>) -> bool {
        let mut applied = false;
        self.cell.update(|s| {
            if s.fetches.is_current(ticket) {
                s.history = history;
                s.loading = false;
                applied = true;
            }
        });
        applied
    }

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

    pub fn invalidate(&self) {
        self.cell.update(|s| {
            s.fetches.invalidate();
            s.loading = false;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::FixedClock;
    use crate::state::local_cell;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn store() -> SalesStore<Rc<RefCell<SalesState>>> {
        SalesStore::new(local_cell(SalesState::new(&FixedClock::on(day(15)))))
    }

    fn sale(id: &str, total: f64, qty: i64) -> Sale {
        Sale {
            id: id.into(),
            branch_id: "b1".into(),
            date: day(14),
            total,
            lines: vec![SaleLine {
                product_id: "p".into(),
                name: "Bread".into(),
                quantity: qty,
                unit_price: total / qty as f64,
            }],
        }
    }

    #[test]
    fn test_initial_window_is_yesterday_today() {
        let sales = store();
        let window = sales.window();
        assert_eq!(window.start_iso(), "2024-06-14");
        assert_eq!(window.end_iso(), "2024-06-15");
        assert!(sales.history().is_empty());
        assert!(!sales.is_loading());
    }

    #[test]
    fn test_history_last_write_wins() {
        let sales = store();
        sales.set_history(vec![sale("1", 10.0, 1)]);
        sales.set_history(vec![sale("2", 4.0, 2), sale("3", 6.0, 3)]);
        let ids: Vec<_> = sales.history().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn test_fetch_applies_for_current_window() {
        let sales = store();
        let (ticket, window) = sales.begin_fetch();
        assert_eq!(window, sales.window());
        assert!(sales.is_loading());

        assert!(sales.complete_fetch(ticket, vec![sale("1", 10.0, 2)]));
        assert_eq!(sales.history().len(), 1);
        assert!(!sales.is_loading());
    }

    #[test]
    fn test_window_change_stales_in_flight_fetch() {
        let sales = store();
        let (ticket, _) = sales.begin_fetch();
        sales.set_window(SalesWindow::new(day(1), day(10)).unwrap());

        assert!(!sales.complete_fetch(ticket, vec![sale("old", 1.0, 1)]));
        assert!(sales.history().is_empty());
        assert_eq!(sales.window().start(), day(1));
    }

    #[test]
    fn test_setting_same_window_keeps_fetch() {
        let sales = store();
        let (ticket, window) = sales.begin_fetch();
        sales.set_window(window);
        assert!(sales.complete_fetch(ticket, vec![]));
    }

    #[test]
    fn test_summary_aggregates_history() {
        let sales = store();
        sales.set_history(vec![sale("1", 10.0, 2), sale("2", 5.0, 1)]);
        let summary = sales.summary();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.items_sold, 3);
        assert!((summary.revenue - 15.0).abs() < f64::EPSILON);
        assert!((summary.average_ticket() - 7.5).abs() < f64::EPSILON);
        assert_eq!(SalesSummary::of(&[]).average_ticket(), 0.0);
    }
}
