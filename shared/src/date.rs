//! Date handling
//!
//! - `Clock`: injectable date source, so "today" can be pinned in tests
//! - `SalesWindow`: validated calendar-date range used by the sales screens

use chrono::{DateTime, Days, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// ISO calendar-date format used on the wire and in query strings.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

// =========================================================
// Clock
// =========================================================

/// Source of the current date and time.
pub trait Clock {
    /// Current instant, used for cookie issuance.
    fn now(&self) -> DateTime<Utc>;

    /// Current local calendar date.
    fn today(&self) -> NaiveDate;
}

/// Wall clock of the host (browser or worker).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
    today: NaiveDate,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            today: now.date_naive(),
        }
    }

    /// Frozen at midnight UTC of `today`.
    pub fn on(today: NaiveDate) -> Self {
        Self {
            now: today.and_time(chrono::NaiveTime::MIN).and_utc(),
            today,
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}

// =========================================================
// SalesWindow
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SalesWindowError {
    #[error("invalid calendar date `{0}`, expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("start date {start} is after end date {end}")]
    Inverted { start: NaiveDate, end: NaiveDate },
}

/// Contiguous range of calendar dates, `start <= end`, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWindow")]
pub struct SalesWindow {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawWindow> for SalesWindow {
    type Error = SalesWindowError;

    fn try_from(raw: RawWindow) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl SalesWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, SalesWindowError> {
        if start > end {
            return Err(SalesWindowError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// Yesterday..today according to `clock`.
    pub fn default_for(clock: &impl Clock) -> Self {
        let today = clock.today();
        let start = today.checked_sub_days(Days::new(1)).unwrap_or(today);
        Self { start, end: today }
    }

    /// Parses two `YYYY-MM-DD` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self, SalesWindowError> {
        Self::new(parse_iso_date(start)?, parse_iso_date(end)?)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns a window with a new start, keeping the end.
    pub fn with_start(&self, start: NaiveDate) -> Result<Self, SalesWindowError> {
        Self::new(start, self.end)
    }

    /// Returns a window with a new end, keeping the start.
    pub fn with_end(&self, end: NaiveDate) -> Result<Self, SalesWindowError> {
        Self::new(self.start, end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days covered (at least 1).
    pub fn days(&self) -> u64 {
        (self.end - self.start).num_days() as u64 + 1
    }

    pub fn start_iso(&self) -> String {
        self.start.format(ISO_DATE_FORMAT).to_string()
    }

    pub fn end_iso(&self) -> String {
        self.end.format(ISO_DATE_FORMAT).to_string()
    }

    /// `from=YYYY-MM-DD&to=YYYY-MM-DD`
    pub fn to_query(&self) -> String {
        format!("from={}&to={}", self.start_iso(), self.end_iso())
    }
}

pub fn parse_iso_date(s: &str) -> Result<NaiveDate, SalesWindowError> {
    NaiveDate::parse_from_str(s.trim(), ISO_DATE_FORMAT)
        .map_err(|_| SalesWindowError::InvalidDate(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_window_is_yesterday_to_today() {
        let clock = FixedClock::on(date(2024, 3, 1));
        let window = SalesWindow::default_for(&clock);

        assert_eq!(window.start_iso(), "2024-02-29");
        assert_eq!(window.end_iso(), "2024-03-01");
        assert_eq!(window.days(), 2);
    }

    #[test]
    fn test_default_window_across_year_boundary() {
        let window = SalesWindow::default_for(&FixedClock::on(date(2025, 1, 1)));
        assert_eq!(window.start(), date(2024, 12, 31));
        assert_eq!(window.end(), date(2025, 1, 1));
    }

    #[test]
    fn test_inverted_window_rejected() {
        let err = SalesWindow::new(date(2024, 5, 2), date(2024, 5, 1)).unwrap_err();
        assert!(matches!(err, SalesWindowError::Inverted { .. }));
    }

    #[test]
    fn test_single_day_window_allowed() {
        let window = SalesWindow::parse("2024-05-01", "2024-05-01").unwrap();
        assert_eq!(window.days(), 1);
        assert!(window.contains(date(2024, 5, 1)));
        assert!(!window.contains(date(2024, 5, 2)));
    }

    #[test]
    fn test_parse_rejects_invalid_dates() {
        assert!(matches!(
            SalesWindow::parse("2024-02-30", "2024-03-01"),
            Err(SalesWindowError::InvalidDate(_))
        ));
        assert!(SalesWindow::parse("03/01/2024", "2024-03-01").is_err());
    }

    #[test]
    fn test_with_start_keeps_invariant() {
        let window = SalesWindow::parse("2024-05-01", "2024-05-10").unwrap();
        assert!(window.with_start(date(2024, 5, 11)).is_err());
        assert_eq!(
            window.with_end(date(2024, 5, 20)).unwrap().end_iso(),
            "2024-05-20"
        );
    }

    #[test]
    fn test_query_string() {
        let window = SalesWindow::parse("2024-05-01", "2024-05-10").unwrap();
        assert_eq!(window.to_query(), "from=2024-05-01&to=2024-05-10");
    }

    #[test]
    fn test_deserialize_validates_order() {
        let ok: SalesWindow =
            serde_json::from_str(r#"{"start":"2024-05-01","end":"2024-05-02"}"#).unwrap();
        assert_eq!(ok.days(), 2);

        let bad = serde_json::from_str::<SalesWindow>(r#"{"start":"2024-05-03","end":"2024-05-02"}"#);
        assert!(bad.is_err());
    }
}
