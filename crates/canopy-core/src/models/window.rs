use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{CanopyError, Result};

/// Inclusive date window with `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateWindow")]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateWindow> for DateWindow {
    type Error = CanopyError;

    fn try_from(raw: RawDateWindow) -> Result<Self> {
        DateWindow::new(raw.start, raw.end)
    }
}

impl DateWindow {
    /// Create a window, rejecting `start > end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(CanopyError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Single-day window
    pub fn single(date: NaiveDate) -> Self {
        Self { start: date, end: date }
    }

    /// Window of `days` days starting at `start`
    pub fn starting_at(start: NaiveDate, days: i64) -> Self {
        Self { start, end: start + Duration::days(days.max(0)) }
    }

    /// Window of `days` days ending at `end`
    pub fn ending_at(end: NaiveDate, days: i64) -> Self {
        Self { start: end - Duration::days(days.max(0)), end }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days between start and end (0 for a single-day window)
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Date halfway through the window
    pub fn midpoint(&self) -> NaiveDate {
        self.start + Duration::days(self.days() / 2)
    }

    /// Restrict this window to the bounds of `other`.
    ///
    /// Returns `None` when the two windows do not overlap.
    pub fn clamp_to(&self, other: &DateWindow) -> Option<DateWindow> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        DateWindow::new(start, end).ok()
    }
}

impl std::fmt::Display for DateWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_validation() {
        assert!(DateWindow::new(date(2024, 1, 1), date(2024, 1, 31)).is_ok());
        assert!(DateWindow::new(date(2024, 1, 1), date(2024, 1, 1)).is_ok());
        assert!(matches!(
            DateWindow::new(date(2024, 2, 1), date(2024, 1, 1)),
            Err(CanopyError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_days_and_contains() {
        let window = DateWindow::new(date(2023, 6, 1), date(2024, 6, 1)).unwrap();
        assert_eq!(window.days(), 366);
        assert!(window.contains(date(2024, 2, 29)));
        assert!(!window.contains(date(2024, 6, 2)));
        assert_eq!(DateWindow::single(date(2024, 1, 1)).days(), 0);
    }

    #[test]
    fn test_clamp_to() {
        let project = DateWindow::new(date(2024, 1, 1), date(2024, 3, 1)).unwrap();
        let around_start = DateWindow::new(date(2023, 12, 2), date(2024, 1, 31)).unwrap();
        let clamped = around_start.clamp_to(&project).unwrap();
        assert_eq!(clamped.start(), date(2024, 1, 1));
        assert_eq!(clamped.end(), date(2024, 1, 31));

        let disjoint = DateWindow::new(date(2025, 1, 1), date(2025, 2, 1)).unwrap();
        assert!(disjoint.clamp_to(&project).is_none());
    }

    #[test]
    fn test_serde_validates() {
        let ok: DateWindow =
            serde_json::from_str(r#"{"start":"2024-01-01","end":"2024-01-31"}"#).unwrap();
        assert_eq!(ok.days(), 30);
        assert!(serde_json::from_str::<DateWindow>(r#"{"start":"2024-02-01","end":"2024-01-01"}"#)
            .is_err());
    }
}
