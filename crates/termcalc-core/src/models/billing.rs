//! Billing period and usage window types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CalculationError;

/// Date format accepted by calculation entry points.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// One billing cycle's calendar span, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BillingPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl BillingPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        debug_assert!(start <= end, "billing period {start}..{end} is inverted");
        Self { start, end }
    }

    /// Calendar days in the period.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn overlaps(&self, window: &UsageWindow) -> bool {
        self.overlap_days(window) > 0
    }

    /// Days shared with the usage window.
    pub fn overlap_days(&self, window: &UsageWindow) -> i64 {
        overlap_days(self.start, self.end, window.start, window.end)
    }

    /// Display label, e.g. `2025-04-06~2025-05-05`.
    pub fn label(&self) -> String {
        format!("{}~{}", self.start, self.end)
    }
}

/// Days shared by two inclusive date ranges, or 0 when they are disjoint.
pub fn overlap_days(a_start: NaiveDate, a_end: NaiveDate, b_start: NaiveDate, b_end: NaiveDate) -> i64 {
    let start = a_start.max(b_start);
    let end = a_end.min(b_end);
    if end < start {
        return 0;
    }
    (end - start).num_days() + 1
}

/// The span a customer actually used the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl UsageWindow {
    /// Create a window, rejecting `end < start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CalculationError> {
        if end < start {
            return Err(CalculationError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Parse a window from two `YYYY-MM-DD` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self, CalculationError> {
        Self::new(parse_iso_date(start)?, parse_iso_date(end)?)
    }

    /// Elapsed days from start to end (end exclusive).
    pub fn usage_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_iso_date(value: &str) -> Result<NaiveDate, CalculationError> {
    NaiveDate::parse_from_str(value.trim(), ISO_DATE_FORMAT).map_err(|_| {
        CalculationError::InvalidDateFormat {
            value: value.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_iso_date("2025-04-11").unwrap(), date(2025, 4, 11));
        assert_eq!(
            parse_iso_date("2025/13/40"),
            Err(CalculationError::InvalidDateFormat {
                value: "2025/13/40".to_string()
            })
        );
        assert!(parse_iso_date("2025-02-30").is_err());
        assert!(parse_iso_date("").is_err());
    }

    #[test]
    fn test_window_rejects_inverted_range() {
        let err = UsageWindow::parse("2025-05-01", "2025-04-30").unwrap_err();
        assert_eq!(
            err,
            CalculationError::InvalidDateRange {
                start: "2025-05-01".to_string(),
                end: "2025-04-30".to_string()
            }
        );
    }

    #[test]
    fn test_usage_days_is_end_exclusive() {
        let window = UsageWindow::parse("2024-01-01", "2024-12-31").unwrap();
        assert_eq!(window.usage_days(), 365);
        let same_day = UsageWindow::parse("2024-01-01", "2024-01-01").unwrap();
        assert_eq!(same_day.usage_days(), 0);
    }

    #[test]
    fn test_overlap_days_inclusive() {
        let period = BillingPeriod::new(date(2025, 4, 6), date(2025, 5, 5));
        let window = UsageWindow::new(date(2025, 5, 1), date(2025, 6, 1)).unwrap();
        assert_eq!(period.overlap_days(&window), 5);
        assert!(period.overlaps(&window));

        let touching = UsageWindow::new(date(2025, 5, 5), date(2025, 5, 5)).unwrap();
        assert_eq!(period.overlap_days(&touching), 1);

        let disjoint = UsageWindow::new(date(2025, 5, 6), date(2025, 6, 1)).unwrap();
        assert_eq!(period.overlap_days(&disjoint), 0);
        assert!(!period.overlaps(&disjoint));
    }

    #[test]
    fn test_period_label_and_days() {
        let period = BillingPeriod::new(date(2024, 2, 1), date(2024, 2, 29));
        assert_eq!(period.label(), "2024-02-01~2024-02-29");
        assert_eq!(period.days(), 29);
    }
}
