//! Billing period generation over a usage window.

use chrono::{Datelike, Months, NaiveDate};
use tracing::trace;

use crate::error::CalculationError;
use crate::models::billing::{overlap_days, BillingPeriod};

use super::BillingCycle;

/// Last calendar day of a month, or `None` for an invalid year/month.
pub fn month_end_day(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = first.checked_add_months(Months::new(1))?;
    next.pred_opt().map(|last| last.day())
}

/// Billing periods of a cycle id that overlap `[start, end]`.
pub fn generate_periods(
    start: NaiveDate,
    end: NaiveDate,
    cycle: u32,
) -> Result<Vec<BillingPeriod>, CalculationError> {
    let cycle = BillingCycle::try_from(cycle)?;
    Ok(cycle.periods(start, end))
}

impl BillingCycle {
    /// Consecutive periods overlapping `[start, end]`, in order.
    pub fn periods(&self, start: NaiveDate, end: NaiveDate) -> Vec<BillingPeriod> {
        let periods = match self.end_day() {
            None => calendar_months(start, end),
            Some(end_day) => anchored_periods(start, end, self.start_day(), end_day),
        };

        let periods: Vec<BillingPeriod> = periods
            .into_iter()
            .filter(|p| overlap_days(p.start, p.end, start, end) > 0)
            .collect();
        trace!("{}: {} periods for {}..{}", self, periods.len(), start, end);
        periods
    }
}

fn calendar_months(start: NaiveDate, end: NaiveDate) -> Vec<BillingPeriod> {
    let mut periods = Vec::new();
    let Some(mut month_start) = start.with_day(1) else {
        return periods;
    };

    while month_start <= end {
        let Some(next) = month_start.checked_add_months(Months::new(1)) else {
            break;
        };
        let Some(month_end) = next.pred_opt() else {
            break;
        };
        periods.push(BillingPeriod::new(month_start, month_end));
        month_start = next;
    }

    periods
}

/// The period holding `date`: it began this month when the day is at or past
/// the start anchor, otherwise last month.
fn period_containing(date: NaiveDate, start_day: u32, end_day: u32) -> Option<BillingPeriod> {
    let anchor = date.with_day(start_day)?;
    let period_start = if date.day() >= start_day {
        anchor
    } else {
        anchor.checked_sub_months(Months::new(1))?
    };
    anchored_period(period_start, end_day)
}

fn anchored_period(period_start: NaiveDate, end_day: u32) -> Option<BillingPeriod> {
    let period_end = period_start
        .checked_add_months(Months::new(1))?
        .with_day(end_day)?;
    Some(BillingPeriod::new(period_start, period_end))
}

fn anchored_periods(start: NaiveDate, end: NaiveDate, start_day: u32, end_day: u32) -> Vec<BillingPeriod> {
    let mut periods = Vec::new();
    let mut current = period_containing(start, start_day, end_day);

    while let Some(period) = current {
        if period.start > end {
            break;
        }
        periods.push(period);
        current = period
            .start
            .checked_add_months(Months::new(1))
            .and_then(|next_start| anchored_period(next_start, end_day));
    }

    periods
}
