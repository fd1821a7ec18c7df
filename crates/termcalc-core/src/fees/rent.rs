//! Prorated rent difference over billing periods.

use rust_decimal::Decimal;
use tracing::debug;

use crate::billing::BillingCycle;
use crate::error::CalculationError;
use crate::models::billing::UsageWindow;
use crate::models::fees::{PeriodCharge, RentAdjustment};

use super::{round_half_up, Result};

const DEFAULT_DAYS_PER_MONTH: i64 = 30;

/// Accrue `(new_rent - old_rent) * days / days_per_month` for every billing
/// period the window touches. Each period is rounded on its own.
pub fn rent_adjustment(
    window: &UsageWindow,
    cycle: BillingCycle,
    new_rent: Decimal,
    old_rent: Decimal,
    days_per_month: i64,
) -> Result<RentAdjustment> {
    let monthly_diff = rent_difference(new_rent, old_rent)?;
    let divisor = Decimal::from(if days_per_month > 0 {
        days_per_month
    } else {
        DEFAULT_DAYS_PER_MONTH
    });

    let mut adjustment = RentAdjustment::default();
    for period in cycle.periods(window.start, window.end) {
        let days = period.overlap_days(window);
        if days <= 0 {
            continue;
        }

        let amount_raw = monthly_diff
            .checked_mul(Decimal::from(days))
            .and_then(|x| x.checked_div(divisor))
            .ok_or(CalculationError::AmountOverflow("rent adjustment"))?;
        let amount = round_half_up(amount_raw);
        debug!("{}: {} days, {} -> {}", period.label(), days, amount_raw, amount);

        adjustment.total_days += days;
        adjustment.total_amount = adjustment
            .total_amount
            .checked_add(amount)
            .ok_or(CalculationError::AmountOverflow("rent adjustment"))?;
        adjustment.per_period.push(PeriodCharge {
            label: period.label(),
            period,
            days,
            monthly_diff,
            amount_raw: amount_raw.round_dp(4),
            amount,
        });
    }

    Ok(adjustment)
}

/// `new_rent - old_rent`, failing instead of overflowing.
pub fn rent_difference(new_rent: Decimal, old_rent: Decimal) -> Result<Decimal> {
    new_rent
        .checked_sub(old_rent)
        .ok_or(CalculationError::AmountOverflow("monthly rent difference"))
}
