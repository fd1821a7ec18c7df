//! Fee calculators: rent adjustment, early-termination penalties and subsidy clawback.

mod calculator;
mod penalties;
mod rent;

pub use calculator::{FeeCalculator, FeeRequest};
pub use penalties::{
    channel_penalty, channel_penalty_amount, mod_penalty, resolve_package, resolve_tier, subsidy_clawback,
};
pub use rent::{rent_adjustment, rent_difference};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::CalculationError;

/// Result type for calculation operations.
pub type Result<T> = std::result::Result<T, CalculationError>;

/// Round half up on `floor(x + 0.5)`: 2.5 -> 3, -2.5 -> -2.
///
/// Values beyond the `i64` range saturate.
pub fn round_half_up(x: Decimal) -> i64 {
    let rounded = x.checked_add(Decimal::new(5, 1)).unwrap_or(x).floor();
    rounded.to_i64().unwrap_or(if rounded.is_sign_negative() { i64::MIN } else { i64::MAX })
}
