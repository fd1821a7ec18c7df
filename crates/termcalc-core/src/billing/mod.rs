//! Billing cycles and the periods they cut a usage window into.

mod cycle;
mod periods;

pub use cycle::BillingCycle;
pub use periods::{generate_periods, month_end_day};
