//! Fee calculation results.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::billing::BillingPeriod;

/// Rent difference accrued over one billing period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodCharge {
    pub label: String,
    pub period: BillingPeriod,
    /// Days of the period inside the usage window.
    pub days: i64,
    pub monthly_diff: Decimal,
    /// Unrounded amount, kept to 4 decimal places.
    pub amount_raw: Decimal,
    pub amount: i64,
}

/// Rent adjustment over every billing period touched by the usage window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RentAdjustment {
    pub per_period: Vec<PeriodCharge>,
    pub total_days: i64,
    pub total_amount: i64,
}

/// How a package name was matched to a parsed price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageStrategy {
    /// Name matched a parsed package exactly.
    Exact,
    /// One name contains the other.
    Containment,
    /// Nothing matched; the first parsed price was used.
    FirstAvailable,
}

/// A resolved package price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMatch {
    pub requested: String,
    pub name: String,
    pub price: i64,
    pub strategy: PackageStrategy,
}

/// Channel/package early-termination penalty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelPenalty {
    /// `None` when the contract lists no package prices.
    pub package: Option<PackageMatch>,
    pub contract_days: i64,
    pub usage_days: i64,
    pub amount: i64,
}

/// Which MOD tier applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModTier {
    Under12Months,
    Under24Months,
}

/// Flat MOD penalty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModPenalty {
    pub tier: Option<ModTier>,
    pub amount: i64,
}

/// How a subsidy tier was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierStrategy {
    /// The caller named the tier.
    Explicit,
    /// The configured default tier was present.
    Preferred,
    /// Neither was available; the first parsed tier was used.
    FirstAvailable,
}

/// A resolved daily subsidy rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierMatch {
    pub tier: String,
    pub daily_rate: Decimal,
    pub strategy: TierStrategy,
}

/// Reclaimed daily subsidy for the unused contract days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsidyClawback {
    /// `None` when the contract lists no daily rates.
    pub tier: Option<TierMatch>,
    pub remaining_days: i64,
    pub amount: i64,
}

/// Combined fee breakdown for one usage window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
    pub billing_cycle: u32,
    pub billing_cycle_start: u32,
    /// `None` means the last day of the month.
    pub billing_cycle_end: Option<u32>,
    pub usage_days: i64,
    pub contract_days: i64,
    pub monthly_rent_diff: Decimal,
    pub rent_adjustment: RentAdjustment,
    pub channel_penalty: ChannelPenalty,
    pub mod_penalty: ModPenalty,
    pub subsidy_clawback: SubsidyClawback,
    pub total_fee: i64,
}
