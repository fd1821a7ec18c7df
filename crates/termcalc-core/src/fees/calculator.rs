//! Combined fee calculation for one usage window.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::billing::BillingCycle;
use crate::error::CalculationError;
use crate::models::billing::UsageWindow;
use crate::models::config::CalculationConfig;
use crate::models::contract::ParsedContractFields;
use crate::models::fees::FeeResult;

use super::{
    channel_penalty, mod_penalty, rent_adjustment, rent_difference, subsidy_clawback, Result,
};

/// Inputs for a fee calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeRequest {
    /// Usage start, `YYYY-MM-DD`.
    pub start_date: String,
    /// Usage end, `YYYY-MM-DD`.
    pub end_date: String,
    /// Billing cycle id, 1-6.
    pub cycle: u32,
    pub new_rent: Decimal,
    pub old_rent: Decimal,
    #[serde(default)]
    pub package_name: Option<String>,
    #[serde(default)]
    pub subsidy_tier: Option<String>,
}

/// Runs every fee calculator against parsed contract fields.
#[derive(Debug, Clone, Default)]
pub struct FeeCalculator {
    config: CalculationConfig,
}

impl FeeCalculator {
    pub fn new(config: CalculationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CalculationConfig {
        &self.config
    }

    /// Validate the request, then compute every fee component.
    ///
    /// Fails on a malformed date, `end < start` or an unknown cycle. A named
    /// package with nothing parsed at all fails with `UnresolvedPackage`, and
    /// amounts outside the numeric range fail with `AmountOverflow`.
    pub fn calculate(&self, request: &FeeRequest, fields: &ParsedContractFields) -> Result<FeeResult> {
        let window = UsageWindow::parse(&request.start_date, &request.end_date)?;
        let cycle = BillingCycle::try_from(request.cycle)?;

        let package_name = request.package_name.as_deref().map(str::trim).filter(|n| !n.is_empty());
        if let Some(name) = package_name {
            if fields.is_empty() {
                return Err(CalculationError::UnresolvedPackage(name.to_string()));
            }
        }

        let usage_days = window.usage_days();
        let contract_days = fields.contract_days.unwrap_or(self.config.default_contract_days);
        debug!(
            "Calculating fees for {}..{} ({} days of {}), {}",
            window.start, window.end, usage_days, contract_days, cycle
        );

        let rent_adjustment = rent_adjustment(
            &window,
            cycle,
            request.new_rent,
            request.old_rent,
            self.config.days_per_month,
        )?;
        let channel_penalty = channel_penalty(fields, package_name, contract_days, usage_days)?;
        let mod_penalty = mod_penalty(
            fields,
            usage_days,
            self.config.mod_first_tier_days,
            self.config.mod_second_tier_days,
        );
        let subsidy_clawback = subsidy_clawback(
            fields,
            contract_days,
            usage_days,
            request.subsidy_tier.as_deref(),
            &self.config.preferred_subsidy_tier,
        )?;

        let total_fee = [channel_penalty.amount, mod_penalty.amount, subsidy_clawback.amount]
            .into_iter()
            .try_fold(rent_adjustment.total_amount, i64::checked_add)
            .ok_or(CalculationError::AmountOverflow("total fee"))?;
        info!(
            "Fees: rent {} + channel {} + MOD {} + subsidy {} = {}",
            rent_adjustment.total_amount,
            channel_penalty.amount,
            mod_penalty.amount,
            subsidy_clawback.amount,
            total_fee
        );

        Ok(FeeResult {
            package_name: channel_penalty
                .package
                .as_ref()
                .map(|p| p.name.clone())
                .or_else(|| package_name.map(str::to_string)),
            billing_cycle: cycle.id(),
            billing_cycle_start: cycle.start_day(),
            billing_cycle_end: cycle.end_day(),
            usage_days,
            contract_days,
            monthly_rent_diff: rent_difference(request.new_rent, request.old_rent)?,
            rent_adjustment,
            channel_penalty,
            mod_penalty,
            subsidy_clawback,
            total_fee,
        })
    }
}
