//! Early-termination penalties and subsidy clawback.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::CalculationError;
use crate::models::contract::ParsedContractFields;
use crate::models::fees::{
    ChannelPenalty, ModPenalty, ModTier, PackageMatch, PackageStrategy, SubsidyClawback, TierMatch,
    TierStrategy,
};

use super::{round_half_up, Result};

/// Match a package name against parsed prices.
///
/// Strategies are tried in order: exact name, containment either way, then the
/// first price in name order. An empty request goes straight to the last one.
pub fn resolve_package(packages: &BTreeMap<String, i64>, requested: &str) -> Result<PackageMatch> {
    let requested = requested.trim();
    let matched = |name: &String, price: &i64, strategy| PackageMatch {
        requested: requested.to_string(),
        name: name.clone(),
        price: *price,
        strategy,
    };

    if !requested.is_empty() {
        if let Some((name, price)) = packages.get_key_value(requested) {
            return Ok(matched(name, price, PackageStrategy::Exact));
        }
        if let Some((name, price)) = packages
            .iter()
            .find(|(name, _)| name.contains(requested) || requested.contains(name.as_str()))
        {
            return Ok(matched(name, price, PackageStrategy::Containment));
        }
    }

    let (name, price) = packages
        .iter()
        .next()
        .ok_or_else(|| CalculationError::UnresolvedPackage(requested.to_string()))?;
    warn!(
        "No package matches {:?}; falling back to {} ({})",
        requested, name, price
    );
    Ok(matched(name, price, PackageStrategy::FirstAvailable))
}

/// `price * u * (C - u) / C^2`, rounded. Zero at both ends of the contract.
///
/// Usage is clamped to `[0, C]`; a non-positive contract length yields 0.
pub fn channel_penalty_amount(price: i64, contract_days: i64, usage_days: i64) -> Result<i64> {
    if contract_days <= 0 {
        return Ok(0);
    }
    let used = Decimal::from(usage_days.clamp(0, contract_days));
    let total = Decimal::from(contract_days);

    let amount = Decimal::from(price)
        .checked_mul(used)
        .and_then(|x| x.checked_mul(total - used))
        .and_then(|x| x.checked_div(total.checked_mul(total)?))
        .ok_or(CalculationError::AmountOverflow("channel penalty"))?;
    Ok(round_half_up(amount))
}

/// Channel package penalty from parsed prices. Returns 0 without prices.
pub fn channel_penalty(
    fields: &ParsedContractFields,
    package_name: Option<&str>,
    contract_days: i64,
    usage_days: i64,
) -> Result<ChannelPenalty> {
    let package = fields
        .package_amounts
        .as_ref()
        .and_then(|packages| resolve_package(packages, package_name.unwrap_or_default()).ok());

    let amount = match &package {
        Some(p) => channel_penalty_amount(p.price, contract_days, usage_days)?,
        None => 0,
    };
    debug!("Channel penalty: {:?} -> {}", package.as_ref().map(|p| &p.name), amount);

    Ok(ChannelPenalty {
        package,
        contract_days,
        usage_days,
        amount,
    })
}

/// Flat MOD penalty for the tier the usage falls in.
pub fn mod_penalty(
    fields: &ParsedContractFields,
    usage_days: i64,
    first_tier_days: i64,
    second_tier_days: i64,
) -> ModPenalty {
    let none = ModPenalty {
        tier: None,
        amount: 0,
    };
    let Some(penalties) = fields.mod_specific.as_ref() else {
        return none;
    };

    match (penalties.under_12_months, penalties.under_24_months) {
        (Some(amount), _) if usage_days < first_tier_days => ModPenalty {
            tier: Some(ModTier::Under12Months),
            amount,
        },
        (_, Some(amount)) if usage_days < second_tier_days => ModPenalty {
            tier: Some(ModTier::Under24Months),
            amount,
        },
        _ => none,
    }
}

/// Pick a daily subsidy rate: the requested tier, the preferred tier, then the
/// first tier in label order.
pub fn resolve_tier(
    daily: &BTreeMap<String, Decimal>,
    requested: Option<&str>,
    preferred: &str,
) -> Option<TierMatch> {
    let matched = |tier: &String, rate: &Decimal, strategy| TierMatch {
        tier: tier.clone(),
        daily_rate: *rate,
        strategy,
    };

    if let Some((tier, rate)) = requested.and_then(|r| daily.get_key_value(r)) {
        return Some(matched(tier, rate, TierStrategy::Explicit));
    }
    if let Some((tier, rate)) = daily.get_key_value(preferred) {
        return Some(matched(tier, rate, TierStrategy::Preferred));
    }

    let (tier, rate) = daily.iter().next()?;
    warn!("Subsidy tier {:?} not found; using {}", requested.unwrap_or(preferred), tier);
    Some(matched(tier, rate, TierStrategy::FirstAvailable))
}

/// Daily subsidy reclaimed for the unused contract days. Returns 0 without rates.
pub fn subsidy_clawback(
    fields: &ParsedContractFields,
    contract_days: i64,
    usage_days: i64,
    requested_tier: Option<&str>,
    preferred_tier: &str,
) -> Result<SubsidyClawback> {
    let remaining_days = contract_days.saturating_sub(usage_days).max(0);
    let tier = fields
        .daily_amounts
        .as_ref()
        .and_then(|daily| resolve_tier(daily, requested_tier, preferred_tier));

    let amount = match &tier {
        Some(t) => t
            .daily_rate
            .checked_mul(Decimal::from(remaining_days))
            .map(round_half_up)
            .ok_or(CalculationError::AmountOverflow("subsidy clawback"))?,
        None => 0,
    };

    Ok(SubsidyClawback {
        tier,
        remaining_days,
        amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use crate::models::contract::ModPenalties;

    fn packages(entries: &[(&str, i64)]) -> BTreeMap<String, i64> {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn rates(entries: &[(&str, i64, u32)]) -> BTreeMap<String, Decimal> {
        entries
            .iter()
            .map(|(k, num, scale)| (k.to_string(), Decimal::new(*num, *scale)))
            .collect()
    }

    #[test]
    fn test_resolve_package_strategies() {
        let table = packages(&[("家庭特選餐", 3792), ("自選餐", 2520)]);

        let exact = resolve_package(&table, "自選餐").unwrap();
        assert_eq!((exact.name.as_str(), exact.strategy), ("自選餐", PackageStrategy::Exact));

        let shorter = resolve_package(&table, "家庭特選").unwrap();
        assert_eq!(shorter.name, "家庭特選餐");
        assert_eq!(shorter.strategy, PackageStrategy::Containment);

        let longer = resolve_package(&table, "MOD家庭特選餐方案").unwrap();
        assert_eq!(longer.price, 3792);
        assert_eq!(longer.strategy, PackageStrategy::Containment);
    }

    #[test]
    fn test_resolve_package_fallback() {
        let table = packages(&[("A餐", 100), ("B餐", 200)]);

        let fallback = resolve_package(&table, "學生優惠").unwrap();
        assert_eq!(fallback.name, "A餐");
        assert_eq!(fallback.strategy, PackageStrategy::FirstAvailable);

        let unnamed = resolve_package(&table, "").unwrap();
        assert_eq!(unnamed.strategy, PackageStrategy::FirstAvailable);
    }

    #[test]
    fn test_resolve_package_without_prices() {
        assert_eq!(
            resolve_package(&BTreeMap::new(), "家庭特選餐"),
            Err(CalculationError::UnresolvedPackage("家庭特選餐".to_string()))
        );
    }

    #[test]
    fn test_channel_penalty_curve() {
        assert_eq!(channel_penalty_amount(3792, 730, 0).unwrap(), 0);
        assert_eq!(channel_penalty_amount(3792, 730, 730).unwrap(), 0);
        // 3792 * 365 * 365 / 730^2
        assert_eq!(channel_penalty_amount(3792, 730, 365).unwrap(), 948);
        assert_eq!(channel_penalty_amount(3792, 730, 29).unwrap(), 145);
        assert_eq!(channel_penalty_amount(3792, 730, 800).unwrap(), 0);
        assert_eq!(channel_penalty_amount(3792, 0, 10).unwrap(), 0);

        for used in 1..730 {
            assert!(channel_penalty_amount(3792, 730, used).unwrap() > 0, "usage {used}");
        }
    }

    #[test]
    fn test_channel_penalty_without_prices() {
        let penalty =
            channel_penalty(&ParsedContractFields::default(), Some("家庭特選餐"), 730, 100).unwrap();
        assert_eq!(penalty.amount, 0);
        assert!(penalty.package.is_none());
    }

    #[test]
    fn test_mod_penalty_tiers() {
        let fields = ParsedContractFields {
            mod_specific: Some(ModPenalties {
                under_12_months: Some(398),
                under_24_months: Some(198),
            }),
            ..Default::default()
        };

        assert_eq!(mod_penalty(&fields, 100, 365, 730).amount, 398);
        assert_eq!(mod_penalty(&fields, 400, 365, 730).tier, Some(ModTier::Under24Months));
        assert_eq!(mod_penalty(&fields, 400, 365, 730).amount, 198);
        assert_eq!(mod_penalty(&fields, 730, 365, 730).amount, 0);
    }

    #[test]
    fn test_mod_penalty_missing_first_tier() {
        let fields = ParsedContractFields {
            mod_specific: Some(ModPenalties {
                under_12_months: None,
                under_24_months: Some(198),
            }),
            ..Default::default()
        };
        assert_eq!(mod_penalty(&fields, 30, 365, 730).amount, 198);
        assert_eq!(mod_penalty(&ParsedContractFields::default(), 30, 365, 730).amount, 0);
    }

    #[test]
    fn test_resolve_tier() {
        let daily = rates(&[("100M/40M", 135, 1), ("300M/300M", 20, 0)]);

        let explicit = resolve_tier(&daily, Some("300M/300M"), "100M/40M").unwrap();
        assert_eq!(explicit.strategy, TierStrategy::Explicit);
        assert_eq!(explicit.daily_rate, Decimal::from(20));

        let preferred = resolve_tier(&daily, Some("1G/1G"), "100M/40M").unwrap();
        assert_eq!(preferred.tier, "100M/40M");
        assert_eq!(preferred.strategy, TierStrategy::Preferred);

        let first = resolve_tier(&rates(&[("WiFi", 15, 1)]), None, "100M/40M").unwrap();
        assert_eq!(first.tier, "WiFi");
        assert_eq!(first.strategy, TierStrategy::FirstAvailable);

        assert!(resolve_tier(&BTreeMap::new(), None, "100M/40M").is_none());
    }

    #[test]
    fn test_subsidy_clawback() {
        let fields = ParsedContractFields {
            daily_amounts: Some(rates(&[("100M/40M", 135, 1)])),
            ..Default::default()
        };

        // 13.5 * 701 = 9463.5
        let clawback = subsidy_clawback(&fields, 730, 29, None, "100M/40M").unwrap();
        assert_eq!(clawback.remaining_days, 701);
        assert_eq!(clawback.amount, 9464);

        let expired = subsidy_clawback(&fields, 730, 900, None, "100M/40M").unwrap();
        assert_eq!(expired.remaining_days, 0);
        assert_eq!(expired.amount, 0);

        assert_eq!(
            subsidy_clawback(&ParsedContractFields::default(), 730, 29, None, "100M/40M")
                .unwrap()
                .amount,
            0
        );
    }

    #[test]
    fn test_huge_contract_length_is_an_error() {
        assert_eq!(
            channel_penalty_amount(3792, i64::MAX, 29),
            Err(CalculationError::AmountOverflow("channel penalty"))
        );

        let fields = ParsedContractFields {
            daily_amounts: Some(BTreeMap::from([("100M/40M".to_string(), Decimal::MAX)])),
            ..Default::default()
        };
        assert_eq!(
            subsidy_clawback(&fields, 730, 29, None, "100M/40M"),
            Err(CalculationError::AmountOverflow("subsidy clawback"))
        );
    }
}
