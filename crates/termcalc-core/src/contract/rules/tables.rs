//! Whole-text tables: package prices, daily subsidies, duration and MOD penalties.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::models::contract::ModPenalties;

use super::amounts::parse_grouped_integer;
use super::patterns::{
    CONTRACT_TWO_YEARS, DAILY_TIER_AMOUNT, DAILY_WIFI_AMOUNT, MOD_UNDER_12_MONTHS,
    MOD_UNDER_24_MONTHS, PACKAGE_PRICE,
};

/// Contract length in days for a two-year term.
pub const CONTRACT_DAYS_TWO_YEARS: i64 = 730;

/// Literal that marks a two-year contract wherever it appears.
const CONTRACT_DAYS_TOKEN: &str = "730";

/// Key used for the Wi-Fi daily rate.
pub const WIFI_TIER: &str = "WiFi";

/// Package name to price, e.g. `家庭特選餐(3,792元)`. Later names overwrite earlier ones.
pub fn extract_package_amounts(text: &str) -> BTreeMap<String, i64> {
    let mut packages = BTreeMap::new();

    for caps in PACKAGE_PRICE.captures_iter(text) {
        let name = package_name(&caps[1]);
        if name.is_empty() {
            continue;
        }
        if let Some(amount) = parse_grouped_integer(&caps[2]) {
            packages.insert(name.to_string(), amount);
        }
    }

    packages
}

/// The name after the last list or label separator, e.g. `方案：家庭特選餐` -> `家庭特選餐`.
fn package_name(raw: &str) -> &str {
    raw.rsplit(['、', '：', ':', '；', ';', '。'])
        .next()
        .unwrap_or(raw)
        .trim()
}

/// Bandwidth tier (and Wi-Fi) to daily subsidy amount.
pub fn extract_daily_amounts(text: &str) -> BTreeMap<String, Decimal> {
    let mut daily = BTreeMap::new();

    for caps in DAILY_TIER_AMOUNT.captures_iter(text) {
        if let Ok(amount) = Decimal::from_str(&caps[2]) {
            daily.insert(caps[1].to_string(), amount);
        }
    }

    if let Some(caps) = DAILY_WIFI_AMOUNT.captures(text) {
        if let Ok(amount) = Decimal::from_str(&caps[1]) {
            daily.insert(WIFI_TIER.to_string(), amount);
        }
    }

    daily
}

/// Contract length when the text states a two-year term: `730` anywhere, or
/// `2年` / `24個月`.
pub fn infer_contract_days(text: &str) -> Option<i64> {
    if text.contains(CONTRACT_DAYS_TOKEN) || CONTRACT_TWO_YEARS.is_match(text) {
        Some(CONTRACT_DAYS_TWO_YEARS)
    } else {
        None
    }
}

/// Flat MOD penalties for cancelling within 12 or 24 months.
pub fn extract_mod_penalties(text: &str) -> ModPenalties {
    let penalty = |caps: Option<regex::Captures<'_>>| caps.and_then(|c| parse_grouped_integer(&c[1]));

    ModPenalties {
        under_12_months: penalty(MOD_UNDER_12_MONTHS.captures(text)),
        under_24_months: penalty(MOD_UNDER_24_MONTHS.captures(text)),
    }
}
