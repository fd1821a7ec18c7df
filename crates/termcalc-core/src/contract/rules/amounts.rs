//! Money and percentage extraction from contract clauses.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{MONEY, PERCENTAGE};
use super::{ExtractionMatch, FieldExtractor};

/// Money extractor.
///
/// Takes the first number in the text, with or without a currency marker.
/// A clause holding a date before its fee yields the date's digits; the
/// pattern cannot tell them apart.
pub struct MoneyExtractor;

impl MoneyExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MoneyExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for MoneyExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    /// Positions refer to the text with thousands separators removed.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let cleaned = strip_thousands_separators(text);
        let mut results = Vec::new();

        for caps in MONEY.captures_iter(&cleaned) {
            if let (Ok(amount), Some(full_match)) = (Decimal::from_str(&caps[1]), caps.get(0)) {
                results.push(
                    ExtractionMatch::new(amount, full_match.as_str().trim_end())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        results
    }
}

/// Percentage extractor. Whitespace is removed before matching.
pub struct PercentageExtractor;

impl PercentageExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PercentageExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PercentageExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let compact: String = text.split_whitespace().collect();

        PERCENTAGE
            .captures_iter(&compact)
            .filter_map(|caps| {
                let amount = Decimal::from_str(&caps[1]).ok()?;
                Some(ExtractionMatch::new(amount, &caps[0]))
            })
            .collect()
    }
}

/// First money amount in a clause, e.g. `3,792元` -> 3792.
pub fn find_money(text: &str) -> Option<Decimal> {
    MoneyExtractor::new().extract(text).map(|m| m.value)
}

/// First percentage in a clause, e.g. `違約金為 15% ` -> 15.
pub fn find_percentage(text: &str) -> Option<Decimal> {
    PercentageExtractor::new().extract(text).map(|m| m.value)
}

/// Parse an integer written with optional thousands separators, e.g. `3,792`.
pub fn parse_grouped_integer(s: &str) -> Option<i64> {
    strip_thousands_separators(s).trim().parse().ok()
}

fn strip_thousands_separators(s: &str) -> String {
    s.replace([',', '，'], "")
}
