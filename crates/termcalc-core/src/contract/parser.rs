//! Heuristic contract parser built from the rule extractors.

use std::time::Instant;

use tracing::{debug, info};

use crate::models::config::ExtractionConfig;
use crate::models::contract::{ClauseGroup, ParsedContractFields};

use super::rules::{
    extract_daily_amounts, extract_dates, extract_mod_penalties, extract_package_amounts,
    infer_contract_days, normalize, split_clauses, ClauseTagger,
};

/// Result of parsing one contract.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Recognised fields.
    pub fields: ParsedContractFields,
    /// Text after normalization.
    pub normalized_text: String,
    /// Number of clauses the text was split into.
    pub clause_count: usize,
    /// Fields that callers usually need but were not found.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for contract parsing.
pub trait ContractParser {
    /// Parse contract text. Never fails; unrecognised fields are left empty.
    fn parse(&self, text: &str) -> ParseResult;
}

/// Rule-based contract parser.
#[derive(Debug, Clone, Default)]
pub struct HeuristicContractParser {
    tagger: ClauseTagger,
}

impl HeuristicContractParser {
    /// Create a parser with the built-in keyword table.
    pub fn new() -> Self {
        Self {
            tagger: ClauseTagger::new(),
        }
    }

    /// Create a parser with the extra triggers from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        config
            .extra_triggers
            .iter()
            .fold(Self::new(), |parser, (group, triggers)| {
                parser.with_triggers(*group, triggers.iter().cloned())
            })
    }

    /// Add trigger strings to a clause group.
    pub fn with_triggers<I, S>(mut self, group: ClauseGroup, triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tagger = self.tagger.with_triggers(group, triggers);
        self
    }

    pub fn tagger(&self) -> &ClauseTagger {
        &self.tagger
    }

    fn parse_fields(&self, text: &str, clauses: &[String]) -> ParsedContractFields {
        let mut fields = ParsedContractFields::default();

        let dates = extract_dates(text);
        debug!("Found {} dates", dates.len());
        if !dates.is_empty() {
            fields.dates = Some(dates);
        }

        fields.clauses = self.tagger.tag(clauses);
        for (group, hits) in &fields.clauses {
            debug!("Clause group {}: {} hits", group, hits.len());
        }

        let packages = extract_package_amounts(text);
        debug!("Found {} package prices", packages.len());
        if !packages.is_empty() {
            fields.package_amounts = Some(packages);
        }

        let daily = extract_daily_amounts(text);
        debug!("Found {} daily subsidy rates", daily.len());
        if !daily.is_empty() {
            fields.daily_amounts = Some(daily);
        }

        fields.contract_days = infer_contract_days(text);

        let mod_penalties = extract_mod_penalties(text);
        if !mod_penalties.is_empty() {
            fields.mod_specific = Some(mod_penalties);
        }

        fields
    }
}

impl ContractParser for HeuristicContractParser {
    fn parse(&self, text: &str) -> ParseResult {
        let start = Instant::now();

        let normalized_text = normalize(text);
        let clauses = split_clauses(&normalized_text);
        let fields = self.parse_fields(&normalized_text, &clauses);

        let mut warnings = Vec::new();
        if fields.package_amounts.is_none() {
            warnings.push("No package prices found".to_string());
        }
        if fields.contract_days.is_none() {
            warnings.push("No contract duration found".to_string());
        }
        if fields.dates.is_none() {
            warnings.push("No dates found".to_string());
        }

        let processing_time_ms = start.elapsed().as_millis() as u64;
        info!(
            "Parsed contract: {} clauses, {} tagged groups in {}ms",
            clauses.len(),
            fields.clauses.len(),
            processing_time_ms
        );

        ParseResult {
            fields,
            normalized_text,
            clause_count: clauses.len(),
            warnings,
            processing_time_ms,
        }
    }
}

/// Parse contract text with the default parser.
pub fn parse(text: &str) -> ParsedContractFields {
    HeuristicContractParser::new().parse(text).fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::collections::BTreeMap;

    use crate::models::contract::ModPenalties;

    const SAMPLE: &str = "中華電信MOD服務契約\r\n\
        申請日期：114/04/11\r\n\
        適用方案：家庭特選餐(3,792元)，合約期間2年。\r\n\
        MOD影劇館未租滿12個月者，解約金398元；\r\n\
        提前解約者，違約金依未到期日數比例計收15%。\r\n\
        每日優惠金額：100M/40M 13.5元\r\n";

    #[test]
    fn test_parse_package_and_duration() {
        let fields = parse("家庭特選餐(3,792元)，合約期間2年");

        assert_eq!(
            fields.package_amounts,
            Some(BTreeMap::from([("家庭特選餐".to_string(), 3792)]))
        );
        assert_eq!(fields.contract_days, Some(730));
    }

    #[test]
    fn test_duration_ignores_thousands_separators() {
        assert_eq!(parse("月租1730元").contract_days, Some(730));
        assert_eq!(parse("月租1,730元").contract_days, Some(730));
    }

    #[test]
    fn test_parse_full_contract() {
        let result = HeuristicContractParser::new().parse(SAMPLE);
        let fields = &result.fields;

        assert_eq!(fields.dates, Some(vec![NaiveDate::from_ymd_opt(2025, 4, 11).unwrap()]));
        assert_eq!(fields.contract_days, Some(730));
        assert_eq!(
            fields.mod_specific,
            Some(ModPenalties {
                under_12_months: Some(398),
                under_24_months: None,
            })
        );
        assert_eq!(
            fields.daily_amounts.as_ref().and_then(|d| d.get("100M/40M")).copied(),
            Some(Decimal::new(135, 1))
        );

        let penalty = fields.hits(ClauseGroup::Penalty);
        assert_eq!(penalty.len(), 1);
        assert_eq!(penalty[0].pct, Some(Decimal::from(15)));

        assert!(!fields.hits(ClauseGroup::Mod).is_empty());
        assert!(result.warnings.is_empty());
        assert!(!result.normalized_text.contains('\r'));
    }

    #[test]
    fn test_parse_empty_text() {
        let result = HeuristicContractParser::new().parse("");

        assert!(result.fields.is_empty());
        assert_eq!(result.clause_count, 0);
        assert_eq!(result.warnings.len(), 3);
    }

    #[test]
    fn test_extra_triggers_from_config() {
        let mut config = ExtractionConfig::default();
        config
            .extra_triggers
            .insert(ClauseGroup::Internet, vec!["寬頻".to_string()]);

        let parser = HeuristicContractParser::from_config(&config);
        let fields = parser.parse("寬頻月租599元").fields;

        assert_eq!(fields.hits(ClauseGroup::Internet)[0].amount, Some(Decimal::from(599)));
    }
}
