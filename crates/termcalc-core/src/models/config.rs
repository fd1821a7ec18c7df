//! Configuration structures for extraction and fee calculation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::contract::ClauseGroup;
use crate::error::TermcalcError;

/// Main configuration for termcalc.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TermcalcConfig {
    /// Document extraction and parsing configuration.
    pub extraction: ExtractionConfig,

    /// Fee calculation configuration.
    pub calculation: CalculationConfig,
}

/// Document extraction and parsing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Top-level domain hint for plain-text charset detection.
    pub encoding_hint: Option<String>,

    /// Maximum PDF pages to read (0 = unlimited).
    pub pdf_max_pages: usize,

    /// Extra trigger strings per clause group, added to the built-in ones.
    pub extra_triggers: BTreeMap<ClauseGroup, Vec<String>>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            encoding_hint: Some("tw".to_string()),
            pdf_max_pages: 0,
            extra_triggers: BTreeMap::new(),
        }
    }
}

/// Fee calculation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationConfig {
    /// Contract length used when the document states none.
    pub default_contract_days: i64,

    /// Divisor turning a monthly rent difference into a daily one.
    pub days_per_month: i64,

    /// Subsidy tier used when the caller names none.
    pub preferred_subsidy_tier: String,

    /// Usage below this many days selects the 12-month MOD penalty.
    pub mod_first_tier_days: i64,

    /// Usage below this many days selects the 24-month MOD penalty.
    pub mod_second_tier_days: i64,
}

impl Default for CalculationConfig {
    fn default() -> Self {
        Self {
            default_contract_days: 730,
            days_per_month: 30,
            preferred_subsidy_tier: "100M/40M".to_string(),
            mod_first_tier_days: 365,
            mod_second_tier_days: 730,
        }
    }
}

impl TermcalcConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| TermcalcError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| TermcalcError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: TermcalcConfig =
            serde_json::from_str(r#"{"calculation": {"default_contract_days": 365}}"#).unwrap();

        assert_eq!(config.calculation.default_contract_days, 365);
        assert_eq!(config.calculation.days_per_month, 30);
        assert_eq!(config.extraction, ExtractionConfig::default());
    }

    #[test]
    fn test_extra_triggers_keys() {
        let config: TermcalcConfig = serde_json::from_str(
            r#"{"extraction": {"extra_triggers": {"penalty": ["賠償金"]}}}"#,
        )
        .unwrap();

        assert_eq!(
            config.extraction.extra_triggers.get(&ClauseGroup::Penalty),
            Some(&vec!["賠償金".to_string()])
        );
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = TermcalcConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, TermcalcError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = TermcalcConfig::from_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, TermcalcError::Io(_)));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut config = TermcalcConfig::default();
        config.calculation.days_per_month = 31;

        config.save(&path).unwrap();
        assert_eq!(TermcalcConfig::from_file(&path).unwrap(), config);
    }
}
