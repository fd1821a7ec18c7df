//! Structured fields parsed from contract text.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Keyword group used to tag contract clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClauseGroup {
    /// Channel package clauses (自選餐, 家庭特選餐, ...).
    Package,
    /// Media-on-demand clauses.
    Mod,
    /// Subsidy and daily discount clauses.
    Subsidy,
    /// Circuit / bandwidth clauses.
    Circuit,
    /// Internet access fee clauses.
    Internet,
    /// Penalty and early termination clauses.
    Penalty,
}

impl ClauseGroup {
    /// All groups in evaluation order.
    pub const ALL: [ClauseGroup; 6] = [
        ClauseGroup::Package,
        ClauseGroup::Mod,
        ClauseGroup::Subsidy,
        ClauseGroup::Circuit,
        ClauseGroup::Internet,
        ClauseGroup::Penalty,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Package => "package",
            Self::Mod => "mod",
            Self::Subsidy => "subsidy",
            Self::Circuit => "circuit",
            Self::Internet => "internet",
            Self::Penalty => "penalty",
        }
    }
}

impl fmt::Display for ClauseGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A clause that matched a keyword group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClauseHit {
    /// Clause text.
    pub text: String,
    /// First money amount in the clause.
    pub amount: Option<Decimal>,
    /// First percentage in the clause.
    pub pct: Option<Decimal>,
}

/// Flat MOD early-termination penalties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModPenalties {
    /// Penalty when cancelled within the first 12 months.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub under_12_months: Option<i64>,
    /// Penalty when cancelled within the first 24 months.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub under_24_months: Option<i64>,
}

impl ModPenalties {
    pub fn is_empty(&self) -> bool {
        self.under_12_months.is_none() && self.under_24_months.is_none()
    }
}

/// Fields recovered from one contract.
///
/// A `None` field was not found in the document; it never means zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedContractFields {
    /// Calendar dates mentioned anywhere in the text, ascending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dates: Option<Vec<NaiveDate>>,

    /// Package name to cancellation fee.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_amounts: Option<BTreeMap<String, i64>>,

    /// Bandwidth tier label to daily subsidy amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_amounts: Option<BTreeMap<String, Decimal>>,

    /// Contract length in days.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_days: Option<i64>,

    /// Flat MOD penalties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mod_specific: Option<ModPenalties>,

    /// Clause hits per keyword group, in document order. Each group is a
    /// top-level key beside the fields above.
    #[serde(flatten)]
    pub clauses: BTreeMap<ClauseGroup, Vec<ClauseHit>>,
}

impl ParsedContractFields {
    /// Clause hits recorded for a group.
    pub fn hits(&self, group: ClauseGroup) -> &[ClauseHit] {
        self.clauses.get(&group).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether nothing at all was recognised.
    pub fn is_empty(&self) -> bool {
        self.dates.is_none()
            && self.package_amounts.is_none()
            && self.daily_amounts.is_none()
            && self.contract_days.is_none()
            && self.mod_specific.is_none()
            && self.clauses.is_empty()
    }

    /// Load fields previously written as JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
