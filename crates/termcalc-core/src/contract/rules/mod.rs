//! Rule-based field extractors for contract text.

pub mod amounts;
pub mod clauses;
pub mod dates;
pub mod patterns;
pub mod tables;
pub mod text;

pub use amounts::{find_money, find_percentage, parse_grouped_integer, MoneyExtractor, PercentageExtractor};
pub use clauses::{ClauseRule, ClauseTagger};
pub use dates::{extract_dates, DateExtractor, DateNotation};
pub use tables::{
    extract_daily_amounts, extract_mod_penalties, extract_package_amounts, infer_contract_days,
    CONTRACT_DAYS_TWO_YEARS,
};
pub use text::{normalize, split_clauses};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// An extracted value with the text it came from.
#[derive(Debug, Clone)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
