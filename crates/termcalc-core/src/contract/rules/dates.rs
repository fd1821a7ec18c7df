//! Date recognition for contract text.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use regex::Regex;

use super::patterns::{DATE_CHINESE, DATE_NUMERIC, DATE_REPUBLIC};
use super::{ExtractionMatch, FieldExtractor};

/// Years below this are Republic-calendar years.
const REPUBLIC_YEAR_LIMIT: i32 = 1900;

/// Offset from a Republic-calendar year to the Gregorian year.
const REPUBLIC_YEAR_OFFSET: i32 = 1911;

/// Notation a date was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateNotation {
    /// `2025/04/11`, `2025-04-11`, `2025.04.11`
    Numeric,
    /// `2025年4月11日`, `114年4月11日`
    Chinese,
    /// `114/04/11`
    Republic,
}

impl DateNotation {
    fn pattern(&self) -> &'static Regex {
        match self {
            Self::Numeric => &DATE_NUMERIC,
            Self::Chinese => &DATE_CHINESE,
            Self::Republic => &DATE_REPUBLIC,
        }
    }
}

/// Date field extractor covering every supported notation.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_notation(&self, text: &str, notation: DateNotation) -> Vec<ExtractionMatch<NaiveDate>> {
        let mut results = Vec::new();

        for caps in notation.pattern().captures_iter(text) {
            let (Some(first), Some(last)) = (caps.get(1), caps.get(0)) else {
                continue;
            };
            // 2025/04/113 is not 2025/04/11
            let runs_on = text[last.end()..].starts_with(|c: char| c.is_ascii_digit());
            if runs_on && notation != DateNotation::Chinese {
                continue;
            }

            let year: i32 = caps[1].parse().unwrap_or(0);
            let month: u32 = caps[2].parse().unwrap_or(0);
            let day: u32 = caps[3].parse().unwrap_or(0);

            let year = match notation {
                DateNotation::Numeric => year,
                DateNotation::Chinese | DateNotation::Republic => to_gregorian_year(year),
            };

            // Impossible dates such as 04/31 are dropped
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                let source = &text[first.start()..last.end()];
                results.push(
                    ExtractionMatch::new(date, source).with_position(first.start(), last.end()),
                );
            }
        }

        results
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<NaiveDate>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text)
            .into_iter()
            .min_by_key(|m| m.position.map(|(start, _)| start))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<Self::Output> = Vec::new();

        for notation in [DateNotation::Numeric, DateNotation::Chinese, DateNotation::Republic] {
            for found in self.extract_notation(text, notation) {
                // The Republic pattern also sees four-digit Gregorian dates
                if results.iter().any(|r| r.position == found.position) {
                    continue;
                }
                results.push(found);
            }
        }

        results
    }
}

/// Convert a Republic-calendar year; Gregorian years pass through.
pub fn to_gregorian_year(year: i32) -> i32 {
    if year < REPUBLIC_YEAR_LIMIT {
        year + REPUBLIC_YEAR_OFFSET
    } else {
        year
    }
}

/// All distinct dates in the text, ascending.
pub fn extract_dates(text: &str) -> Vec<NaiveDate> {
    let dates: BTreeSet<NaiveDate> = DateExtractor::new()
        .extract_all(text)
        .into_iter()
        .map(|m| m.value)
        .collect();
    dates.into_iter().collect()
}
