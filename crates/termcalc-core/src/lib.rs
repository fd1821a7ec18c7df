//! Core library for contract term extraction and early-termination fees.
//!
//! This crate provides:
//! - Document text extraction (PDF, DOCX, plain text with charset detection)
//! - Contract field parsing (dates, package prices, daily subsidies, MOD penalties)
//! - Billing cycle period generation
//! - Fee calculation (rent adjustment, channel penalty, MOD penalty, subsidy clawback)

pub mod billing;
pub mod contract;
pub mod document;
pub mod error;
pub mod fees;
pub mod models;

pub use billing::{generate_periods, BillingCycle};
pub use contract::{parse, ContractParser, HeuristicContractParser, ParseResult};
pub use document::{extract, extract_document, DocumentExtractor, DocumentFormat, ExtractedText, TextExtractor};
pub use error::{CalculationError, ExtractionError, Result, TermcalcError};
pub use fees::{FeeCalculator, FeeRequest};
pub use models::billing::{BillingPeriod, UsageWindow};
pub use models::config::{CalculationConfig, ExtractionConfig, TermcalcConfig};
pub use models::contract::{ClauseGroup, ClauseHit, ModPenalties, ParsedContractFields};
pub use models::fees::FeeResult;
