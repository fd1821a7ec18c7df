//! Error types for the termcalc-core library.

use thiserror::Error;

use crate::document::DocumentFormat;

/// Main error type for the termcalc library.
#[derive(Error, Debug)]
pub enum TermcalcError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to document text extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// DOCX processing error.
    #[error("DOCX error: {0}")]
    Docx(#[from] DocxError),

    /// Format-specific extraction failed and the plain decode path was used.
    #[error("{format} extraction degraded to plain decode: {reason}")]
    Degraded {
        format: DocumentFormat,
        reason: String,
    },
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors related to DOCX processing.
#[derive(Error, Debug)]
pub enum DocxError {
    /// The zip container could not be read.
    #[error("failed to open archive: {0}")]
    Archive(String),

    /// A required part is missing from the package.
    #[error("missing part: {0}")]
    MissingPart(&'static str),

    /// The document XML is malformed.
    #[error("malformed XML: {0}")]
    Xml(String),
}

/// Errors raised by calculation entry points.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalculationError {
    /// A supplied date does not match `YYYY-MM-DD` or is not a calendar date.
    #[error("invalid date format: {value:?}, use YYYY-MM-DD")]
    InvalidDateFormat { value: String },

    /// The usage window ends before it starts.
    #[error("end date {end} is before start date {start}")]
    InvalidDateRange { start: String, end: String },

    /// Billing cycle id outside 1..=6.
    #[error("unknown billing cycle {0}, expected 1-6")]
    UnknownBillingCycle(u32),

    /// No package price could be resolved.
    #[error("no package price available for {0:?}")]
    UnresolvedPackage(String),

    /// An amount does not fit the numeric range.
    #[error("{0} is out of range")]
    AmountOverflow(&'static str),
}

/// Result type for the termcalc library.
pub type Result<T> = std::result::Result<T, TermcalcError>;
