//! Document text extraction module.
//!
//! Converts raw document bytes into plain text. The format is chosen from the
//! filename suffix; when a structured format cannot be read the bytes are
//! decoded as plain text instead, so extraction always yields some string.

mod docx;
mod pdf;
mod plain;

pub use docx::DocxExtractor;
pub use pdf::{LoadedPdf, PdfExtractor};
pub use plain::{DecodedText, PlainTextDecoder};

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for format-specific text extractors.
pub trait TextExtractor {
    /// Extract plain text from an in-memory document.
    fn extract_text(&self, data: &[u8]) -> Result<String>;
}

/// Document format, derived from the filename suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    /// Plain text, CSV, or anything unrecognised.
    PlainText,
}

impl DocumentFormat {
    /// Pick a format from a filename (case-insensitive suffix match).
    pub fn from_filename(filename: &str) -> Self {
        let lower = filename.to_lowercase();
        if lower.ends_with(".pdf") {
            Self::Pdf
        } else if lower.ends_with(".docx") {
            Self::Docx
        } else {
            Self::PlainText
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pdf => write!(f, "PDF"),
            Self::Docx => write!(f, "DOCX"),
            Self::PlainText => write!(f, "plain text"),
        }
    }
}

/// Text recovered from a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedText {
    /// Extracted text.
    pub text: String,
    /// Format selected from the filename.
    pub format: DocumentFormat,
    /// Encoding used when the bytes were decoded as plain text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    /// Set when format-specific extraction failed and plain decode was used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded: Option<String>,
}

impl ExtractedText {
    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }
}

/// Format-dispatching extractor.
pub struct DocumentExtractor {
    pdf: PdfExtractor,
    docx: DocxExtractor,
    plain: PlainTextDecoder,
}

impl DocumentExtractor {
    /// Create an extractor with default settings.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Create an extractor from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            pdf: PdfExtractor::new().with_max_pages(config.pdf_max_pages),
            docx: DocxExtractor::new(),
            plain: PlainTextDecoder::new().with_tld_hint(config.encoding_hint.as_deref()),
        }
    }

    /// Extract text plus details about how it was obtained.
    pub fn extract_document(&self, data: &[u8], filename: &str) -> ExtractedText {
        let format = DocumentFormat::from_filename(filename);
        info!("Extracting {} bytes from {} as {}", data.len(), filename, format);

        let result = match format {
            DocumentFormat::Pdf => self.pdf.extract_text(data),
            DocumentFormat::Docx => self.docx.extract_text(data),
            DocumentFormat::PlainText => return self.decode_plain(data, format, None),
        };

        match result {
            Ok(text) => {
                debug!("Extracted {} chars of {} text", text.chars().count(), format);
                ExtractedText {
                    text,
                    format,
                    encoding: None,
                    degraded: None,
                }
            }
            Err(e) => {
                let degraded = ExtractionError::Degraded {
                    format,
                    reason: e.to_string(),
                };
                warn!("{}", degraded);
                self.decode_plain(data, format, Some(degraded.to_string()))
            }
        }
    }

    /// Extract text only.
    pub fn extract(&self, data: &[u8], filename: &str) -> String {
        self.extract_document(data, filename).text
    }

    fn decode_plain(
        &self,
        data: &[u8],
        format: DocumentFormat,
        degraded: Option<String>,
    ) -> ExtractedText {
        let decoded = self.plain.decode(data);
        ExtractedText {
            text: decoded.text,
            format,
            encoding: Some(decoded.encoding.to_string()),
            degraded,
        }
    }
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract plain text from document bytes with default settings.
pub fn extract(data: &[u8], filename: &str) -> String {
    DocumentExtractor::new().extract(data, filename)
}

/// Extract text and extraction details with default settings.
pub fn extract_document(data: &[u8], filename: &str) -> ExtractedText {
    DocumentExtractor::new().extract_document(data, filename)
}
