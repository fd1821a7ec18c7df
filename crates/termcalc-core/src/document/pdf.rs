//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::{debug, trace};

use super::{Result, TextExtractor};
use crate::error::PdfError;

/// Page-wise PDF text extractor.
pub struct PdfExtractor {
    /// Maximum pages to read (0 = unlimited).
    max_pages: usize,
}

/// A parsed PDF ready for text extraction.
pub struct LoadedPdf {
    document: Document,
    raw_data: Vec<u8>,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self { max_pages: 0 }
    }

    /// Limit how many pages are read.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Parse a PDF from bytes.
    pub fn load(&self, data: &[u8]) -> std::result::Result<LoadedPdf, PdfError> {
        let mut document = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        let raw_data = if document.is_encrypted() {
            if document.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract needs the decrypted bytes
            let mut decrypted_data = Vec::new();
            document
                .save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            decrypted_data
        } else {
            data.to_vec()
        };

        let page_count = document.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        Ok(LoadedPdf { document, raw_data })
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadedPdf {
    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.document.get_pages().len() as u32
    }

    /// Extract text from a single page (1-indexed).
    pub fn extract_page_text(&self, page: u32) -> std::result::Result<String, PdfError> {
        if page == 0 || page > self.page_count() {
            return Err(PdfError::InvalidPage(page));
        }
        self.document
            .extract_text(&[page])
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }

    /// Extract the whole document in one pass with pdf-extract.
    ///
    /// Used when lopdf finds no text on any page, which happens with some
    /// CID-keyed fonts.
    pub fn extract_text_whole(&self) -> std::result::Result<String, PdfError> {
        let data = self.raw_data.as_slice();
        // pdf-extract panics on some malformed font tables
        match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(data)) {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(PdfError::TextExtraction(e.to_string())),
            Err(_) => Err(PdfError::TextExtraction("pdf-extract aborted".to_string())),
        }
    }
}

impl TextExtractor for PdfExtractor {
    fn extract_text(&self, data: &[u8]) -> Result<String> {
        let pdf = self.load(data)?;

        let page_count = pdf.page_count();
        let last_page = match self.max_pages {
            0 => page_count,
            n => page_count.min(n as u32),
        };

        let mut pages = Vec::new();
        for page in 1..=last_page {
            match pdf.extract_page_text(page) {
                Ok(text) if !text.trim().is_empty() => pages.push(text.trim_end().to_string()),
                Ok(_) => trace!("Page {} has no extractable text", page),
                Err(e) => debug!("Skipping page {}: {}", page, e),
            }
        }

        if !pages.is_empty() {
            debug!("Extracted text from {}/{} pages", pages.len(), page_count);
            return Ok(pages.join("\n"));
        }

        // Image-only documents legitimately produce nothing
        debug!("No page yielded text, trying whole-document pass");
        let text = pdf.extract_text_whole().unwrap_or_else(|e| {
            debug!("Whole-document pass failed: {}", e);
            String::new()
        });
        Ok(text.trim().to_string())
    }
}
