//! Charset detection and lossy decoding for plain text documents.

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use tracing::debug;

use super::{Result, TextExtractor};

/// Decodes bytes of unknown encoding into UTF-8.
pub struct PlainTextDecoder {
    /// Top-level domain hint passed to the detector (e.g. `tw`).
    tld_hint: Option<String>,
}

/// Decoded text together with the encoding that produced it.
#[derive(Debug, Clone)]
pub struct DecodedText {
    pub text: String,
    pub encoding: &'static str,
    /// Whether malformed sequences were dropped.
    pub had_errors: bool,
}

impl PlainTextDecoder {
    pub fn new() -> Self {
        Self { tld_hint: None }
    }

    /// Set the top-level domain hint. Invalid labels are ignored.
    pub fn with_tld_hint(mut self, tld: Option<&str>) -> Self {
        self.tld_hint = tld
            .map(|t| t.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|t| !t.is_empty() && t.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-'));
        self
    }

    /// Detect the most likely encoding. A byte order mark wins over detection.
    pub fn detect_encoding(&self, data: &[u8]) -> &'static Encoding {
        if let Some((encoding, _)) = Encoding::for_bom(data) {
            return encoding;
        }

        let mut detector = EncodingDetector::new();
        detector.feed(data, true);
        detector.guess(self.tld_hint.as_deref().map(str::as_bytes), true)
    }

    /// Decode bytes, dropping any malformed sequences.
    pub fn decode(&self, data: &[u8]) -> DecodedText {
        let detected = self.detect_encoding(data);
        let (text, encoding, had_errors) = detected.decode(data);

        let text = if had_errors {
            text.chars().filter(|c| *c != char::REPLACEMENT_CHARACTER).collect()
        } else {
            text.into_owned()
        };

        debug!(
            "Decoded {} bytes as {} (errors: {})",
            data.len(),
            encoding.name(),
            had_errors
        );

        DecodedText {
            text,
            encoding: encoding.name(),
            had_errors,
        }
    }
}

impl Default for PlainTextDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for PlainTextDecoder {
    fn extract_text(&self, data: &[u8]) -> Result<String> {
        Ok(self.decode(data).text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8() {
        let decoded = PlainTextDecoder::new().decode("違約金為 15%".as_bytes());
        assert_eq!(decoded.text, "違約金為 15%");
        assert_eq!(decoded.encoding, "UTF-8");
        assert!(!decoded.had_errors);
    }

    #[test]
    fn test_decode_strips_bom() {
        let mut data = vec![0xEF, 0xBB, 0xBF];
        data.extend_from_slice("合約".as_bytes());
        let decoded = PlainTextDecoder::new().decode(&data);
        assert_eq!(decoded.text, "合約");
    }

    #[test]
    fn test_decode_big5() {
        let (bytes, _, _) = encoding_rs::BIG5.encode("本合約之違約金為新台幣三千七百九十二元，租約期間二年，未租滿十二個月者應給付解約金。");
        let decoded = PlainTextDecoder::new().with_tld_hint(Some("tw")).decode(&bytes);
        assert_eq!(decoded.encoding, "Big5");
        assert!(decoded.text.contains("違約金"));
    }

    #[test]
    fn test_malformed_bytes_are_dropped() {
        let mut data = b"fee 100".to_vec();
        data.push(0xFF);
        data.extend_from_slice("元".as_bytes());
        let decoded = PlainTextDecoder::new().decode(&data);
        assert!(!decoded.text.contains(char::REPLACEMENT_CHARACTER));
        assert!(decoded.text.starts_with("fee 100"));
    }

    #[test]
    fn test_invalid_tld_hint_is_ignored() {
        let decoder = PlainTextDecoder::new().with_tld_hint(Some("not a tld"));
        assert!(decoder.tld_hint.is_none());
        let decoder = PlainTextDecoder::new().with_tld_hint(Some(".TW"));
        assert_eq!(decoder.tld_hint.as_deref(), Some("tw"));
    }
}
