//! DOCX paragraph extraction from `word/document.xml`.

use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::debug;
use zip::ZipArchive;

use super::{Result, TextExtractor};
use crate::error::DocxError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Extracts paragraph text from Office Open XML word documents.
pub struct DocxExtractor;

impl DocxExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Non-empty paragraphs in document order, table cells included.
    pub fn paragraphs(&self, data: &[u8]) -> std::result::Result<Vec<String>, DocxError> {
        let xml = read_document_part(data)?;
        let paragraphs = parse_paragraphs(&xml)?;
        debug!("Read {} non-empty paragraphs from DOCX", paragraphs.len());
        Ok(paragraphs)
    }
}

impl Default for DocxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for DocxExtractor {
    fn extract_text(&self, data: &[u8]) -> Result<String> {
        Ok(self.paragraphs(data)?.join("\n"))
    }
}

fn read_document_part(data: &[u8]) -> std::result::Result<String, DocxError> {
    let mut archive =
        ZipArchive::new(Cursor::new(data)).map_err(|e| DocxError::Archive(e.to_string()))?;
    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|_| DocxError::MissingPart(DOCUMENT_PART))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| DocxError::Archive(e.to_string()))?;
    Ok(xml)
}

fn parse_paragraphs(xml: &str) -> std::result::Result<Vec<String>, DocxError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:p" => current.clear(),
                b"w:t" => in_text_run = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => current.push('\t'),
                b"w:br" | b"w:cr" => current.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) if in_text_run => {
                let text = e.unescape().map_err(|err| DocxError::Xml(err.to_string()))?;
                current.push_str(&text);
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => {
                    if !current.trim().is_empty() {
                        paragraphs.push(std::mem::take(&mut current));
                    }
                    current.clear();
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(DocxError::Xml(format!(
                    "at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(paragraphs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn build_docx(body: &str) -> Vec<u8> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            body
        );
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer.start_file(DOCUMENT_PART, SimpleFileOptions::default()).unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_paragraphs_skip_empty() {
        let data = build_docx(
            r#"<w:p><w:r><w:t>家庭特選餐</w:t></w:r><w:r><w:t xml:space="preserve">(3,792元)</w:t></w:r></w:p>
<w:p></w:p>
<w:p><w:r><w:t>   </w:t></w:r></w:p>
<w:p><w:r><w:t>合約期間2年</w:t></w:r></w:p>"#,
        );

        let paragraphs = DocxExtractor::new().paragraphs(&data).unwrap();
        assert_eq!(paragraphs, vec!["家庭特選餐(3,792元)", "合約期間2年"]);
    }

    #[test]
    fn test_tabs_breaks_and_entities() {
        let data = build_docx(
            r#"<w:p><w:r><w:t>A&amp;B</w:t><w:tab/><w:t>100M/40M</w:t><w:br/><w:t>next</w:t></w:r></w:p>"#,
        );

        let text = DocxExtractor::new().extract_text(&data).unwrap();
        assert_eq!(text, "A&B\t100M/40M\nnext");
    }

    #[test]
    fn test_table_cells_are_included() {
        let data = build_docx(
            r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>自選餐</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>2,520元</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
        );

        let text = DocxExtractor::new().extract_text(&data).unwrap();
        assert_eq!(text, "自選餐\n2,520元");
    }

    #[test]
    fn test_missing_document_part() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer.start_file("other.xml", SimpleFileOptions::default()).unwrap();
        writer.write_all(b"<x/>").unwrap();
        let data = writer.finish().unwrap().into_inner();

        let err = DocxExtractor::new().paragraphs(&data).unwrap_err();
        assert!(matches!(err, DocxError::MissingPart(DOCUMENT_PART)));
    }

    #[test]
    fn test_not_a_zip() {
        let err = DocxExtractor::new().paragraphs(b"plain").unwrap_err();
        assert!(matches!(err, DocxError::Archive(_)));
    }
}
