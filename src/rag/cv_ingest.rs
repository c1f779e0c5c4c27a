//! CV text extraction: PDF (text layer), DOCX (paragraph walk), TXT (as-is)

use anyhow::{Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::Read as _;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CvIngestError {
    #[error("unsupported CV file format: {0}")]
    UnsupportedFormat(String),
    #[error("CV file produced no extractable text")]
    EmptyDocument,
}

/// Extract raw text from a CV file, dispatching on its extension.
pub fn extract_text(path: &Path) -> Result<String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let text = match ext.as_str() {
        "pdf" => extract_pdf(path)?,
        "docx" => extract_docx(path)?,
        "txt" => std::fs::read_to_string(path).context("failed to read TXT file")?,
        other => return Err(CvIngestError::UnsupportedFormat(other.to_string()).into()),
    };

    let normalised = normalise_whitespace(&text);
    if normalised.trim().is_empty() {
        return Err(CvIngestError::EmptyDocument.into());
    }

    Ok(normalised)
}

fn extract_pdf(path: &Path) -> Result<String> {
    pdf_extract::extract_text(path).context("failed to extract text from PDF")
}

fn extract_docx(path: &Path) -> Result<String> {
    let file = std::fs::File::open(path).context("failed to open DOCX file")?;
    let mut archive = zip::ZipArchive::new(file).context("DOCX is not a valid zip archive")?;
    let mut document_xml = archive
        .by_name("word/document.xml")
        .context("DOCX missing word/document.xml")?;

    let mut xml = String::new();
    document_xml
        .read_to_string(&mut xml)
        .context("failed to read word/document.xml")?;
    drop(document_xml);

    parse_docx_xml(&xml)
}

/// Walk `word/document.xml`, rebuilding paragraph text from `<w:p>`/`<w:t>` elements.
fn parse_docx_xml(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => {
                in_text = true;
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"t" => {
                in_text = false;
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"p" => {
                paragraphs.push(std::mem::take(&mut current));
            }
            Ok(Event::Text(e)) if in_text => {
                current.push_str(&e.unescape().unwrap_or_default());
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(anyhow::anyhow!("malformed DOCX xml: {}", e)),
            _ => {}
        }
        buf.clear();
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }

    Ok(paragraphs.join("\n\n"))
}

fn normalise_whitespace(text: &str) -> String {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_extension_is_rejected() {
        let path = Path::new("resume.png");
        let err = extract_text(path).unwrap_err();
        assert!(err.to_string().contains("unsupported"));
    }

    #[test]
    fn docx_xml_rebuilds_paragraphs() {
        let xml = r#"<?xml version="1.0"?>
        <w:document xmlns:w="ns">
          <w:body>
            <w:p><w:r><w:t>Senior Engineer</w:t></w:r></w:p>
            <w:p><w:r><w:t>Built </w:t></w:r><w:r><w:t>distributed systems.</w:t></w:r></w:p>
          </w:body>
        </w:document>"#;

        let text = parse_docx_xml(xml).unwrap();
        assert_eq!(text, "Senior Engineer\n\nBuilt distributed systems.");
    }

    #[test]
    fn whitespace_is_normalised() {
        let normalised = normalise_whitespace("hello   world  \n\n  foo\tbar");
        assert_eq!(normalised, "hello world\n\nfoo bar");
    }
}
