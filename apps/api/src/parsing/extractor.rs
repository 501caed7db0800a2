//! Text extraction from uploaded PDF and DOCX documents.
//!
//! Upload bytes are staged in a `NamedTempFile`; the file is removed when the
//! handle drops, including on error paths.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use bytes::Bytes;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::parsing::ParseError;

const DOCX_BODY_PART: &str = "word/document.xml";
const STAGED_PREFIX: &str = "upload_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Pdf,
    Docx,
}

impl MediaType {
    /// Maps a declared MIME type to a supported format, failing fast otherwise.
    pub fn from_mime(mime: &str) -> Result<Self, ParseError> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "application/pdf" => Ok(MediaType::Pdf),
            "application/docx"
            | "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Ok(MediaType::Docx)
            }
            _ => Err(ParseError::UnsupportedFormat(mime.to_string())),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            MediaType::Pdf => ".pdf",
            MediaType::Docx => ".docx",
        }
    }
}

/// An uploaded document. Consumed once by [`extract`], never persisted.
#[derive(Debug, Clone)]
pub struct RawDocument {
    bytes: Bytes,
    media_type: MediaType,
}

impl RawDocument {
    pub fn new(bytes: Bytes, mime: &str) -> Result<Self, ParseError> {
        Ok(Self {
            bytes,
            media_type: MediaType::from_mime(mime)?,
        })
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

/// Linearises a document into newline-delimited text.
pub fn extract(document: &RawDocument) -> Result<String, ParseError> {
    extract_in(document, &std::env::temp_dir())
}

fn extract_in(document: &RawDocument, staging_dir: &Path) -> Result<String, ParseError> {
    let staged = stage(document, staging_dir)?;
    let text = match document.media_type {
        MediaType::Pdf => extract_pdf(staged.path())?,
        MediaType::Docx => extract_docx(staged.path())?,
    };
    debug!(
        "Extracted {} chars from {:?} upload",
        text.len(),
        document.media_type
    );
    Ok(text)
}

fn stage(document: &RawDocument, staging_dir: &Path) -> Result<NamedTempFile, ParseError> {
    let mut staged = tempfile::Builder::new()
        .prefix(STAGED_PREFIX)
        .suffix(document.media_type.extension())
        .tempfile_in(staging_dir)
        .map_err(|e| ParseError::ExtractionFailure(format!("Could not stage upload: {e}")))?;
    staged
        .write_all(&document.bytes)
        .and_then(|_| staged.flush())
        .map_err(|e| ParseError::ExtractionFailure(format!("Could not stage upload: {e}")))?;
    Ok(staged)
}

fn extract_pdf(path: &Path) -> Result<String, ParseError> {
    let bytes = std::fs::read(path)
        .map_err(|e| ParseError::ExtractionFailure(format!("Could not read PDF: {e}")))?;
    // pdf-extract panics on some malformed inputs instead of returning Err.
    let pages = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(&bytes))
        .map_err(|_| ParseError::ExtractionFailure("Failed to process PDF file".to_string()))?
        .map_err(|e| ParseError::ExtractionFailure(format!("Failed to process PDF file: {e}")))?;
    Ok(join_pages(pages))
}

/// Concatenates pages in order. A blank page contributes nothing; a page
/// that does not end in a newline gets one so lines never fuse across pages.
fn join_pages(pages: Vec<String>) -> String {
    let mut text = String::new();
    for page in pages {
        if !text.is_empty() && !text.ends_with('\n') && !page.is_empty() {
            text.push('\n');
        }
        text.push_str(&page);
    }
    text
}

fn extract_docx(path: &Path) -> Result<String, ParseError> {
    let failure = |e: &dyn std::fmt::Display| {
        ParseError::ExtractionFailure(format!("Failed to process DOCX file: {e}"))
    };

    let file = File::open(path).map_err(|e| failure(&e))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| failure(&e))?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY_PART)
        .map_err(|e| failure(&e))?
        .read_to_string(&mut xml)
        .map_err(|e| failure(&e))?;

    docx_body_text(&xml).map_err(|e| failure(&e))
}

/// Walks WordprocessingML and keeps run text, one line per paragraph.
fn docx_body_text(xml: &str) -> Result<String, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:cr" => text.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text_run => text.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}
