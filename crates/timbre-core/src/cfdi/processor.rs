//! Per-document pipeline: read, parse, extract.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{CfdiError, InvalidDocument, Result};
use crate::models::record::ResultRecord;

use super::{extract_stamp, CfdiParser, EnvelopeParser};

/// Read a document as text.
///
/// Content that is not UTF-8 is a malformed document, not an I/O failure.
pub fn read_document(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    String::from_utf8(bytes)
        .map_err(|e| CfdiError::invalid(path, InvalidDocument::Malformed(e.to_string())))
}

/// Runs the parser and stamp extractor over single documents.
#[derive(Debug, Clone, Default)]
pub struct DocumentProcessor {
    parser: CfdiParser,
}

impl DocumentProcessor {
    /// Create a processor with the default parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom parser.
    pub fn with_parser(mut self, parser: CfdiParser) -> Self {
        self.parser = parser;
        self
    }

    /// Extract the stamp UUID of the document at `path`.
    ///
    /// Extraction failures come back as [`CfdiError::InvalidDocument`]
    /// carrying `path`; unreadable files are I/O errors.
    pub fn process(&self, path: &Path) -> Result<ResultRecord> {
        let text = read_document(path)?;
        self.process_text(&text, path)
    }

    /// Extract the stamp UUID of already loaded content.
    pub fn process_text(&self, text: &str, path: &Path) -> Result<ResultRecord> {
        let uuid = self
            .extract_uuid(text)
            .map_err(|reason| CfdiError::invalid(path, reason))?;
        debug!("{} has UUID {}", path.display(), uuid);
        Ok(ResultRecord::new(uuid, path))
    }

    fn extract_uuid(&self, text: &str) -> std::result::Result<String, InvalidDocument> {
        let envelope = self.parser.parse(text)?;
        let stamp = extract_stamp(&envelope)?;
        Ok(stamp.uuid()?.to_string())
    }
}
