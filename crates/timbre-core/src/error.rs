//! Error types for the timbre-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the timbre library.
#[derive(Error, Debug)]
pub enum CfdiError {
    /// The document at `path` is not a usable fiscal receipt.
    ///
    /// Recoverable at the batch level: drivers record it and move on.
    #[error("{}: {reason}", path.display())]
    InvalidDocument {
        path: PathBuf,
        reason: InvalidDocument,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Directory traversal error.
    #[error("directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Invalid file listing pattern.
    #[error("invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl CfdiError {
    /// Attach a file path to an extraction failure.
    pub fn invalid(path: impl Into<PathBuf>, reason: InvalidDocument) -> Self {
        Self::InvalidDocument {
            path: path.into(),
            reason,
        }
    }

    /// The extraction failure, if this error is one.
    pub fn as_invalid_document(&self) -> Option<&InvalidDocument> {
        match self {
            Self::InvalidDocument { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Reasons a document is not a usable CFDI.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidDocument {
    /// The markup could not be read as a single XML tree.
    #[error("malformed XML: {0}")]
    Malformed(String),

    /// The root carries no `Comprobante` envelope.
    #[error("No Comprobante found in XML")]
    MissingEnvelope,

    /// The envelope has no `Complemento`.
    #[error("Complemento not found in CFDI")]
    MissingComplement,

    /// No complement entry carries a digital stamp.
    #[error("No TimbreFiscalDigital found")]
    MissingStamp,

    /// The stamp lacks its `UUID` attribute.
    #[error("TimbreFiscalDigital has no UUID")]
    MissingUuid,
}

/// Result type for the timbre library.
pub type Result<T> = std::result::Result<T, CfdiError>;
