//! CFDI envelope parsing and stamp extraction.

mod envelope;
mod processor;
mod stamp;

pub use envelope::{CfdiParser, Envelope};
pub use processor::{read_document, DocumentProcessor};
pub use stamp::{extract_stamp, Complement, StampRecord, STAMP_KEY};

use crate::error::InvalidDocument;

/// Result type for extraction stages.
pub type Result<T> = std::result::Result<T, InvalidDocument>;

/// Trait for turning raw document text into a fiscal envelope.
pub trait EnvelopeParser {
    /// Parse document text and locate its `Comprobante`.
    fn parse(&self, text: &str) -> Result<Envelope>;
}
