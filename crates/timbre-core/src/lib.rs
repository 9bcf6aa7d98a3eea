//! Core library for locating CFDI fiscal receipts by stamp UUID.
//!
//! This crate provides:
//! - XML to nested-mapping conversion with CFDI namespace prefixes stripped
//! - `Comprobante` envelope parsing and `TimbreFiscalDigital` extraction
//! - Directory reconciliation against a target UUID list
//! - Bulk export of `<uuid>,<path>` rows

pub mod cfdi;
pub mod diagnostics;
pub mod error;
pub mod export;
pub mod models;
pub mod reconcile;
pub mod scan;
pub mod targets;
pub mod xml;

pub use cfdi::{extract_stamp, CfdiParser, Complement, DocumentProcessor, Envelope, EnvelopeParser, StampRecord};
pub use diagnostics::{Diagnostics, SkipEvent};
pub use error::{CfdiError, InvalidDocument, Result};
pub use export::{ExportOutcome, ExportReport, Exporter};
pub use models::config::TimbreConfig;
pub use models::record::ResultRecord;
pub use reconcile::{CopiedDocument, Outcome, ReconcileReport, Reconciler};
pub use scan::{list_documents, walk_documents};
pub use targets::TargetSet;
