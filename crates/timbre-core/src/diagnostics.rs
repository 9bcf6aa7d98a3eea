//! Structured skip events collected by the batch drivers.

use std::fmt;
use std::path::PathBuf;

use crate::error::InvalidDocument;

/// A document left out of a run, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipEvent {
    pub path: PathBuf,
    pub reason: InvalidDocument,
}

impl fmt::Display for SkipEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} is not a valid CFDI: {}",
            self.path.display(),
            self.reason
        )
    }
}

/// Ordered list of skip events for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    skipped: Vec<SkipEvent>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a skipped document.
    pub fn record(&mut self, event: SkipEvent) {
        self.skipped.push(event);
    }

    pub fn skipped(&self) -> &[SkipEvent] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.skipped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skipped.is_empty()
    }
}
