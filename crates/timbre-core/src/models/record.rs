//! Per-document extraction results.

use std::path::PathBuf;

use serde::Serialize;

/// A stamp UUID paired with the document it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRecord {
    /// Fiscal UUID of the stamp.
    pub uuid: String,
    /// Source document path.
    pub path: PathBuf,
}

impl ResultRecord {
    pub fn new(uuid: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            uuid: uuid.into(),
            path: path.into(),
        }
    }

    /// Canonical output file name, `<uuid>.xml`.
    pub fn canonical_file_name(&self) -> String {
        format!("{}.xml", self.uuid)
    }
}
