//! Target UUID sets loaded from CSV lists.

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::Result;

/// UUIDs still being searched for.
///
/// Matched UUIDs are taken out; whatever remains after a run was not found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSet {
    pending: BTreeSet<String>,
}

impl TargetSet {
    /// Load the first column of every row in a CSV file.
    pub fn from_csv_path(path: &Path, has_header: bool) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(has_header)
            .flexible(true)
            .from_path(path)?;
        Self::from_csv(reader)
    }

    /// Load the first column of every row from a CSV reader.
    pub fn from_reader<R: Read>(reader: R, has_header: bool) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(has_header)
            .flexible(true)
            .from_reader(reader);
        Self::from_csv(reader)
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let mut pending = BTreeSet::new();
        for record in reader.records() {
            let record = record?;
            match record.get(0) {
                Some(uuid) if !uuid.is_empty() => {
                    pending.insert(uuid.to_string());
                }
                _ => debug!("Ignoring row without UUID: {:?}", record),
            }
        }
        Ok(Self { pending })
    }

    /// Whether `uuid` is still pending.
    pub fn contains(&self, uuid: &str) -> bool {
        self.pending.contains(uuid)
    }

    /// Mark `uuid` as found. Returns whether it was pending.
    pub fn take(&mut self, uuid: &str) -> bool {
        self.pending.remove(uuid)
    }

    /// Pending UUIDs, sorted.
    pub fn remaining(&self) -> impl Iterator<Item = &str> {
        self.pending.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Consume the set, yielding the pending UUIDs in order.
    pub fn into_remaining(self) -> Vec<String> {
        self.pending.into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for TargetSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            pending: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_column_deduplicated() {
        let csv = "A1,enero\nB2\nA1,febrero,extra\n";
        let targets = TargetSet::from_reader(csv.as_bytes(), false).unwrap();
        assert_eq!(targets.remaining().collect::<Vec<_>>(), vec!["A1", "B2"]);
    }

    #[test]
    fn test_header_is_a_target_unless_configured() {
        let csv = "uuid\nA1\n";
        let targets = TargetSet::from_reader(csv.as_bytes(), false).unwrap();
        assert!(targets.contains("uuid"));

        let targets = TargetSet::from_reader(csv.as_bytes(), true).unwrap();
        assert!(!targets.contains("uuid"));
        assert_eq!(targets.len(), 1);
    }

    #[test]
    fn test_blank_rows_are_ignored() {
        let csv = "A1\n\n,comment\nB2\n";
        let targets = TargetSet::from_reader(csv.as_bytes(), false).unwrap();
        assert_eq!(targets.len(), 2);
    }

    #[test]
    fn test_take_shrinks_once() {
        let mut targets: TargetSet = ["A1", "B2"].into_iter().collect();
        assert!(targets.take("A1"));
        assert!(!targets.take("A1"));
        assert!(!targets.take("C3"));
        assert_eq!(targets.into_remaining(), vec!["B2".to_string()]);
    }
}
