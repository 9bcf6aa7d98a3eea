//! Matching documents against a target UUID set.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::cfdi::DocumentProcessor;
use crate::diagnostics::{Diagnostics, SkipEvent};
use crate::error::{CfdiError, Result};
use crate::models::record::ResultRecord;
use crate::targets::TargetSet;

/// A target document copied to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopiedDocument {
    pub uuid: String,
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// What happened to a single document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Its UUID was pending and the file was copied.
    Copied(CopiedDocument),
    /// Valid, but not (or no longer) a target.
    Ignored(ResultRecord),
    /// Not a usable CFDI.
    Skipped(SkipEvent),
}

/// Summary of a reconciliation run.
#[derive(Debug, Clone, Default)]
pub struct ReconcileReport {
    /// Documents handed to the reconciler.
    pub scanned: usize,
    /// Copies made, in processing order.
    pub copied: Vec<CopiedDocument>,
    /// Documents skipped as invalid.
    pub diagnostics: Diagnostics,
    /// Target UUIDs never matched, sorted.
    pub unmatched: Vec<String>,
}

/// Copies documents whose UUID is in the target set.
///
/// Each target is copied at most once, to `<output_dir>/<uuid>.xml`;
/// existing files there are overwritten.
pub struct Reconciler {
    processor: DocumentProcessor,
    targets: TargetSet,
    output_dir: PathBuf,
    scanned: usize,
    copied: Vec<CopiedDocument>,
    diagnostics: Diagnostics,
}

impl Reconciler {
    /// Create a reconciler, creating `output_dir` if needed.
    pub fn new(
        processor: DocumentProcessor,
        targets: TargetSet,
        output_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self {
            processor,
            targets,
            output_dir,
            scanned: 0,
            copied: Vec::new(),
            diagnostics: Diagnostics::new(),
        })
    }

    /// Targets not matched so far.
    pub fn targets(&self) -> &TargetSet {
        &self.targets
    }

    /// Process one document.
    ///
    /// Invalid documents are recorded and reported as [`Outcome::Skipped`];
    /// I/O failures abort with an error.
    pub fn handle(&mut self, path: &Path) -> Result<Outcome> {
        self.scanned += 1;

        let record = match self.processor.process(path) {
            Ok(record) => record,
            Err(CfdiError::InvalidDocument { path, reason }) => {
                let event = SkipEvent { path, reason };
                debug!("{}", event);
                self.diagnostics.record(event.clone());
                return Ok(Outcome::Skipped(event));
            }
            Err(e) => return Err(e),
        };

        if !self.targets.take(&record.uuid) {
            return Ok(Outcome::Ignored(record));
        }

        let destination = self.output_dir.join(record.canonical_file_name());
        if is_same_file(&record.path, &destination)? {
            // Copying a file onto itself truncates it.
            debug!("{} is already in place", destination.display());
        } else {
            info!(
                "Copying {} to {}",
                record.path.display(),
                destination.display()
            );
            fs::copy(&record.path, &destination)?;
        }

        let copied = CopiedDocument {
            uuid: record.uuid,
            source: record.path,
            destination,
        };
        self.copied.push(copied.clone());
        Ok(Outcome::Copied(copied))
    }

    /// Process every path, then finish.
    pub fn run<I>(mut self, paths: I) -> Result<ReconcileReport>
    where
        I: IntoIterator<Item = Result<PathBuf>>,
    {
        for path in paths {
            self.handle(&path?)?;
        }
        Ok(self.finish())
    }

    /// Close the run; pending targets become the unmatched list.
    pub fn finish(self) -> ReconcileReport {
        ReconcileReport {
            scanned: self.scanned,
            copied: self.copied,
            diagnostics: self.diagnostics,
            unmatched: self.targets.into_remaining(),
        }
    }
}

/// Whether `source` and `destination` resolve to the same file.
fn is_same_file(source: &Path, destination: &Path) -> Result<bool> {
    if !destination.exists() {
        return Ok(false);
    }
    Ok(fs::canonicalize(source)? == fs::canonicalize(destination)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvalidDocument;

    fn write_stamped(dir: &Path, name: &str, uuid: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(
            &path,
            format!(
                r#"<cfdi:Comprobante Version="4.0"><cfdi:Complemento><tfd:TimbreFiscalDigital UUID="{uuid}"/></cfdi:Complemento></cfdi:Comprobante>"#
            ),
        )
        .unwrap();
        path
    }

    #[test]
    fn test_duplicate_uuid_copied_once() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let first = write_stamped(input.path(), "a.xml", "A1");
        let second = write_stamped(input.path(), "b.xml", "A1");

        let targets: TargetSet = ["A1"].into_iter().collect();
        let mut reconciler =
            Reconciler::new(DocumentProcessor::new(), targets, output.path()).unwrap();

        assert!(matches!(reconciler.handle(&first).unwrap(), Outcome::Copied(_)));
        assert!(matches!(reconciler.handle(&second).unwrap(), Outcome::Ignored(_)));
        assert!(reconciler.targets().is_empty());

        let report = reconciler.finish();
        assert_eq!(report.scanned, 2);
        assert_eq!(report.copied.len(), 1);
        assert_eq!(report.copied[0].source, first);
        assert!(report.unmatched.is_empty());
    }

    #[test]
    fn test_invalid_document_is_skipped() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let path = input.path().join("feed.xml");
        fs::write(&path, "<rss><channel/></rss>").unwrap();

        let targets: TargetSet = ["A1"].into_iter().collect();
        let mut reconciler =
            Reconciler::new(DocumentProcessor::new(), targets, output.path()).unwrap();

        match reconciler.handle(&path).unwrap() {
            Outcome::Skipped(event) => {
                assert_eq!(event.path, path);
                assert_eq!(event.reason, InvalidDocument::MissingEnvelope);
            }
            other => panic!("expected skip, got {:?}", other),
        }

        let report = reconciler.finish();
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.unmatched, vec!["A1".to_string()]);
    }

    #[test]
    fn test_document_already_in_output_directory_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_stamped(dir.path(), "A1.xml", "A1");
        let before = fs::read(&path).unwrap();

        let targets: TargetSet = ["A1"].into_iter().collect();
        let options = crate::models::config::ScanConfig::default();
        let report = Reconciler::new(DocumentProcessor::new(), targets, dir.path())
            .unwrap()
            .run(crate::scan::walk_documents(dir.path(), &options))
            .unwrap();

        assert_eq!(fs::read(&path).unwrap(), before);
        assert_eq!(report.copied.len(), 1);
        assert_eq!(report.copied[0].destination, path);
        assert!(report.unmatched.is_empty());
    }

    #[test]
    fn test_creates_output_directory() {
        let root = tempfile::tempdir().unwrap();
        let output = root.path().join("salida/2024");
        Reconciler::new(DocumentProcessor::new(), TargetSet::default(), &output).unwrap();
        assert!(output.is_dir());
    }

    #[test]
    fn test_unreadable_file_aborts() {
        let output = tempfile::tempdir().unwrap();
        let mut reconciler =
            Reconciler::new(DocumentProcessor::new(), TargetSet::default(), output.path())
                .unwrap();
        assert!(matches!(
            reconciler.handle(Path::new("/nonexistent/timbre/a.xml")),
            Err(CfdiError::Io(_))
        ));
    }
}
