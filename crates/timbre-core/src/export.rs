//! Writing every extracted UUID to a result file.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cfdi::DocumentProcessor;
use crate::diagnostics::{Diagnostics, SkipEvent};
use crate::error::{CfdiError, Result};
use crate::models::record::ResultRecord;

/// Summary of an export run.
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    /// Documents handed to the exporter.
    pub scanned: usize,
    /// Rows written.
    pub records: usize,
    /// Documents skipped as invalid.
    pub diagnostics: Diagnostics,
}

/// What happened to a single document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// A row was written.
    Written(ResultRecord),
    /// Not a usable CFDI.
    Skipped(SkipEvent),
}

/// Writes `<uuid>,<path>` rows, one per valid document, in processing order.
pub struct Exporter<W: Write> {
    processor: DocumentProcessor,
    writer: csv::Writer<W>,
    scanned: usize,
    records: usize,
    diagnostics: Diagnostics,
}

impl Exporter<File> {
    /// Export into a new file at `path`, truncating any existing one.
    pub fn create(processor: DocumentProcessor, path: &Path) -> Result<Self> {
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)?;
        Ok(Self::from_csv_writer(processor, writer))
    }
}

impl<W: Write> Exporter<W> {
    /// Export into any writer.
    pub fn new(processor: DocumentProcessor, writer: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        Self::from_csv_writer(processor, writer)
    }

    fn from_csv_writer(processor: DocumentProcessor, writer: csv::Writer<W>) -> Self {
        Self {
            processor,
            writer,
            scanned: 0,
            records: 0,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Process one document, writing its row if it is valid.
    pub fn handle(&mut self, path: &Path) -> Result<ExportOutcome> {
        self.scanned += 1;

        let record = match self.processor.process(path) {
            Ok(record) => record,
            Err(CfdiError::InvalidDocument { path, reason }) => {
                let event = SkipEvent { path, reason };
                debug!("{}", event);
                self.diagnostics.record(event.clone());
                return Ok(ExportOutcome::Skipped(event));
            }
            Err(e) => return Err(e),
        };

        let path = record.path.to_string_lossy();
        self.writer.write_record([record.uuid.as_str(), path.as_ref()])?;
        self.records += 1;
        Ok(ExportOutcome::Written(record))
    }

    /// Process every path, then finish.
    pub fn run<I>(mut self, paths: I) -> Result<(ExportReport, W)>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        for path in paths {
            self.handle(&path)?;
        }
        self.finish()
    }

    /// Flush the output and return the report with the inner writer.
    pub fn finish(self) -> Result<(ExportReport, W)> {
        let writer = self
            .writer
            .into_inner()
            .map_err(|e| CfdiError::Io(e.into_error()))?;
        let report = ExportReport {
            scanned: self.scanned,
            records: self.records,
            diagnostics: self.diagnostics,
        };
        Ok((report, writer))
    }
}
