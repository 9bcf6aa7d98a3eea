//! Export command - write the UUID of every document in a directory.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use timbre_core::{list_documents, ExportOutcome, Exporter};

use super::config::load_config;

/// Arguments for the export command.
#[derive(Args)]
pub struct ExportArgs {
    /// Directory whose direct children are read
    xmls_dir: PathBuf,

    /// Result CSV file (default: uuids.csv)
    output: Option<PathBuf>,
}

pub fn run(args: ExportArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.xmls_dir.is_dir() {
        anyhow::bail!("Input directory not found: {}", args.xmls_dir.display());
    }

    let output = args
        .output
        .unwrap_or_else(|| config.export.default_output.clone());

    let files = list_documents(&args.xmls_dir, &config.scan.extension)?;
    info!("Found {} files in {}", files.len(), args.xmls_dir.display());

    let mut exporter = Exporter::create(config.processor(), &output)?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    for path in &files {
        if let ExportOutcome::Skipped(event) = exporter.handle(path)? {
            warn!("{}", event);
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    let (report, _) = exporter.finish()?;

    println!(
        "{} Wrote {} UUIDs to {} in {:?}",
        style("✓").green(),
        report.records,
        output.display(),
        start.elapsed()
    );
    if !report.diagnostics.is_empty() {
        println!(
            "   {} of {} documents skipped",
            style(report.diagnostics.len()).yellow(),
            report.scanned
        );
    }

    Ok(())
}
