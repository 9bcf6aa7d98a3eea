//! Reconcile command - copy the documents whose UUID is on a target list.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use timbre_core::{walk_documents, Outcome, Reconciler, TargetSet};

use super::config::load_config;

/// Arguments for the reconcile command.
#[derive(Args)]
pub struct ReconcileArgs {
    /// Directory searched recursively for CFDI documents
    xmls_dir: PathBuf,

    /// CSV file whose first column lists the UUIDs to find
    uuids_csv: PathBuf,

    /// Directory receiving matched documents as <uuid>.xml
    output_dir: PathBuf,

    /// Skip the first row of the UUID list
    #[arg(long)]
    has_header: bool,
}

pub fn run(args: ReconcileArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.xmls_dir.is_dir() {
        anyhow::bail!("Input directory not found: {}", args.xmls_dir.display());
    }

    let has_header = args.has_header || config.targets.has_header;
    let targets = TargetSet::from_csv_path(&args.uuids_csv, has_header)?;
    info!(
        "Looking for {} UUIDs from {}",
        targets.len(),
        args.uuids_csv.display()
    );

    let mut reconciler = Reconciler::new(config.processor(), targets, &args.output_dir)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos} files {wide_msg}")?,
    );

    for path in walk_documents(&args.xmls_dir, &config.scan) {
        let path = path?;
        pb.set_message(path.display().to_string());

        match reconciler.handle(&path)? {
            Outcome::Skipped(event) => warn!("{}", event),
            Outcome::Copied(copied) => {
                debug!("Copied {} as {}", copied.source.display(), copied.destination.display())
            }
            Outcome::Ignored(_) => {}
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    let report = reconciler.finish();

    if !report.unmatched.is_empty() {
        warn!("UUIDs not found: {}", report.unmatched.join(", "));
    }

    println!(
        "{} Scanned {} documents in {:?}",
        style("✓").green(),
        report.scanned,
        start.elapsed()
    );
    println!(
        "   {} copied, {} skipped, {} not found",
        style(report.copied.len()).green(),
        style(report.diagnostics.len()).yellow(),
        style(report.unmatched.len()).red()
    );

    if !report.unmatched.is_empty() {
        println!();
        println!("{}", style("Not found:").red());
        for uuid in &report.unmatched {
            println!("  - {}", uuid);
        }
    }

    Ok(())
}
