//! Show command - inspect a single document.

use std::path::PathBuf;

use clap::Args;
use serde_json::json;

use timbre_core::xml::TreeBuilder;
use timbre_core::cfdi::read_document;
use timbre_core::CfdiError;

use super::config::load_config;

/// Arguments for the show command.
#[derive(Args)]
pub struct ShowArgs {
    /// CFDI document
    #[arg(required = true)]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// `<uuid>,<path>` line
    Text,
    /// Extraction result with the parsed document tree
    Json,
}

pub fn run(args: ShowArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let processor = config.processor();

    match args.format {
        OutputFormat::Text => {
            let record = processor.process(&args.input)?;
            println!("{},{}", record.uuid, record.path.display());
        }
        OutputFormat::Json => {
            let text = read_document(&args.input)?;
            let tree = TreeBuilder::with_prefixes(config.parser.namespace_prefixes.iter().cloned())
                .parse(&text)
                .map_err(|reason| CfdiError::invalid(&args.input, reason))?;
            let result = processor.process_text(&text, &args.input);

            let output = json!({
                "path": args.input,
                "uuid": result.as_ref().ok().map(|r| r.uuid.as_str()),
                "error": result.as_ref().err().map(|e| e.to_string()),
                "tree": tree,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
