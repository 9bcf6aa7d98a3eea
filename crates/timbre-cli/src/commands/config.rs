//! Config command - manage configuration.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;
use tracing::debug;

use timbre_core::TimbreConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(config_path),
        ConfigCommand::Init(init_args) => init_config(init_args),
        ConfigCommand::Path => show_path(config_path),
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("timbre")
        .join("config.json")
}

/// The file `load_config` reads, if any.
fn resolved_config_path(config_path: Option<&str>) -> Option<PathBuf> {
    match config_path {
        Some(path) => Some(PathBuf::from(path)),
        None => Some(default_config_path()).filter(|path| path.exists()),
    }
}

/// Load the explicit config file, else the default one, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<TimbreConfig> {
    match resolved_config_path(config_path) {
        Some(path) => {
            debug!("Loading config from {}", path.display());
            Ok(TimbreConfig::from_file(&path)?)
        }
        None => Ok(TimbreConfig::default()),
    }
}

fn show_config(config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    match resolved_config_path(config_path) {
        Some(path) => println!("{} Using {}", style("ℹ").blue(), path.display()),
        None => println!("{} No config file found, using defaults.", style("ℹ").blue()),
    }
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

/// Write a default configuration, listing the namespace prefixes it strips.
fn init_config(args: InitArgs) -> anyhow::Result<()> {
    let path = args.output.unwrap_or_else(default_config_path);
    if path.exists() && !args.force {
        anyhow::bail!(
            "{} exists; pass --force to replace it",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let config = TimbreConfig::default();
    config.save(&path)?;

    println!("{} Wrote {}", style("✓").green(), path.display());
    println!(
        "   scanning *.{} files, stripping prefixes: {}",
        config.scan.extension,
        config.parser.namespace_prefixes.join(", ")
    );
    Ok(())
}

fn show_path(config_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);
    println!("{}", path.display());
    if !path.exists() {
        println!("{} Not created yet; defaults apply", style("ℹ").blue());
    }
    Ok(())
}
