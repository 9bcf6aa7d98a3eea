//! CLI for locating CFDI fiscal receipts by stamp UUID.

mod commands;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{config, export, reconcile, show};

/// Find CFDI documents by the UUID of their digital stamp
#[derive(Parser)]
#[command(name = "timbre")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy the documents whose UUID is listed in a CSV file
    Reconcile(reconcile::ReconcileArgs),

    /// Write the UUID of every document in a directory to a CSV file
    Export(export::ExportArgs),

    /// Show the UUID or parsed tree of a single document
    Show(show::ShowArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Parse arguments; usage mistakes print to stdout and exit with status 1.
fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                println!("{}", e.render());
                std::process::exit(1);
            }
        },
    }
}

fn main() -> anyhow::Result<()> {
    let cli = parse_cli();

    // Diagnostics go to stderr, results to stdout
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Reconcile(args) => reconcile::run(args, cli.config.as_deref()),
        Commands::Export(args) => export::run(args, cli.config.as_deref()),
        Commands::Show(args) => show::run(args, cli.config.as_deref()),
        Commands::Config(args) => config::run(args, cli.config.as_deref()),
    }
}
