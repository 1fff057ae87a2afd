//! Lexicon — dictionary tree synchronization CLI.
//!
//! # Usage
//!
//! ```text
//! lexicon export --root <dir> [--store <path>]
//! lexicon import --root <dir> [--store <path>]
//! lexicon report --root <dir> [--store <path>]
//! ```
//!
//! `<root>` holds the whole sync surface: `data/` with the document trees,
//! `archive/` with reconciled orphans, `store.yaml` with the store
//! snapshot, and `actions.jsonl` with recorded renames.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{export::ExportArgs, import::ImportArgs, report::ReportArgs};

#[derive(Parser, Debug)]
#[command(
    name = "lexicon",
    version,
    about = "Synchronize localized dictionary trees with document files",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a document file per root item and heal renamed orphans.
    Export(ExportArgs),

    /// Import every document under the data root into the store.
    Import(ImportArgs),

    /// Show which documents are current, stale, or new — read-only.
    Report(ReportArgs),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Export(args) => args.run(),
        Commands::Import(args) => args.run(),
        Commands::Report(args) => args.run(),
    }
}
