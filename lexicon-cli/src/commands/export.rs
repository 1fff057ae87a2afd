//! `lexicon export` — write document files for every root item.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use lexicon_core::snapshot;
use lexicon_sync::{export_store, ExportEntry};

use super::{audit_log, layout, store_path};

/// Arguments for `lexicon export`.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Sync root directory (holds data/, archive/, store.yaml).
    #[arg(long)]
    pub root: PathBuf,

    /// Store snapshot path (defaults to <root>/store.yaml).
    #[arg(long)]
    pub store: Option<PathBuf>,
}

impl ExportArgs {
    pub fn run(self) -> Result<()> {
        let store_file = store_path(&self.root, self.store);
        let store = snapshot::load(&store_file)
            .with_context(|| format!("could not load store snapshot {}", store_file.display()))?;

        let layout = layout(&self.root);
        let mut audit = audit_log(&self.root);
        let entries = export_store(&store, &layout, &mut audit).context("export failed")?;

        let mut written = 0;
        let mut failed = 0;
        for entry in &entries {
            match entry {
                ExportEntry::Written { path, name } => {
                    written += 1;
                    println!("  {}  {name} -> {}", "✎".green(), path.display());
                }
                ExportEntry::Unchanged { name, .. } => {
                    println!("  {}  {name}", "·".dimmed());
                }
                ExportEntry::Failed { name, reason } => {
                    failed += 1;
                    println!("  {}  {name}: {reason}", "✗".red());
                }
            }
        }
        println!(
            "✓ exported {written} of {} item(s), {failed} failed",
            entries.len()
        );
        Ok(())
    }
}
