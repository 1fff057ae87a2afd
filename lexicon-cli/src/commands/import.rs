//! `lexicon import` — import document files into the store snapshot.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use lexicon_core::snapshot;
use lexicon_sync::{import_folder, ImportEntry};

use super::{audit_log, layout, store_path};

/// Arguments for `lexicon import`.
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Sync root directory (holds data/, archive/, store.yaml).
    #[arg(long)]
    pub root: PathBuf,

    /// Store snapshot path (defaults to <root>/store.yaml).
    #[arg(long)]
    pub store: Option<PathBuf>,
}

impl ImportArgs {
    pub fn run(self) -> Result<()> {
        let store_file = store_path(&self.root, self.store);
        let mut store = snapshot::load(&store_file)
            .with_context(|| format!("could not load store snapshot {}", store_file.display()))?;

        let layout = layout(&self.root);
        let mut audit = audit_log(&self.root);
        let entries = import_folder(&mut store, &layout, &mut audit).context("import failed")?;

        snapshot::save(&store_file, &store)
            .with_context(|| format!("could not save store snapshot {}", store_file.display()))?;

        let mut imported = 0;
        let mut failed = 0;
        for entry in &entries {
            match entry {
                ImportEntry::Imported { name, path, .. } => {
                    imported += 1;
                    println!("  {}  {name} <- {}", "✎".green(), path.display());
                }
                ImportEntry::Failed { path, reason } => {
                    failed += 1;
                    println!("  {}  {}: {reason}", "✗".red(), path.display());
                }
            }
        }
        println!(
            "✓ imported {imported} of {} document(s), {failed} failed",
            entries.len()
        );
        Ok(())
    }
}
