//! `lexicon report` — read-only staleness and change report.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use lexicon_core::snapshot;
use lexicon_sync::{report_folder, ChangeKind, ReportEntry};

use super::{layout, store_path};

/// Arguments for `lexicon report`.
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Sync root directory (holds data/, archive/, store.yaml).
    #[arg(long)]
    pub root: PathBuf,

    /// Store snapshot path (defaults to <root>/store.yaml).
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Show each field-level change for stale documents.
    #[arg(long)]
    pub verbose: bool,
}

impl ReportArgs {
    pub fn run(self) -> Result<()> {
        let store_file = store_path(&self.root, self.store);
        let store = snapshot::load(&store_file)
            .with_context(|| format!("could not load store snapshot {}", store_file.display()))?;

        let layout = layout(&self.root);
        let entries = report_folder(&store, &layout).context("report failed")?;

        if entries.is_empty() {
            println!("no documents found under {}", layout.data_root().display());
            return Ok(());
        }

        for entry in &entries {
            match entry {
                ReportEntry::Current { name, .. } => {
                    println!("  {}  {name}", "·".dimmed());
                }
                ReportEntry::New { name, .. } => {
                    println!("  {}  {name} {}", "+".green(), "(new)".dimmed());
                }
                ReportEntry::Stale { name, changes, .. } => {
                    println!("  {}  {name} ({} change(s))", "~".yellow(), changes.len());
                    if self.verbose {
                        for change in changes {
                            let glyph = match change.kind {
                                ChangeKind::Create => "+",
                                ChangeKind::Delete => "-",
                                _ => "~",
                            };
                            println!("       {glyph} {} {}", change.path, change.name);
                        }
                    }
                }
                ReportEntry::Failed { path, reason } => {
                    println!("  {}  {}: {reason}", "✗".red(), path.display());
                }
            }
        }
        Ok(())
    }
}
