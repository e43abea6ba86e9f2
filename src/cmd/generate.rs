//! Generate command CLI handler.

use crate::generator::{self, GenerateConfig, GenerateStats, TableOrdering};
use std::path::PathBuf;

#[allow(clippy::too_many_arguments)]
pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    batch_size: usize,
    order_config: Option<PathBuf>,
    skip_tables: Option<String>,
    progress: bool,
    dry_run: bool,
) -> anyhow::Result<()> {
    if !file.exists() {
        anyhow::bail!("input file does not exist: {}", file.display());
    }
    if batch_size == 0 {
        anyhow::bail!("--batch-size must be at least 1");
    }

    let ordering = match order_config {
        Some(path) => TableOrdering::load(&path)?,
        None => TableOrdering::default(),
    };

    let skip_tables: Vec<String> = skip_tables
        .map(|s| {
            s.split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let config = GenerateConfig {
        input: file,
        output,
        batch_size,
        ordering,
        skip_tables,
        dry_run,
        progress,
    };

    let stats = generator::run(config)?;
    print_stats(&stats, dry_run, progress);

    Ok(())
}

fn print_stats(stats: &GenerateStats, dry_run: bool, progress: bool) {
    if !progress && !dry_run {
        return;
    }

    eprintln!();
    eprintln!("Generation Statistics:");
    eprintln!("  Tables: {}", stats.tables);
    eprintln!("  Rows: {}", stats.rows);
    eprintln!("  Statements written: {}", stats.statements);

    if dry_run {
        eprintln!();
        eprintln!("(Dry run - no output written)");
    }
}
