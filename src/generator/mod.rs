//! SQL import-script generation from parsed dump data.
//!
//! Assembles the replay script in a fixed shape:
//! - header comment and a session statement disabling FK/trigger enforcement
//! - TRUNCATE section, children before parents
//! - batched INSERT sections, parents before children
//! - sequence resets for every table
//! - closing session statement restoring enforcement

pub mod insert;
pub mod ordering;

pub use insert::{escape_value, insert_statements, DEFAULT_BATCH_SIZE};
pub use ordering::TableOrdering;

use crate::input::{byte_progress_bar, open_input};
use crate::parser::{DumpData, DumpParser};
use anyhow::Context;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Configuration for the generate command
#[derive(Debug)]
pub struct GenerateConfig {
    /// Input dump file
    pub input: PathBuf,
    /// Output SQL file (None for stdout)
    pub output: Option<PathBuf>,
    /// Rows per INSERT statement
    pub batch_size: usize,
    /// Truncate/insert ordering policy
    pub ordering: TableOrdering,
    /// Tables excluded from every section
    pub skip_tables: Vec<String>,
    /// Dry run mode
    pub dry_run: bool,
    /// Show progress
    pub progress: bool,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: None,
            batch_size: DEFAULT_BATCH_SIZE,
            ordering: TableOrdering::default(),
            skip_tables: Vec::new(),
            dry_run: false,
            progress: false,
        }
    }
}

/// Statistics from script generation
#[derive(Debug, Default)]
pub struct GenerateStats {
    /// Tables carried into the script
    pub tables: usize,
    /// Data rows across all tables
    pub rows: u64,
    /// SQL statements emitted
    pub statements: u64,
}

/// Run the generate command
pub fn run(config: GenerateConfig) -> anyhow::Result<GenerateStats> {
    let file_size = std::fs::metadata(&config.input)
        .with_context(|| format!("cannot read input file: {}", config.input.display()))?
        .len();

    let progress_bar = if config.progress {
        let pb = byte_progress_bar(file_size);
        pb.set_message("parsing dump...");
        Some(pb)
    } else {
        None
    };

    let reader = open_input(&config.input, progress_bar.as_ref())?;
    let mut dump = DumpParser::parse(reader)?;

    if let Some(pb) = &progress_bar {
        pb.finish_with_message(format!("parsed {} tables", dump.len()));
    }

    if !config.skip_tables.is_empty() {
        dump.remove_tables(&config.skip_tables);
    }

    let mut writer: Box<dyn Write> = if config.dry_run {
        Box::new(std::io::sink())
    } else {
        match &config.output {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                Box::new(BufWriter::with_capacity(256 * 1024, File::create(path)?))
            }
            None => Box::new(BufWriter::new(std::io::stdout())),
        }
    };

    let source = config.input.display().to_string();
    let stats = write_script(
        &mut writer,
        &dump,
        &config.ordering,
        config.batch_size,
        &source,
    )?;
    writer.flush()?;

    Ok(stats)
}

/// Write the complete import script for a parsed dump.
pub fn write_script<W: Write>(
    writer: &mut W,
    dump: &DumpData,
    ordering: &TableOrdering,
    batch_size: usize,
    source: &str,
) -> anyhow::Result<GenerateStats> {
    let mut stats = GenerateStats {
        tables: dump.len(),
        rows: dump.total_rows(),
        statements: 0,
    };

    writeln!(writer, "-- Generated by pg-replay")?;
    writeln!(writer, "-- Source: {}", source)?;
    writeln!(
        writer,
        "-- Date: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(writer)?;

    writeln!(writer, "SET session_replication_role = 'replica';")?;
    stats.statements += 1;
    writeln!(writer)?;

    writeln!(writer, "-- Truncate all tables")?;
    for table in ordering.truncation_order(dump) {
        writeln!(writer, "TRUNCATE TABLE {} CASCADE;", table)?;
        stats.statements += 1;
    }
    writeln!(writer)?;

    for name in ordering.insertion_order(dump) {
        if let Some(table) = dump.get(name) {
            writeln!(writer, "-- Table: {} ({} rows)", name, table.rows.len())?;
            for stmt in insert_statements(table, batch_size) {
                writeln!(writer, "{}", stmt)?;
                stats.statements += 1;
            }
            writeln!(writer)?;
        }
    }

    writeln!(writer, "-- Reset sequences")?;
    for table in dump.iter() {
        writeln!(
            writer,
            "SELECT setval(pg_get_serial_sequence('{}', 'id'), COALESCE((SELECT MAX(id) FROM {}), 1), true);",
            table.name, table.name
        )?;
        stats.statements += 1;
    }
    writeln!(writer)?;

    writeln!(writer, "SET session_replication_role = 'origin';")?;
    stats.statements += 1;

    Ok(stats)
}
