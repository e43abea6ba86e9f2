//! Inspect command - report the tables and row counts found in a dump.

use crate::input::{byte_progress_bar, open_input, Compression};
use crate::parser::DumpParser;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct TableReport {
    table: String,
    rows: usize,
    columns: usize,
}

pub fn run(file: PathBuf, json: bool, progress: bool) -> anyhow::Result<()> {
    if !file.exists() {
        anyhow::bail!("input file does not exist: {}", file.display());
    }

    let file_size = std::fs::metadata(&file)?.len();

    let compression = Compression::from_path(&file);
    if !json && compression != Compression::None {
        println!("Detected compression: {}", compression);
    }

    let bar = if progress && !json {
        Some(byte_progress_bar(file_size))
    } else {
        None
    };

    let reader = open_input(&file, bar.as_ref())?;
    let dump = DumpParser::parse(reader)?;

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    let reports: Vec<TableReport> = dump
        .iter()
        .map(|t| TableReport {
            table: t.name.clone(),
            rows: t.rows.len(),
            columns: t.columns.len(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    if reports.is_empty() {
        println!("No COPY data blocks found in {}", file.display());
        return Ok(());
    }

    println!("Found {} tables with data:\n", reports.len());
    println!("{:<45} {:>10} {:>10}", "Table Name", "Rows", "Columns");
    println!("{}", "─".repeat(67));

    let mut total_rows = 0;
    for report in &reports {
        println!(
            "{:<45} {:>10} {:>10}",
            report.table, report.rows, report.columns
        );
        total_rows += report.rows;
    }

    println!("{}", "─".repeat(67));
    println!("{:<45} {:>10} {:>10}", "TOTAL", total_rows, "-");

    Ok(())
}
