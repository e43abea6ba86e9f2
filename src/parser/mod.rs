//! Parser for pg_dump plain-format COPY blocks.
//!
//! Scans the dump line by line and collects the data block of every
//! `COPY public.<table> (...) FROM stdin;` statement into a [`DumpData`]
//! result. Values stay raw text here; NULL markers and escape sequences
//! are interpreted later when the SQL script is generated.

use ahash::AHashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{BufRead, BufReader, Read};

/// Data block of one table: column order and raw tab-separated rows.
#[derive(Debug, Clone)]
pub struct TableData {
    /// Table name as it appeared in the COPY header (no schema prefix)
    pub name: String,
    /// Column names in COPY order
    pub columns: Vec<String>,
    /// Rows of raw field strings, one entry per column
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    fn new(name: String, columns: Vec<String>) -> Self {
        Self {
            name,
            columns,
            rows: Vec::new(),
        }
    }
}

/// Parsed dump: tables in first-seen order with a name index.
///
/// A table whose block appears more than once keeps its original position
/// but the later block's data wins.
#[derive(Debug, Default)]
pub struct DumpData {
    tables: Vec<TableData>,
    index: AHashMap<String, usize>,
}

impl DumpData {
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&TableData> {
        self.index.get(name).map(|&i| &self.tables[i])
    }

    /// Tables in parse order
    pub fn iter(&self) -> impl Iterator<Item = &TableData> {
        self.tables.iter()
    }

    /// Total row count across all tables
    pub fn total_rows(&self) -> u64 {
        self.tables.iter().map(|t| t.rows.len() as u64).sum()
    }

    /// Drop the named tables from the result
    pub fn remove_tables(&mut self, names: &[String]) {
        self.tables.retain(|t| !names.contains(&t.name));
        self.index = self
            .tables
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name.clone(), i))
            .collect();
    }

    fn commit(&mut self, table: TableData) {
        match self.index.get(&table.name) {
            Some(&i) => self.tables[i] = table,
            None => {
                self.index.insert(table.name.clone(), self.tables.len());
                self.tables.push(table);
            }
        }
    }
}

// Full shape of a data-block header line. Anything that does not match is
// not a block start, no matter how COPY-like it looks.
static BLOCK_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^COPY public\.(\w+) \((.+?)\) FROM stdin;").unwrap());

/// Line terminating a COPY data block
const BLOCK_END: &str = "\\.";

/// Streaming line scanner for COPY data blocks.
///
/// The accumulator holds at most one open block; it is committed on the
/// `\.` terminator and silently discarded if the input ends first or a new
/// block starts on top of it (well-formed dumps never nest blocks).
#[derive(Debug, Default)]
pub struct DumpParser {
    data: DumpData,
    current: Option<TableData>,
}

impl DumpParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a complete dump from a reader
    pub fn parse<R: Read>(reader: R) -> anyhow::Result<DumpData> {
        let mut parser = Self::new();
        for line in BufReader::new(reader).lines() {
            parser.feed_line(&line?);
        }
        Ok(parser.finish())
    }

    /// Consume one input line, without its trailing newline
    pub fn feed_line(&mut self, line: &str) {
        if let Some(caps) = BLOCK_START.captures(line) {
            let name = caps[1].to_string();
            let columns = caps[2].split(',').map(|c| c.trim().to_string()).collect();
            self.current = Some(TableData::new(name, columns));
            return;
        }

        if line.trim() == BLOCK_END {
            if let Some(table) = self.current.take() {
                if !table.rows.is_empty() {
                    self.data.commit(table);
                }
            }
            return;
        }

        if let Some(table) = self.current.as_mut() {
            let row = line.split('\t').map(str::to_string).collect();
            table.rows.push(row);
        }
    }

    /// End of input. An open block has no terminator and is dropped.
    pub fn finish(self) -> DumpData {
        self.data
    }
}
