//! CSV table loading for the CLI.
//!
//! The core pipeline only sees a [`Table`]; this module is the "table
//! source" that produces one from a CSV file. First record is the header
//! row, everything after is data. Rows may have differing lengths — the
//! resolver treats missing cells as empty.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use csv::ReaderBuilder;
use label_press_core::Table;

/// Load a CSV file into a table.
///
/// An empty file is an error (there is nothing to map against); a file
/// with only a header row yields a valid table with zero rows.
pub(crate) fn load_csv(path: &Path) -> Result<Table> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("could not read CSV file: {}", path.display()))?;
    parse_csv(&content).with_context(|| format!("could not parse CSV file: {}", path.display()))
}

/// Parse CSV content: header record first, then data records.
pub(crate) fn parse_csv(content: &str) -> Result<Table> {
    if content.trim().is_empty() {
        bail!("CSV file is empty");
    }

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("could not read CSV header row")?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        // Row numbers in messages are 1-based and count the header.
        let record = record.with_context(|| format!("could not parse CSV row {}", i + 2))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Table::new(headers, rows))
}
