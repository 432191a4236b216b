//! Output serialization for parsed tables
//!
//! The parser library stays string-in/table-out; everything that touches an
//! output file lives here. CSV is the primary format, JSON an alternative for
//! downstream tooling that prefers records over rows.

use anyhow::{Context, Result};
use clap::ValueEnum;
use rtc_stats_parser::Table;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Json,
}

/// Serialize `table` to `path` in the requested format, overwriting any
/// existing file.
pub fn write_table(table: &Table, path: &Path, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Csv => write_csv(table, path),
        OutputFormat::Json => write_json(table, path),
    }
}

/// Write the table as CSV: a header row of column names, one row per report,
/// null cells serialized as empty fields.
pub fn write_csv(table: &Table, path: &Path) -> Result<()> {
    let writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create output file {:?}", path))?;
    write_csv_to(table, writer)
}

fn write_csv_to<W: Write>(table: &Table, mut writer: csv::Writer<W>) -> Result<()> {
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the table as a pretty-printed JSON array of records, null cells
/// serialized as JSON null.
pub fn write_json(table: &Table, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create output file {:?}", path))?;
    write_json_to(table, BufWriter::new(file))
}

fn write_json_to<W: Write>(table: &Table, mut writer: W) -> Result<()> {
    let records: Vec<serde_json::Map<String, serde_json::Value>> = table
        .rows()
        .iter()
        .map(|row| {
            table
                .columns()
                .iter()
                .zip(row)
                .map(|(column, cell)| {
                    let value = match cell {
                        Some(v) => serde_json::Value::String(v.clone()),
                        None => serde_json::Value::Null,
                    };
                    (column.clone(), value)
                })
                .collect()
        })
        .collect();

    serde_json::to_writer_pretty(&mut writer, &records)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
