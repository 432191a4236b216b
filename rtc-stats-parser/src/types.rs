//! Core types for the stats report parser library
//!
//! This module defines the types the parser emits when processing a stats log.
//! The parser is stateless and only outputs a normalized table - it does not
//! interpret field values or track anything across invocations.

use std::collections::{BTreeMap, BTreeSet};

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;

/// The three columns every table carries, in their fixed order.
pub const HEADLINE_COLUMNS: [&str; 3] = ["timestamp", "report_id", "type"];

/// Errors that can occur during parsing
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("malformed report start at line {line_no}: missing \" - Stats report id: \" delimiter in {line:?}")]
    MalformedReportStart { line_no: usize, line: String },

    #[error("malformed field line at line {line_no}: missing \": \" separator in {line:?}")]
    MalformedFieldLine { line_no: usize, line: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One logical record extracted from a contiguous block of the log.
///
/// The headline attributes are optional: field lines that appear before any
/// report-start line still accumulate into a report, which is then emitted
/// with null headline cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    /// Timestamp in the log's native format (never interpreted as a datetime)
    pub timestamp: Option<String>,
    /// Full report identifier, e.g. "RTCIceCandidatePair_1"
    pub report_id: Option<String>,
    /// Report type, serialized under the column name "type": the part of
    /// `report_id` before the first underscore (the whole id if none)
    pub kind: Option<String>,
    /// Dynamically discovered fields, keyed by field name
    pub fields: BTreeMap<String, String>,
}

impl Report {
    /// True if nothing has been assigned into this report yet
    pub fn is_empty(&self) -> bool {
        self.timestamp.is_none()
            && self.report_id.is_none()
            && self.kind.is_none()
            && self.fields.is_empty()
    }

    /// Assign a field into this report. Keys that collide with a headline
    /// column overwrite the headline attribute instead of shadowing it in a
    /// second column. Later assignments to the same key win.
    pub fn set_field(&mut self, key: &str, value: &str) {
        match key {
            "timestamp" => self.timestamp = Some(value.to_string()),
            "report_id" => self.report_id = Some(value.to_string()),
            "type" => self.kind = Some(value.to_string()),
            _ => {
                self.fields.insert(key.to_string(), value.to_string());
            }
        }
    }

    /// Look up this report's value for a column name
    pub fn value(&self, column: &str) -> Option<&str> {
        match column {
            "timestamp" => self.timestamp.as_deref(),
            "report_id" => self.report_id.as_deref(),
            "type" => self.kind.as_deref(),
            _ => self.fields.get(column).map(String::as_str),
        }
    }
}

/// A normalized tabular view over a set of reports - the primary output of
/// the parser.
///
/// Columns are ordered `timestamp, report_id, type`, then the remaining
/// discovered fields alphabetically. Rows are sorted ascending by
/// `(timestamp, report_id)` as strings. Every row has one cell per column;
/// absent fields are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Build a table from finalized reports and the field universe gathered
    /// while parsing them.
    pub fn from_reports(reports: Vec<Report>, field_universe: BTreeSet<String>) -> Self {
        let mut columns: Vec<String> =
            HEADLINE_COLUMNS.iter().map(|c| c.to_string()).collect();
        columns.extend(
            field_universe
                .into_iter()
                .filter(|f| !HEADLINE_COLUMNS.contains(&f.as_str())),
        );

        let mut rows: Vec<Vec<Option<String>>> = reports
            .into_iter()
            .map(|report| {
                columns
                    .iter()
                    .map(|col| report.value(col).map(str::to_string))
                    .collect()
            })
            .collect();

        // Deliberately a string sort, not a datetime sort: the log's
        // timestamps are treated as opaque text.
        rows.sort_by(|a, b| (&a[0], &a[1]).cmp(&(&b[0], &b[1])));

        Self { columns, rows }
    }

    /// Column names in output order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in output order; one `Option<String>` cell per column
    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
