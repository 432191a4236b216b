//! Stats log parser
//!
//! Converts the free-form multi-report text format into a [`Table`]. A report
//! block starts at a line beginning with "172" (the node's address opens
//! every report header) and runs until the next such line or end of input.
//! All other non-blank lines are "key: value" field lines belonging to the
//! current report.

use crate::config::{MalformedLineMode, ParserConfig};
use crate::types::{ParseError, Report, Result, Table};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Prefix that marks the start of a new report block
pub const REPORT_START_PREFIX: &str = "172";

/// Delimiter separating the timestamp from the report id on a start line
pub const REPORT_ID_DELIMITER: &str = " - Stats report id: ";

/// Separator between a field name and its value
const FIELD_SEPARATOR: &str = ": ";

/// Parse the full text of a stats log into a normalized table.
///
/// Strict mode: the first malformed field line aborts the run. Use
/// [`parse_with_config`] to skip malformed lines instead.
///
/// # Example
/// ```
/// let content = "172.0.0.1 - Stats report id: RTCAudioSource_2\naudioLevel: 0.5\n";
/// let table = rtc_stats_parser::parse(content).unwrap();
/// assert_eq!(table.len(), 1);
/// assert_eq!(table.columns()[3], "audioLevel");
/// ```
pub fn parse(content: &str) -> Result<Table> {
    parse_with_config(content, &ParserConfig::default())
}

/// Parse with an explicit configuration.
///
/// Pure function of its inputs: no I/O, no state shared across calls.
pub fn parse_with_config(content: &str, config: &ParserConfig) -> Result<Table> {
    let mut reports: Vec<Report> = Vec::new();
    let mut field_universe: BTreeSet<String> = BTreeSet::new();
    let mut current = Report::default();

    for (idx, line) in content.split('\n').enumerate() {
        let line_no = idx + 1;

        if line.starts_with(REPORT_START_PREFIX) {
            // New report: finalize the one being accumulated, if any
            if !current.is_empty() {
                reports.push(std::mem::take(&mut current));
            }

            let (timestamp, report_id) = line
                .split_once(REPORT_ID_DELIMITER)
                .ok_or_else(|| ParseError::MalformedReportStart {
                    line_no,
                    line: line.to_string(),
                })?;
            let report_id = report_id.trim();
            current.timestamp = Some(timestamp.trim().to_string());
            current.report_id = Some(report_id.to_string());
            // Type is the id up to the first underscore, the whole id if none
            current.kind = Some(
                report_id
                    .split('_')
                    .next()
                    .unwrap_or(report_id)
                    .to_string(),
            );
        } else if !line.trim().is_empty() {
            match line.split_once(FIELD_SEPARATOR) {
                Some((key, value)) => {
                    current.set_field(key, value);
                    field_universe.insert(key.to_string());
                }
                None => match config.malformed_lines {
                    MalformedLineMode::Fail => {
                        return Err(ParseError::MalformedFieldLine {
                            line_no,
                            line: line.to_string(),
                        });
                    }
                    MalformedLineMode::Skip => {
                        log::warn!("skipping malformed field line {}: {:?}", line_no, line);
                    }
                },
            }
        }
        // Blank lines are ignored
    }

    // The last report has no start line after it to finalize it
    if !current.is_empty() {
        reports.push(current);
    }

    log::debug!(
        "parsed {} reports, {} discovered fields",
        reports.len(),
        field_universe.len()
    );

    Ok(Table::from_reports(reports, field_universe))
}

/// Read a stats log from `path` and parse it.
///
/// A missing or unreadable file surfaces as [`ParseError::Io`].
pub fn parse_file(path: &Path) -> Result<Table> {
    parse_file_with_config(path, &ParserConfig::default())
}

/// Read a stats log from `path` and parse it with an explicit configuration.
pub fn parse_file_with_config(path: &Path, config: &ParserConfig) -> Result<Table> {
    log::info!("Parsing stats log: {:?}", path);
    let content = fs::read_to_string(path)?;
    parse_with_config(&content, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC_SAMPLE: &str = "\
172.0.0.1 - Stats report id: RTCIceCandidatePair_1
bytesSent: 100
packetsLost: 2

172.0.0.1 - Stats report id: RTCAudioSource_2
audioLevel: 0.5
";

    #[test]
    fn test_two_report_sample() {
        let table = parse(SPEC_SAMPLE).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.columns(),
            &[
                "timestamp",
                "report_id",
                "type",
                "audioLevel",
                "bytesSent",
                "packetsLost"
            ]
        );

        // String sort puts RTCAudioSource_2 before RTCIceCandidatePair_1
        let row = &table.rows()[0];
        assert_eq!(row[0].as_deref(), Some("172.0.0.1"));
        assert_eq!(row[1].as_deref(), Some("RTCAudioSource_2"));
        assert_eq!(row[2].as_deref(), Some("RTCAudioSource"));
        assert_eq!(row[3].as_deref(), Some("0.5"));
        assert_eq!(row[4], None);
        assert_eq!(row[5], None);

        let row = &table.rows()[1];
        assert_eq!(row[1].as_deref(), Some("RTCIceCandidatePair_1"));
        assert_eq!(row[2].as_deref(), Some("RTCIceCandidatePair"));
        assert_eq!(row[3], None);
        assert_eq!(row[4].as_deref(), Some("100"));
        assert_eq!(row[5].as_deref(), Some("2"));
    }

    #[test]
    fn test_every_row_covers_every_column() {
        let table = parse(SPEC_SAMPLE).unwrap();
        for row in table.rows() {
            assert_eq!(row.len(), table.columns().len());
        }
    }

    #[test]
    fn test_type_without_underscore_is_whole_id() {
        let table = parse("172.0.0.1 - Stats report id: RTCPeerConnection\n").unwrap();
        assert_eq!(table.rows()[0][2].as_deref(), Some("RTCPeerConnection"));
    }

    #[test]
    fn test_last_report_is_finalized_without_trailing_start_line() {
        let content = "172.0.0.1 - Stats report id: RTCCodec_96\nmimeType: audio/opus";
        let table = parse(content).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0][3].as_deref(), Some("audio/opus"));
    }

    #[test]
    fn test_empty_input_yields_empty_table() {
        let table = parse("").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns(), &["timestamp", "report_id", "type"]);

        let table = parse("\n\n   \n").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_malformed_field_line_fails() {
        let content = "172.0.0.1 - Stats report id: RTCAudioSource_2\n\
                       malformed line without colon-space\n";
        let err = parse(content).unwrap_err();
        match err {
            ParseError::MalformedFieldLine { line_no, .. } => assert_eq!(line_no, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_field_line_skipped_in_skip_mode() {
        let content = "172.0.0.1 - Stats report id: RTCAudioSource_2\n\
                       malformed line without colon-space\n\
                       audioLevel: 0.5\n";
        let config = ParserConfig::new().with_malformed_lines(MalformedLineMode::Skip);
        let table = parse_with_config(content, &config).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.columns().len(), 4);
        assert_eq!(table.rows()[0][3].as_deref(), Some("0.5"));
    }

    #[test]
    fn test_malformed_report_start_fails_even_in_skip_mode() {
        let config = ParserConfig::new().with_malformed_lines(MalformedLineMode::Skip);
        let err = parse_with_config("172.0.0.1 stats dump\n", &config).unwrap_err();
        assert!(matches!(err, ParseError::MalformedReportStart { line_no: 1, .. }));
    }

    #[test]
    fn test_duplicate_field_last_assignment_wins() {
        let content = "172.0.0.1 - Stats report id: RTCAudioSource_2\n\
                       audioLevel: 0.5\n\
                       audioLevel: 0.7\n";
        let table = parse(content).unwrap();
        assert_eq!(table.rows()[0][3].as_deref(), Some("0.7"));
    }

    #[test]
    fn test_value_keeps_extra_separators() {
        // Only the first ": " splits; the rest belongs to the value
        let content = "172.0.0.1 - Stats report id: RTCCodec_96\n\
                       sdpFmtpLine: minptime=10: useinbandfec=1\n";
        let table = parse(content).unwrap();
        assert_eq!(
            table.rows()[0][3].as_deref(),
            Some("minptime=10: useinbandfec=1")
        );
    }

    #[test]
    fn test_orphan_fields_before_first_start_line() {
        let content = "bytesSent: 5\n\
                       172.0.0.1 - Stats report id: RTCAudioSource_2\n\
                       audioLevel: 0.5\n";
        let table = parse(content).unwrap();
        assert_eq!(table.len(), 2);
        // Null headline cells sort before any value
        let orphan = &table.rows()[0];
        assert_eq!(orphan[0], None);
        assert_eq!(orphan[1], None);
        assert_eq!(orphan[2], None);
        assert_eq!(orphan[4].as_deref(), Some("5"));
    }

    #[test]
    fn test_rows_sorted_by_timestamp_then_report_id() {
        let content = "\
172.0.0.2 - Stats report id: B_1
172.0.0.1 - Stats report id: B_1
172.0.0.1 - Stats report id: A_1
";
        let table = parse(content).unwrap();
        let keys: Vec<(Option<&str>, Option<&str>)> = table
            .rows()
            .iter()
            .map(|r| (r[0].as_deref(), r[1].as_deref()))
            .collect();
        assert_eq!(
            keys,
            vec![
                (Some("172.0.0.1"), Some("A_1")),
                (Some("172.0.0.1"), Some("B_1")),
                (Some("172.0.0.2"), Some("B_1")),
            ]
        );
    }

    #[test]
    fn test_reparse_is_idempotent() {
        let first = parse(SPEC_SAMPLE).unwrap();
        let second = parse(SPEC_SAMPLE).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_parse_file_missing_input() {
        let err = parse_file(Path::new("/nonexistent/stats.log")).unwrap_err();
        assert!(matches!(err, ParseError::Io(_)));
    }
}
