//! RTC Stats Report Parser Library
//!
//! A stateless, reusable library for converting multi-report WebRTC stats
//! text logs into a normalized tabular dataset.
//!
//! # Architecture
//!
//! This library is intentionally minimal and focused on parsing:
//! - Splits the log into report blocks at report-start lines
//! - Discovers field names dynamically, per report
//! - Normalizes all reports over the union of discovered fields
//! - Sorts rows by (timestamp, report_id) as opaque strings
//!
//! The library does NOT:
//! - Interpret field values (everything stays a string)
//! - Parse timestamps as datetimes
//! - Serialize tables to CSV or JSON
//!
//! Output serialization is in the application layer (rtc-stats-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use rtc_stats_parser::{parse_file, ParserConfig};
//! use std::path::Path;
//!
//! let table = parse_file(Path::new("stats.log")).unwrap();
//!
//! println!("columns: {:?}", table.columns());
//! for row in table.rows() {
//!     println!("{:?}", row);
//! }
//! ```

// Public modules
pub mod config;
pub mod parser;
pub mod types;

// Re-export main types for convenience
pub use config::{MalformedLineMode, ParserConfig};
pub use parser::{parse, parse_file, parse_file_with_config, parse_with_config};
pub use types::{ParseError, Report, Result, Table};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
