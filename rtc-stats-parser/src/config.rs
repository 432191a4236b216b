//! Parser configuration types
//!
//! The parser needs very little configuration. The one policy decision it
//! exposes is what to do with a non-blank line that is neither a report-start
//! line nor a well-formed "key: value" pair.

use serde::{Deserialize, Serialize};

/// Configuration for the parser library
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Policy for non-blank lines missing the ": " field separator
    #[serde(default)]
    pub malformed_lines: MalformedLineMode,
}

impl ParserConfig {
    /// Create a config with default settings (fail on malformed lines)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the malformed-line policy
    pub fn with_malformed_lines(mut self, mode: MalformedLineMode) -> Self {
        self.malformed_lines = mode;
        self
    }
}

/// What to do when a field line lacks the ": " separator.
///
/// Skipping changes the output content, so the default matches the strict
/// behavior: the whole run fails and no partial table is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedLineMode {
    /// Abort parsing with a `ParseError::MalformedFieldLine`
    #[default]
    Fail,
    /// Skip the line, log a warning, and continue
    Skip,
}
