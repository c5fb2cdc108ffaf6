//! Error types for the data-loader crate.
//!
//! Every failure while reading the interactions file is reported through
//! [`DataLoadError`]. Nothing is retried: the first bad row stops the load.

use thiserror::Error;

/// Errors that can occur while loading interaction records
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The file has no header row (empty or blank-only file)
    #[error("Missing header row in {file}")]
    MissingHeader { file: String },

    /// A required column name is not present in the header row
    #[error("Missing column '{column}' in header of {file}")]
    MissingColumn { file: String, column: String },

    /// Line in data file couldn't be parsed
    ///
    /// This variant stores context about where the error occurred
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// The delimiter is not a single-byte ASCII character
    #[error("Delimiter {delimiter:?} is not an ASCII character")]
    InvalidDelimiter { delimiter: char },

    /// A row has fewer fields than the header requires
    #[error("Expected at least {expected} fields but found {found} in line {line}")]
    FieldCountMismatch {
        expected: usize,
        found: usize,
        line: usize,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
