//! Parser for delimited interaction files.
//!
//! The file starts with a header row naming its columns, for example:
//!
//! ```text
//! user_id,book_id,rating
//! 1,101,5
//! 1,102,3
//! ```
//!
//! The user, item and rating columns are found by name (see [`CsvFormat`]).
//! Quoting follows RFC 4180, so quoted fields may contain the delimiter or
//! line breaks.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Positions of the three required columns in the header row
#[derive(Debug, Clone, Copy)]
struct ColumnLayout {
    user: usize,
    item: usize,
    rating: usize,
}

impl ColumnLayout {
    fn from_header(header: &StringRecord, format: &CsvFormat, file: &str) -> Result<Self> {
        let find = |name: &str| {
            header
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}') == name)
                .ok_or_else(|| DataLoadError::MissingColumn {
                    file: file.to_string(),
                    column: name.to_string(),
                })
        };
        Ok(Self {
            user: find(&format.user_column)?,
            item: find(&format.item_column)?,
            rating: find(&format.rating_column)?,
        })
    }

    /// Number of fields a row needs so every required column is present
    fn required_fields(&self) -> usize {
        self.user.max(self.item).max(self.rating) + 1
    }
}

/// Map a reader error, keeping the line it happened on
fn csv_error(err: csv::Error, file: &str) -> DataLoadError {
    let line = err.position().map_or(0, |pos| pos.line() as usize);
    let reason = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(e) => DataLoadError::IoError(e),
        _ => DataLoadError::ParseError {
            file: file.to_string(),
            line,
            reason,
        },
    }
}

/// Parse an interactions file
///
/// Blank lines are skipped. The first malformed row aborts the whole load.
pub fn parse_interactions(path: &Path, format: &CsvFormat) -> Result<Vec<Interaction>> {
    let reader = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    let file = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    parse_reader(reader, format, &file)
}

/// Parse interactions from any byte source; `file` is only used for error messages
pub fn parse_reader<R: Read>(reader: R, format: &CsvFormat, file: &str) -> Result<Vec<Interaction>> {
    if !format.delimiter.is_ascii() {
        return Err(DataLoadError::InvalidDelimiter {
            delimiter: format.delimiter,
        });
    }

    let mut reader = ReaderBuilder::new()
        .delimiter(format.delimiter as u8)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    // Header row
    let header = reader.headers().map_err(|e| csv_error(e, file))?.clone();
    if header.iter().all(|h| h.trim_start_matches('\u{feff}').is_empty()) {
        return Err(DataLoadError::MissingHeader {
            file: file.to_string(),
        });
    }
    let layout = ColumnLayout::from_header(&header, format, file)?;

    let mut interactions = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| csv_error(e, file))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line_no = record.position().map_or(0, |pos| pos.line() as usize);

        if record.len() < layout.required_fields() {
            return Err(DataLoadError::FieldCountMismatch {
                expected: layout.required_fields(),
                found: record.len(),
                line: line_no,
            });
        }

        let user_id = &record[layout.user];
        if user_id.is_empty() {
            return Err(DataLoadError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: format!("Empty {}", format.user_column),
            });
        }

        let item_id = &record[layout.item];
        if item_id.is_empty() {
            return Err(DataLoadError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: format!("Empty {}", format.item_column),
            });
        }

        let rating: f64 = record[layout.rating]
            .parse()
            .map_err(|e| DataLoadError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: format!("Invalid {}: {}", format.rating_column, e),
            })?;
        if !rating.is_finite() {
            return Err(DataLoadError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: format!("Non-finite {}: {}", format.rating_column, rating),
            });
        }

        interactions.push(Interaction::new(user_id, item_id, rating));
    }

    Ok(interactions)
}
