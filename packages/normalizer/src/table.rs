//! Minimal CSV table parsing.
//!
//! Rows are kept as plain strings; typing happens after the columns have
//! been mapped.

use crate::columns::clean_header;

/// Errors from parsing decoded text as CSV.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// The CSV reader rejected the input.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The header row was missing or blank.
    #[error("CSV text contains no header row")]
    NoHeader,
}

/// A parsed CSV table with cleaned headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    /// Header names, trimmed and stripped of byte order marks.
    pub headers: Vec<String>,
    /// Data rows. Short rows are not padded; use [`cell`] to read them.
    pub rows: Vec<Vec<String>>,
}

/// Parses decoded text as a comma-separated table.
///
/// # Errors
///
/// Returns [`TableError`] if the reader fails or the header row is blank.
pub fn parse_table(text: &str) -> Result<RawTable, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(clean_header).collect();

    if headers.iter().all(String::is_empty) {
        return Err(TableError::NoHeader);
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_owned).collect());
    }

    Ok(RawTable { headers, rows })
}

/// Returns the cell at `index`, or `""` if the row is short.
#[must_use]
pub fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map_or("", String::as_str)
}
