#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Turns raw uploads into [`IncidentRecord`] tables.
//!
//! Uploaded CSV files arrive in whatever encoding the exporting tool chose
//! (UTF-8, Big5, GBK, ...) and with whatever header spellings the source
//! agency used. This crate detects the encoding, maps the headers onto the
//! five [`CanonicalField`]s, and derives a Gregorian year for every row.
//! The fixed-width default file goes through [`fixed_width`] instead.
//!
//! Nothing here performs I/O; callers hand in bytes or text.

pub mod columns;
pub mod dates;
pub mod encoding;
pub mod fixed_width;
pub mod table;

use crime_stats_incident_models::{CanonicalField, IncidentRecord};

use crate::columns::ColumnMapping;
use crate::dates::DateStrategy;
use crate::table::RawTable;

/// Errors that can occur while normalizing an input file.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    /// No candidate encoding both decoded the bytes and parsed as a table.
    #[error("Unable to decode the file as a table with any candidate encoding")]
    UnparsableFile,

    /// A required column could not be found among the headers.
    #[error("Missing required column: {0}")]
    MissingRequiredColumn(CanonicalField),

    /// None of the year derivation strategies worked for the date column.
    #[error("Unable to derive a year from the date column")]
    UnparsableDateFormat,

    /// Every row was dropped.
    #[error("Input contains no valid records")]
    NoValidRecords,
}

/// Result of loading a CSV upload.
#[derive(Debug, Clone)]
pub struct LoadedCsv {
    /// Records with a derived year.
    pub records: Vec<IncidentRecord>,
    /// Label of the encoding that produced the table.
    pub encoding: &'static str,
    /// Strategy that produced the `year` column.
    pub date_strategy: DateStrategy,
    /// Rows dropped because their date could not be parsed.
    pub dropped_rows: usize,
}

/// Decodes, maps and normalizes an uploaded CSV buffer.
///
/// Candidate encodings are tried in [`encoding::candidates`] order. The
/// first one whose text parses as a table with all five canonical columns
/// wins.
///
/// # Errors
///
/// * [`NormalizeError::MissingRequiredColumn`] if at least one candidate
///   produced a table but none had every required column (the first such
///   failure is reported).
/// * [`NormalizeError::UnparsableFile`] if no candidate produced a table.
/// * [`NormalizeError::UnparsableDateFormat`] if the date column cannot be
///   turned into years.
/// * [`NormalizeError::NoValidRecords`] if no row survives.
pub fn load_csv_bytes(bytes: &[u8]) -> Result<LoadedCsv, NormalizeError> {
    let detected = encoding::detect(bytes);
    log::info!("Detected upload encoding: {}", detected.name());

    let mut mapping_error = None;

    for candidate in encoding::candidates(detected) {
        let Some(text) = candidate.decode(bytes) else {
            log::debug!("Encoding {} failed to decode upload", candidate.label);
            continue;
        };

        let table = match table::parse_table(&text) {
            Ok(table) => table,
            Err(e) => {
                log::warn!("Encoding {} decoded but did not parse: {e}", candidate.label);
                continue;
            }
        };

        match columns::map_columns(&table.headers) {
            Ok(mapping) => {
                log::info!("Parsed upload using encoding {}", candidate.label);
                return build_records(&table, &mapping, candidate.label);
            }
            Err(e) => {
                log::debug!("Encoding {} produced unusable headers: {e}", candidate.label);
                mapping_error.get_or_insert(e);
            }
        }
    }

    Err(mapping_error.unwrap_or(NormalizeError::UnparsableFile))
}

fn build_records(
    table: &RawTable,
    mapping: &ColumnMapping,
    encoding: &'static str,
) -> Result<LoadedCsv, NormalizeError> {
    let dates: Vec<&str> = table
        .rows
        .iter()
        .map(|row| table::cell(row, mapping.index(CanonicalField::Date)))
        .collect();

    let derived = dates::derive_years(&dates)?;
    let dropped_rows = derived.dropped();

    let records: Vec<IncidentRecord> = table
        .rows
        .iter()
        .zip(&derived.years)
        .filter_map(|(row, year)| {
            let year = (*year)?;
            let field = |f: CanonicalField| table::cell(row, mapping.index(f));
            Some(IncidentRecord {
                id: field(CanonicalField::Id).trim().to_string(),
                category: field(CanonicalField::Category).trim().to_string(),
                date: field(CanonicalField::Date).trim().to_string(),
                time_slot: field(CanonicalField::TimeSlot).trim().to_string(),
                location: field(CanonicalField::Location).to_string(),
                year,
            })
        })
        .collect();

    if records.is_empty() {
        return Err(NormalizeError::NoValidRecords);
    }

    log::info!(
        "Loaded {} records ({dropped_rows} dropped, years via {})",
        records.len(),
        derived.strategy
    );

    Ok(LoadedCsv {
        records,
        encoding,
        date_strategy: derived.strategy,
        dropped_rows,
    })
}
