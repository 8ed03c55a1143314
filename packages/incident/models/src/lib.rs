#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident record and dataset types.
//!
//! Every ingestion path (the fixed-width default file and CSV uploads)
//! produces [`IncidentRecord`] values with the same five canonical fields
//! plus a derived Gregorian `year`. A [`Dataset`] is the whole table held by
//! a caller for the lifetime of one load; it is never edited in place.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The five required columns every loaded table is mapped onto.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CanonicalField {
    /// Case identifier.
    Id,
    /// Case-type label (e.g. "竊盜").
    Category,
    /// Source date token.
    Date,
    /// Time-of-day slot label (e.g. "0-6").
    TimeSlot,
    /// Free-text address.
    Location,
}

impl CanonicalField {
    /// Returns all variants in column order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Id,
            Self::Category,
            Self::Date,
            Self::TimeSlot,
            Self::Location,
        ]
    }

    /// Returns the canonical Chinese header for this field, as used by the
    /// default data file and shown in user-facing messages.
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::Id => "編號",
            Self::Category => "案類",
            Self::Date => "日期",
            Self::TimeSlot => "時段",
            Self::Location => "地點",
        }
    }
}

/// One reported case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRecord {
    /// Identifier from the source. Not validated for uniqueness.
    pub id: String,
    /// Case-type label, used only as a grouping key.
    pub category: String,
    /// Original date token, kept for display.
    pub date: String,
    /// Time-slot label, used only as a grouping key.
    pub time_slot: String,
    /// Raw address text. May contain stray whitespace.
    pub location: String,
    /// Four-digit Gregorian year derived from `date`.
    pub year: i32,
}

/// Where a [`Dataset`] was loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum DatasetSource {
    /// The local fixed-width default file.
    DefaultFile {
        /// Path the file was read from.
        path: String,
    },
    /// No default file could be found.
    Empty,
    /// A user-uploaded CSV.
    Upload {
        /// Name of the uploaded file.
        file_name: String,
        /// Encoding the bytes were decoded with.
        encoding: String,
    },
}

/// A fully loaded table of incidents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Where the records came from.
    pub source: DatasetSource,
    /// Records that survived parsing.
    pub records: Vec<IncidentRecord>,
    /// Number of input rows dropped because they were malformed or had
    /// an unusable date.
    pub dropped_rows: usize,
}

impl Dataset {
    /// Creates an empty dataset, used when no default file exists.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            source: DatasetSource::Empty,
            records: Vec::new(),
            dropped_rows: 0,
        }
    }

    /// Returns `true` if the dataset has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records in the dataset.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }
}
