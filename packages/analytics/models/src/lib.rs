#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Count tables and summary statistics.
//!
//! These are the shapes handed to chart and embed renderers: ordered
//! `(label, count)` sequences and a zero-filled year × district matrix.

use crime_stats_district_models::AreaCatalog;
use serde::{Deserialize, Serialize};

/// Number of incidents under one district label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictCount {
    /// Resolved district label.
    pub district: String,
    /// Number of incidents.
    pub count: u64,
}

/// Number of incidents under a free-text grouping label (case type, time
/// slot).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelCount {
    /// Grouping label.
    pub label: String,
    /// Number of incidents.
    pub count: u64,
}

/// Number of incidents in one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearCount {
    /// Gregorian year.
    pub year: i32,
    /// Number of incidents.
    pub count: u64,
}

/// Inclusive span of years in a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    /// Earliest year.
    pub min: i32,
    /// Latest year.
    pub max: i32,
}

impl std::fmt::Display for YearRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.min, self.max)
    }
}

/// Incident counts per (year, district), zero-filled.
///
/// Every district that appears in any year has a cell for every year, so a
/// stacked chart gets a series of equal length per district.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearDistrictMatrix {
    /// Years in ascending order (rows).
    pub years: Vec<i32>,
    /// Districts in ascending label order (columns).
    pub districts: Vec<String>,
    /// `counts[row][column]`.
    pub counts: Vec<Vec<u64>>,
}

impl YearDistrictMatrix {
    /// Returns the cell for `(year, district)`, or `None` if either key is
    /// not part of the matrix. Combinations without incidents are `Some(0)`.
    #[must_use]
    pub fn get(&self, year: i32, district: &str) -> Option<u64> {
        let row = self.years.iter().position(|y| *y == year)?;
        let col = self.districts.iter().position(|d| d == district)?;
        self.counts.get(row)?.get(col).copied()
    }

    /// One district's counts across all years, in year order.
    #[must_use]
    pub fn series(&self, district: &str) -> Option<Vec<u64>> {
        let col = self.districts.iter().position(|d| d == district)?;
        Some(self.counts.iter().map(|row| row[col]).collect())
    }

    /// Total incidents in `year` across all districts.
    #[must_use]
    pub fn year_total(&self, year: i32) -> Option<u64> {
        let row = self.years.iter().position(|y| *y == year)?;
        Some(self.counts[row].iter().sum())
    }

    /// Returns `true` if the matrix has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.years.is_empty() || self.districts.is_empty()
    }
}

/// Headline statistics for a loaded dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStatistics {
    /// Number of records.
    pub total_count: u64,
    /// Earliest and latest year.
    pub year_range: YearRange,
    /// Records per year, ascending by year.
    pub years: Vec<YearCount>,
    /// Records per case type, descending by count.
    pub categories: Vec<LabelCount>,
    /// Records per time slot, descending by count.
    pub time_slots: Vec<LabelCount>,
    /// Districts available for selection.
    pub districts_catalog: AreaCatalog,
}

/// A titled single-year distribution across districts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictDistribution {
    /// Chart title.
    pub title: String,
    /// Year the distribution covers.
    pub year: i32,
    /// Counts, descending.
    pub counts: Vec<DistrictCount>,
}

/// A titled top-N district ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictRanking {
    /// Chart title.
    pub title: String,
    /// Requested number of entries.
    pub top_n: usize,
    /// At most `top_n` counts, descending.
    pub counts: Vec<DistrictCount>,
}

/// A titled multi-year breakdown by district.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyBreakdown {
    /// Chart title.
    pub title: String,
    /// Zero-filled counts.
    pub matrix: YearDistrictMatrix,
}
