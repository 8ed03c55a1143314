#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation over district-resolved incidents.
//!
//! [`aggregate`] produces the three count shapes the charts need (single
//! distribution, top-N ranking, year × district matrix), [`summary`] the
//! dataset overview, and [`views`] ties resolution and aggregation together
//! for a selected area.

pub mod aggregate;
pub mod summary;
pub mod views;

use thiserror::Error;

/// Errors that can occur during analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// The selection contains no records.
    #[error("No data for {selection}")]
    EmptyDataset {
        /// Description of what was selected.
        selection: String,
    },
}
