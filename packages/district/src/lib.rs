#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Address-to-district resolution.
//!
//! Incident locations are free text: `台北市大安區復興南路一段`,
//! `  台北市 大安區  `, `新竹縣竹北市成功路`. This crate pulls a canonical
//! two-segment district label out of each one, either for every record
//! ([`Scope::AllAreas`]) or within a user-selected municipality, county or
//! district, and builds the [`AreaCatalog`] used to populate area menus.
//!
//! Segment matching is non-greedy: the first `市` or `縣` in an address is
//! the real boundary, so a borough or market name further along
//! (`…市場`, `…市北里`) never widens the match.
//!
//! A record that does not resolve is not an error. It is reported in
//! [`resolver::Resolution::unresolved`] and left out of every count.

pub mod catalog;
pub mod clean;
pub mod patterns;
pub mod resolver;

pub use crime_stats_district_models::{ALL_AREAS, AreaCatalog, HierarchyKind, Scope};

/// Errors that abort a resolve call.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// A scope-anchored pattern could not be compiled.
    #[error("Invalid pattern for scope '{scope}': {source}")]
    Pattern {
        /// The scope label the pattern was built from.
        scope: String,
        /// Underlying regex error.
        source: regex::Error,
    },
}
