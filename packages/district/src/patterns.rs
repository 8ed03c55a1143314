//! Two-segment hierarchy patterns.
//!
//! Both segments are lazy (`.+?`) so the first marker character closes the
//! first segment. `台北市大安區台北市場1號` therefore yields `台北市` +
//! `大安區` rather than running on to the second `市`.

use std::sync::LazyLock;

use crime_stats_district_models::HierarchyKind;
use regex::Regex;

fn two_segment(kind: HierarchyKind) -> Regex {
    let (first, second) = kind.markers();
    Regex::new(&format!("(.+?{first})(.+?{second})")).expect("valid regex")
}

static MUNICIPALITY_DISTRICT_RE: LazyLock<Regex> =
    LazyLock::new(|| two_segment(HierarchyKind::MunicipalityDistrict));

static COUNTY_CITY_RE: LazyLock<Regex> = LazyLock::new(|| two_segment(HierarchyKind::CountyCity));

static COUNTY_TOWNSHIP_RE: LazyLock<Regex> =
    LazyLock::new(|| two_segment(HierarchyKind::CountyTownship));

static COUNTY_TOWN_RE: LazyLock<Regex> = LazyLock::new(|| two_segment(HierarchyKind::CountyTown));

/// The compiled pattern for `kind`.
#[must_use]
pub fn pattern(kind: HierarchyKind) -> &'static Regex {
    match kind {
        HierarchyKind::MunicipalityDistrict => &MUNICIPALITY_DISTRICT_RE,
        HierarchyKind::CountyCity => &COUNTY_CITY_RE,
        HierarchyKind::CountyTownship => &COUNTY_TOWNSHIP_RE,
        HierarchyKind::CountyTown => &COUNTY_TOWN_RE,
    }
}

/// Extracts the raw (uncleaned) two-segment label for `kind`.
#[must_use]
pub fn extract(kind: HierarchyKind, location: &str) -> Option<String> {
    let caps = pattern(kind).captures(location)?;
    Some(format!("{}{}", &caps[1], &caps[2]))
}

/// Extracts a label using the first kind, in priority order, that matches.
#[must_use]
pub fn extract_any(location: &str) -> Option<(HierarchyKind, String)> {
    HierarchyKind::all()
        .iter()
        .find_map(|kind| extract(*kind, location).map(|label| (*kind, label)))
}

/// Builds a pattern capturing the lazy segment after `prefix` up to and
/// including `marker`.
///
/// # Errors
///
/// Returns the regex error if the pattern cannot be compiled.
pub fn anchored(prefix: &str, marker: char) -> Result<Regex, regex::Error> {
    Regex::new(&format!("{}(.+?{marker})", regex::escape(prefix)))
}
