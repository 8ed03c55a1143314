#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Administrative district types.
//!
//! Taiwan's local government hierarchy has two shapes relevant here:
//! special municipalities split into districts (`台北市中山區`) and counties
//! split into county-administered cities, urban townships and rural
//! townships (`新竹縣竹北市`, `彰化縣員林鎮`, `南投縣埔里鄉`). A resolved
//! district label is always one first-level segment followed by one
//! second-level segment.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Sentinel scope meaning "every area in the dataset".
pub const ALL_AREAS: &str = "全部地區";

/// Marker ending a special municipality or provincial city (`市`).
pub const CITY_MARKER: char = '市';
/// Marker ending a district (`區`).
pub const DISTRICT_MARKER: char = '區';
/// Marker ending a county (`縣`).
pub const COUNTY_MARKER: char = '縣';
/// Marker ending a rural township (`鄉`).
pub const TOWNSHIP_MARKER: char = '鄉';
/// Marker ending an urban township (`鎮`).
pub const TOWN_MARKER: char = '鎮';

/// The four two-segment hierarchy shapes, in resolution priority order.
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
pub enum HierarchyKind {
    /// `…市…區`
    MunicipalityDistrict,
    /// `…縣…市`
    CountyCity,
    /// `…縣…鄉`
    CountyTownship,
    /// `…縣…鎮`
    CountyTown,
}

impl HierarchyKind {
    /// Returns all variants in priority order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::MunicipalityDistrict,
            Self::CountyCity,
            Self::CountyTownship,
            Self::CountyTown,
        ]
    }

    /// Short Chinese label used in selection menus.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::MunicipalityDistrict => "市區",
            Self::CountyCity => "縣市",
            Self::CountyTownship => "縣鄉",
            Self::CountyTown => "縣鎮",
        }
    }

    /// The markers ending the first and second segment.
    #[must_use]
    pub const fn markers(self) -> (char, char) {
        match self {
            Self::MunicipalityDistrict => (CITY_MARKER, DISTRICT_MARKER),
            Self::CountyCity => (COUNTY_MARKER, CITY_MARKER),
            Self::CountyTownship => (COUNTY_MARKER, TOWNSHIP_MARKER),
            Self::CountyTown => (COUNTY_MARKER, TOWN_MARKER),
        }
    }
}

/// What part of the dataset a query is about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "name")]
pub enum Scope {
    /// Every record, each under its own extracted district.
    AllAreas,
    /// A complete two-segment label such as `台北市中山區` or `新竹縣竹北市`.
    District(String),
    /// A municipality such as `台北市`; records are split by district.
    Municipality(String),
    /// A county such as `新竹縣`; records are split by city/township.
    County(String),
    /// A string with no recognizable marker. Resolves nothing.
    Unrecognized(String),
}

impl Scope {
    /// Classifies a user-selected area string.
    ///
    /// A county followed by a second-level marker (`新竹縣竹北市`,
    /// `南投縣埔里鄉`) is a complete label even though it contains `市` or
    /// `縣`. Checking markers alone would make it a municipality or county
    /// scope, which anchors a search for a further `區`/`市`/`鄉`/`鎮` after
    /// the label and so matches nothing for the catalog's own entries.
    #[must_use]
    pub fn parse(area: &str) -> Self {
        let area = area.trim();

        if area == ALL_AREAS {
            return Self::AllAreas;
        }
        if area.contains(DISTRICT_MARKER) || is_county_level_label(area) {
            return Self::District(area.to_string());
        }
        if area.contains(CITY_MARKER) {
            return Self::Municipality(area.to_string());
        }
        if area.contains(COUNTY_MARKER) {
            return Self::County(area.to_string());
        }
        Self::Unrecognized(area.to_string())
    }

    /// The area string this scope was built from.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::AllAreas => ALL_AREAS,
            Self::District(s) | Self::Municipality(s) | Self::County(s) | Self::Unrecognized(s) => {
                s
            }
        }
    }

    /// Returns `true` for [`Scope::AllAreas`].
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::AllAreas)
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

fn is_county_level_label(area: &str) -> bool {
    area.find(COUNTY_MARKER).is_some_and(|i| {
        area[i + COUNTY_MARKER.len_utf8()..]
            .contains([CITY_MARKER, TOWNSHIP_MARKER, TOWN_MARKER])
    })
}

/// Districts observed in a dataset, grouped by hierarchy shape.
///
/// Only kinds with at least one entry are present. Entries keep the order
/// in which they first appear in the dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AreaCatalog {
    entries: BTreeMap<HierarchyKind, Vec<String>>,
}

impl AreaCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Records the districts found for `kind`. Empty lists are ignored.
    pub fn insert(&mut self, kind: HierarchyKind, districts: Vec<String>) {
        if !districts.is_empty() {
            self.entries.insert(kind, districts);
        }
    }

    /// Districts found for `kind`.
    #[must_use]
    pub fn get(&self, kind: HierarchyKind) -> Option<&[String]> {
        self.entries.get(&kind).map(Vec::as_slice)
    }

    /// Iterates kinds in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (HierarchyKind, &[String])> {
        self.entries.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    /// Returns `true` if no district was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of districts across all kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}
