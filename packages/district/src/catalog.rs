//! Area catalog extraction and selection-menu building.

use std::collections::HashSet;

use crime_stats_district_models::{ALL_AREAS, AreaCatalog, HierarchyKind};
use crime_stats_incident_models::IncidentRecord;

use crate::clean::clean_district;
use crate::patterns;

/// Collects, for each hierarchy kind independently, the distinct labels
/// found across all records in first-seen order.
///
/// A record may contribute to more than one kind here; the catalog only
/// feeds menus and is never used to resolve records.
#[must_use]
pub fn extract_area_catalog(records: &[IncidentRecord]) -> AreaCatalog {
    let mut catalog = AreaCatalog::new();

    for kind in HierarchyKind::all() {
        let mut seen: Vec<String> = Vec::new();
        let mut known: HashSet<String> = HashSet::new();
        for record in records {
            if let Some(label) =
                patterns::extract(*kind, &record.location).and_then(|raw| clean_district(&raw))
                && known.insert(label.clone())
            {
                seen.push(label);
            }
        }

        if !seen.is_empty() {
            log::debug!(
                "{} ({kind}): {} areas, e.g. {}",
                kind.label(),
                seen.len(),
                seen.iter().take(10).cloned().collect::<Vec<_>>().join(", ")
            );
        }
        catalog.insert(*kind, seen);
    }

    log::info!("Area catalog holds {} areas", catalog.len());
    catalog
}

/// Builds the area selection list: the all-areas sentinel followed by up
/// to `per_kind` entries of each kind, truncated to `max_options`.
#[must_use]
pub fn menu_areas(catalog: &AreaCatalog, per_kind: usize, max_options: usize) -> Vec<String> {
    std::iter::once(ALL_AREAS.to_string())
        .chain(
            catalog
                .iter()
                .flat_map(|(_, areas)| areas.iter().take(per_kind).cloned()),
        )
        .take(max_options)
        .collect()
}
