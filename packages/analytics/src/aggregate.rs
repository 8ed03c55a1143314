//! Count tables over resolved records.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crime_stats_analytics_models::{DistrictCount, YearDistrictMatrix};
use crime_stats_district::resolver::ResolvedRecord;

/// Counts occurrences of each label, descending by count. Ties keep the
/// order in which labels were first seen.
#[must_use]
pub fn ordered_counts<'a, I>(labels: I) -> Vec<(String, u64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, u64)> = Vec::new();

    for label in labels {
        if let Some(&i) = index.get(label) {
            counts[i].1 += 1;
        } else {
            index.insert(label, counts.len());
            counts.push((label, 1));
        }
    }

    // Stable sort keeps first-seen order among ties
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    counts
        .into_iter()
        .map(|(label, count)| (label.to_string(), count))
        .collect()
}

/// Incidents per district, descending by count, ties in first-seen order.
#[must_use]
pub fn counts_by_district(resolved: &[ResolvedRecord<'_>]) -> Vec<DistrictCount> {
    ordered_counts(resolved.iter().map(|r| r.district.as_str()))
        .into_iter()
        .map(|(district, count)| DistrictCount { district, count })
        .collect()
}

/// The first `n` entries of [`counts_by_district`].
#[must_use]
pub fn top_n_by_district(resolved: &[ResolvedRecord<'_>], n: usize) -> Vec<DistrictCount> {
    let mut counts = counts_by_district(resolved);
    counts.truncate(n);
    counts
}

/// Incidents per (year, district), with every district given a cell in
/// every year.
#[must_use]
pub fn counts_by_year_and_district(resolved: &[ResolvedRecord<'_>]) -> YearDistrictMatrix {
    let mut cells: BTreeMap<(i32, &str), u64> = BTreeMap::new();
    let mut years = BTreeSet::new();
    let mut districts = BTreeSet::new();

    for r in resolved {
        years.insert(r.record.year);
        districts.insert(r.district.as_str());
        *cells.entry((r.record.year, r.district.as_str())).or_default() += 1;
    }

    let counts = years
        .iter()
        .map(|year| {
            districts
                .iter()
                .map(|district| cells.get(&(*year, *district)).copied().unwrap_or(0))
                .collect()
        })
        .collect();

    YearDistrictMatrix {
        years: years.into_iter().collect(),
        districts: districts.into_iter().map(str::to_string).collect(),
        counts,
    }
}

#[cfg(test)]
mod tests {
    use crime_stats_incident_models::IncidentRecord;

    use super::*;

    fn record(year: i32) -> IncidentRecord {
        IncidentRecord {
            id: "1".to_string(),
            category: "竊盜".to_string(),
            date: String::new(),
            time_slot: "0-6".to_string(),
            location: String::new(),
            year,
        }
    }

    fn resolved<'a>(pairs: &[(&'a IncidentRecord, &str)]) -> Vec<ResolvedRecord<'a>> {
        pairs
            .iter()
            .map(|(record, district)| ResolvedRecord {
                record,
                district: (*district).to_string(),
            })
            .collect()
    }

    #[test]
    fn district_counts_descend_with_stable_ties() {
        let r = record(2023);
        let rows = resolved(&[(&r, "B"), (&r, "A"), (&r, "C"), (&r, "A"), (&r, "C")]);
        let counts = counts_by_district(&rows);
        let flat: Vec<(&str, u64)> = counts
            .iter()
            .map(|c| (c.district.as_str(), c.count))
            .collect();
        assert_eq!(flat, vec![("A", 2), ("C", 2), ("B", 1)]);
    }

    #[test]
    fn top_n_truncates() {
        let r = record(2023);
        let rows = resolved(&[(&r, "B"), (&r, "A"), (&r, "A"), (&r, "C")]);
        let top = top_n_by_district(&rows, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].district, "A");
        assert_eq!(top[1].district, "B");
        assert_eq!(top_n_by_district(&rows, 10).len(), 3);
    }

    #[test]
    fn matrix_zero_fills_missing_years() {
        let r2022 = record(2022);
        let r2023 = record(2023);
        let rows = resolved(&[(&r2022, "A"), (&r2022, "B"), (&r2023, "A"), (&r2023, "A")]);
        let matrix = counts_by_year_and_district(&rows);

        assert_eq!(matrix.years, vec![2022, 2023]);
        assert_eq!(matrix.districts, vec!["A", "B"]);
        assert_eq!(matrix.get(2023, "B"), Some(0));
        assert_eq!(matrix.get(2023, "A"), Some(2));
        assert_eq!(matrix.series("B"), Some(vec![1, 0]));
    }

    #[test]
    fn empty_input_gives_empty_tables() {
        assert!(counts_by_district(&[]).is_empty());
        assert!(counts_by_year_and_district(&[]).is_empty());
    }
}
