//! Dataset overview.

use std::collections::{BTreeMap, BTreeSet};

use crime_stats_analytics_models::{LabelCount, SummaryStatistics, YearCount, YearRange};
use crime_stats_district::catalog::extract_area_catalog;
use crime_stats_incident_models::IncidentRecord;

use crate::AnalyticsError;
use crate::aggregate::ordered_counts;

fn label_counts<'a>(labels: impl IntoIterator<Item = &'a str>) -> Vec<LabelCount> {
    ordered_counts(labels)
        .into_iter()
        .map(|(label, count)| LabelCount { label, count })
        .collect()
}

/// Builds the overview shown before any chart is drawn.
///
/// # Errors
///
/// Returns [`AnalyticsError::EmptyDataset`] if `records` is empty.
pub fn summary_statistics(records: &[IncidentRecord]) -> Result<SummaryStatistics, AnalyticsError> {
    let mut per_year: BTreeMap<i32, u64> = BTreeMap::new();
    for record in records {
        *per_year.entry(record.year).or_default() += 1;
    }

    let (Some((&min, _)), Some((&max, _))) = (per_year.first_key_value(), per_year.last_key_value())
    else {
        return Err(AnalyticsError::EmptyDataset {
            selection: "summary".to_string(),
        });
    };

    let stats = SummaryStatistics {
        total_count: records.len() as u64,
        year_range: YearRange { min, max },
        years: per_year
            .into_iter()
            .map(|(year, count)| YearCount { year, count })
            .collect(),
        categories: label_counts(records.iter().map(|r| r.category.as_str())),
        time_slots: label_counts(records.iter().map(|r| r.time_slot.as_str())),
        districts_catalog: extract_area_catalog(records),
    };

    log::debug!(
        "Summary: {} records, years {}, {} categories",
        stats.total_count,
        stats.year_range,
        stats.categories.len()
    );

    Ok(stats)
}

/// Distinct years present in `records`, ascending.
#[must_use]
pub fn available_years(records: &[IncidentRecord]) -> Vec<i32> {
    records
        .iter()
        .map(|r| r.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use crime_stats_district::HierarchyKind;

    use super::*;

    fn record(id: &str, category: &str, location: &str, year: i32) -> IncidentRecord {
        IncidentRecord {
            id: id.to_string(),
            category: category.to_string(),
            date: String::new(),
            time_slot: "0-6".to_string(),
            location: location.to_string(),
            year,
        }
    }

    fn sample() -> Vec<IncidentRecord> {
        vec![
            record("1", "竊盜", "台北市中山區民權東路一段100號", 2023),
            record("2", "竊盜", "新北市板橋區中山路二段200號", 2023),
            record("3", "詐欺", "台北市信義區信義路三段300號", 2023),
            record("4", "竊盜", "台中市西屯區台灣大道四段400號", 2023),
            record("5", "詐欺", "高雄市前金區中正四路五段500號", 2023),
        ]
    }

    #[test]
    fn empty_records_fail() {
        assert!(matches!(
            summary_statistics(&[]),
            Err(AnalyticsError::EmptyDataset { .. })
        ));
    }

    #[test]
    fn summarizes_single_year_sample() {
        let stats = summary_statistics(&sample()).unwrap();
        assert_eq!(stats.total_count, 5);
        assert_eq!(stats.year_range.to_string(), "2023 - 2023");
        assert_eq!(stats.years, vec![YearCount { year: 2023, count: 5 }]);
        assert_eq!(stats.categories[0].label, "竊盜");
        assert_eq!(stats.categories[0].count, 3);
        assert_eq!(stats.categories[1].count, 2);
        assert_eq!(stats.time_slots.len(), 1);
        assert_eq!(
            stats
                .districts_catalog
                .get(HierarchyKind::MunicipalityDistrict)
                .map(<[String]>::len),
            Some(5)
        );
    }

    #[test]
    fn years_are_ascending() {
        let records = vec![
            record("1", "竊盜", "台北市中山區", 2024),
            record("2", "竊盜", "台北市中山區", 2022),
            record("3", "竊盜", "台北市中山區", 2024),
        ];
        let stats = summary_statistics(&records).unwrap();
        assert_eq!(stats.year_range.to_string(), "2022 - 2024");
        assert_eq!(
            stats.years,
            vec![
                YearCount { year: 2022, count: 1 },
                YearCount { year: 2024, count: 2 },
            ]
        );
        assert_eq!(available_years(&records), vec![2022, 2024]);
    }
}
