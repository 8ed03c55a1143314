//! Titled tables for the three district charts.
//!
//! Each view resolves the records under the selected scope, aggregates the
//! resolved part, and fails with [`AnalyticsError::EmptyDataset`] when
//! nothing is left to draw.

use crime_stats_analytics_models::{DistrictDistribution, DistrictRanking, YearlyBreakdown};
use crime_stats_district::Scope;
use crime_stats_district::resolver::{ResolvedRecord, resolve_or_empty};
use crime_stats_incident_models::IncidentRecord;

use crate::AnalyticsError;
use crate::aggregate::{counts_by_district, counts_by_year_and_district, top_n_by_district};

fn resolved_records<'a>(
    records: &'a [IncidentRecord],
    scope: &Scope,
) -> Result<Vec<ResolvedRecord<'a>>, AnalyticsError> {
    let resolution = resolve_or_empty(records, scope);
    if resolution.is_empty() {
        log::warn!("No district resolved for area '{scope}'");
        return Err(AnalyticsError::EmptyDataset {
            selection: scope.to_string(),
        });
    }
    Ok(resolution.resolved)
}

/// District counts for one year, descending.
///
/// # Errors
///
/// Returns [`AnalyticsError::EmptyDataset`] if no record in `year` resolves
/// under `scope`.
pub fn district_year_view(
    records: &[IncidentRecord],
    scope: &Scope,
    year: i32,
) -> Result<DistrictDistribution, AnalyticsError> {
    let resolved: Vec<_> = resolved_records(records, scope)?
        .into_iter()
        .filter(|r| r.record.year == year)
        .collect();

    if resolved.is_empty() {
        log::warn!("No records for {year} in area '{scope}'");
        return Err(AnalyticsError::EmptyDataset {
            selection: format!("{scope} {year}"),
        });
    }

    let title = if scope.is_all() {
        format!("{year} 年各地區案件數")
    } else {
        format!("{scope} - {year} 年各行政區案件數")
    };

    Ok(DistrictDistribution {
        title,
        year,
        counts: counts_by_district(&resolved),
    })
}

/// The `top_n` districts with the most incidents.
///
/// # Errors
///
/// Returns [`AnalyticsError::EmptyDataset`] if nothing resolves under
/// `scope`.
pub fn district_rank_view(
    records: &[IncidentRecord],
    scope: &Scope,
    top_n: usize,
) -> Result<DistrictRanking, AnalyticsError> {
    let resolved = resolved_records(records, scope)?;

    let title = if scope.is_all() {
        format!("前{top_n}案件熱點地區")
    } else {
        format!("{scope} - 前{top_n}案件熱點行政區")
    };

    Ok(DistrictRanking {
        title,
        top_n,
        counts: top_n_by_district(&resolved, top_n),
    })
}

/// Year × district counts across the whole dataset.
///
/// # Errors
///
/// Returns [`AnalyticsError::EmptyDataset`] if nothing resolves under
/// `scope`.
pub fn yearly_view(
    records: &[IncidentRecord],
    scope: &Scope,
) -> Result<YearlyBreakdown, AnalyticsError> {
    let resolved = resolved_records(records, scope)?;

    let title = if scope.is_all() {
        "全年度各地區案件統計".to_string()
    } else {
        format!("{scope} - 全年度案件統計")
    };

    Ok(YearlyBreakdown {
        title,
        matrix: counts_by_year_and_district(&resolved),
    })
}
