//! Scope-dependent district resolution.
//!
//! [`resolve`] partitions a borrowed record table into records with a
//! district label and records without one. The table is only read, so the
//! borrow guarantees nobody mutates it mid-call.

use crime_stats_district_models::{
    CITY_MARKER, DISTRICT_MARKER, Scope, TOWN_MARKER, TOWNSHIP_MARKER,
};
use crime_stats_incident_models::IncidentRecord;
use regex::Regex;

use crate::ResolveError;
use crate::clean::clean_district;
use crate::patterns;

/// A record paired with its resolved district.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRecord<'a> {
    /// The source record.
    pub record: &'a IncidentRecord,
    /// Cleaned, non-empty district label.
    pub district: String,
}

/// Outcome of resolving a table against a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<'a> {
    /// The scope that was applied.
    pub scope: Scope,
    /// Records with a district, in input order.
    pub resolved: Vec<ResolvedRecord<'a>>,
    /// Records left out, in input order.
    pub unresolved: Vec<&'a IncidentRecord>,
}

impl Resolution<'_> {
    /// Returns `true` if no record resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }

    /// Fraction of input records left unresolved, `0.0` for empty input.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn drop_rate(&self) -> f64 {
        let total = self.resolved.len() + self.unresolved.len();
        if total == 0 {
            return 0.0;
        }
        self.unresolved.len() as f64 / total as f64
    }
}

/// How a scope turns a location into a raw label.
enum Matcher {
    /// Hierarchy patterns in priority order.
    All,
    /// Substring filter; the label is the scope itself.
    Exact(String),
    /// Lazy segment after the scope, first matching pattern wins.
    Anchored { prefix: String, patterns: Vec<Regex> },
    Nothing,
}

impl Matcher {
    fn for_scope(scope: &Scope) -> Result<Self, ResolveError> {
        let anchored = |prefix: &str, markers: &[char]| -> Result<Self, ResolveError> {
            let patterns = markers
                .iter()
                .map(|marker| patterns::anchored(prefix, *marker))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|source| ResolveError::Pattern {
                    scope: prefix.to_string(),
                    source,
                })?;
            Ok(Self::Anchored {
                prefix: prefix.to_string(),
                patterns,
            })
        };

        match scope {
            Scope::AllAreas => Ok(Self::All),
            Scope::District(label) => Ok(Self::Exact(label.clone())),
            Scope::Municipality(city) => anchored(city, &[DISTRICT_MARKER]),
            Scope::County(county) => {
                anchored(county, &[CITY_MARKER, TOWNSHIP_MARKER, TOWN_MARKER])
            }
            Scope::Unrecognized(area) => {
                log::warn!("Area '{area}' has no administrative marker; nothing resolves");
                Ok(Self::Nothing)
            }
        }
    }

    fn raw_label(&self, location: &str) -> Option<String> {
        match self {
            Self::All => patterns::extract_any(location).map(|(_, label)| label),
            Self::Exact(label) => location.contains(label.as_str()).then(|| label.clone()),
            Self::Anchored { prefix, patterns } => patterns.iter().find_map(|re| {
                re.captures(location)
                    .map(|caps| format!("{prefix}{}", &caps[1]))
            }),
            Self::Nothing => None,
        }
    }
}

/// Resolves every record's district under `scope`.
///
/// Records that do not match are returned in
/// [`Resolution::unresolved`]; that is a filtering outcome, not an error.
///
/// # Errors
///
/// Returns [`ResolveError::Pattern`] if a scope-anchored pattern cannot be
/// built. No partial result is produced in that case.
pub fn resolve<'a>(
    records: &'a [IncidentRecord],
    scope: &Scope,
) -> Result<Resolution<'a>, ResolveError> {
    let matcher = Matcher::for_scope(scope)?;

    let mut resolved = Vec::new();
    let mut unresolved = Vec::new();

    for record in records {
        match matcher
            .raw_label(&record.location)
            .and_then(|raw| clean_district(&raw))
        {
            Some(district) => resolved.push(ResolvedRecord { record, district }),
            None => unresolved.push(record),
        }
    }

    log::debug!(
        "Scope '{scope}': {} resolved, {} unresolved",
        resolved.len(),
        unresolved.len()
    );

    Ok(Resolution {
        scope: scope.clone(),
        resolved,
        unresolved,
    })
}

/// Like [`resolve`], but a failure yields a resolution with no resolved
/// records, which callers treat as "not usable".
#[must_use]
pub fn resolve_or_empty<'a>(records: &'a [IncidentRecord], scope: &Scope) -> Resolution<'a> {
    resolve(records, scope).unwrap_or_else(|e| {
        log::error!("Failed to resolve districts: {e}");
        Resolution {
            scope: scope.clone(),
            resolved: Vec::new(),
            unresolved: records.iter().collect(),
        }
    })
}

/// Resolves a single location string.
///
/// # Errors
///
/// Returns [`ResolveError::Pattern`] if a scope-anchored pattern cannot be
/// built.
pub fn resolve_location(location: &str, scope: &Scope) -> Result<Option<String>, ResolveError> {
    let matcher = Matcher::for_scope(scope)?;
    Ok(matcher
        .raw_label(location)
        .and_then(|raw| clean_district(&raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, location: &str) -> IncidentRecord {
        IncidentRecord {
            id: id.to_string(),
            category: "竊盜".to_string(),
            date: "1120101".to_string(),
            time_slot: "0-6".to_string(),
            location: location.to_string(),
            year: 2023,
        }
    }

    fn sample() -> Vec<IncidentRecord> {
        vec![
            record("1", "台北市中山區民權東路一段100號"),
            record("2", "新北市板橋區中山路二段200號"),
            record("3", "台北市信義區信義路三段300號"),
            record("4", "台中市西屯區台灣大道四段400號"),
            record("5", "高雄市前金區中正四路五段500號"),
        ]
    }

    fn districts<'a>(resolution: &'a Resolution<'_>) -> Vec<&'a str> {
        resolution
            .resolved
            .iter()
            .map(|r| r.district.as_str())
            .collect()
    }

    #[test]
    fn all_areas_resolves_each_record() {
        let records = sample();
        let resolution = resolve(&records, &Scope::AllAreas).unwrap();
        assert_eq!(
            districts(&resolution),
            vec![
                "台北市中山區",
                "新北市板橋區",
                "台北市信義區",
                "台中市西屯區",
                "高雄市前金區"
            ]
        );
        assert!(resolution.unresolved.is_empty());
    }

    #[test]
    fn all_areas_keeps_hierarchies_apart() {
        let records = vec![
            record("1", "台北市中山區民權東路"),
            record("2", "新竹縣竹北市成功路"),
        ];
        let resolution = resolve(&records, &Scope::AllAreas).unwrap();
        assert_eq!(resolution.resolved.len(), 2);
        assert_eq!(resolution.resolved[0].district, "台北市中山區");
        assert_eq!(resolution.resolved[0].record.id, "1");
        assert_eq!(resolution.resolved[1].district, "新竹縣竹北市");
        assert_eq!(resolution.resolved[1].record.id, "2");
    }

    #[test]
    fn all_areas_ignores_embedded_market_name() {
        let records = vec![record("1", "台北市大安區台北市場1號")];
        let resolution = resolve(&records, &Scope::AllAreas).unwrap();
        assert_eq!(districts(&resolution), vec!["台北市大安區"]);
    }

    #[test]
    fn all_areas_cleans_whitespace() {
        let records = vec![record("6", "  台北市   大安區  ")];
        let resolution = resolve(&records, &Scope::AllAreas).unwrap();
        assert_eq!(districts(&resolution), vec!["台北市大安區"]);
    }

    #[test]
    fn all_areas_tries_township_before_town() {
        let records = vec![
            record("1", "南投縣埔里鄉中山路"),
            record("2", "彰化縣員林鎮民權路"),
        ];
        let resolution = resolve(&records, &Scope::AllAreas).unwrap();
        assert_eq!(districts(&resolution), vec!["南投縣埔里鄉", "彰化縣員林鎮"]);
    }

    #[test]
    fn unmatched_records_are_reported() {
        let records = vec![record("1", "台北市中山區民權東路"), record("2", "地址不詳")];
        let resolution = resolve(&records, &Scope::AllAreas).unwrap();
        assert_eq!(resolution.resolved.len(), 1);
        assert_eq!(resolution.unresolved.len(), 1);
        assert_eq!(resolution.unresolved[0].id, "2");
        assert!((resolution.drop_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn exact_district_filters_by_substring() {
        let records = sample();
        let scope = Scope::parse("台北市中山區");
        let resolution = resolve(&records, &scope).unwrap();
        assert_eq!(resolution.resolved.len(), 1);
        assert_eq!(resolution.resolved[0].district, "台北市中山區");
        assert_eq!(resolution.unresolved.len(), 4);
    }

    #[test]
    fn exact_district_is_not_anchored() {
        let records = vec![record("1", "臺灣台北市中山區民權東路")];
        let resolution = resolve(&records, &Scope::parse("台北市中山區")).unwrap();
        assert_eq!(districts(&resolution), vec!["台北市中山區"]);
    }

    #[test]
    fn municipality_splits_into_districts() {
        let records = sample();
        let resolution = resolve(&records, &Scope::parse("台北市")).unwrap();
        assert_eq!(districts(&resolution), vec!["台北市中山區", "台北市信義區"]);
        assert_eq!(resolution.unresolved.len(), 3);
    }

    #[test]
    fn municipality_does_not_match_other_cities() {
        // 新北市 contains 北市 but not 台北市
        let records = vec![record("1", "新北市板橋區中山路")];
        let resolution = resolve(&records, &Scope::parse("台北市")).unwrap();
        assert!(resolution.is_empty());
    }

    #[test]
    fn county_tries_city_township_town_in_order() {
        let records = vec![
            record("1", "新竹縣竹北市成功路"),
            record("2", "新竹縣新埔鎮中山路"),
            record("3", "新竹縣關西鄉民權路"),
            record("4", "南投縣埔里鄉中山路"),
        ];
        let resolution = resolve(&records, &Scope::parse("新竹縣")).unwrap();
        assert_eq!(
            districts(&resolution),
            vec!["新竹縣竹北市", "新竹縣新埔鎮", "新竹縣關西鄉"]
        );
        assert_eq!(resolution.unresolved.len(), 1);
    }

    #[test]
    fn county_level_label_resolves_exactly() {
        // As a municipality scope, 新竹縣竹北市 would look for a 區 after
        // the label and resolve neither record
        let records = vec![
            record("1", "新竹縣竹北市成功路"),
            record("2", "新竹縣新埔鎮中山路"),
        ];
        let resolution = resolve(&records, &Scope::parse("新竹縣竹北市")).unwrap();
        assert_eq!(districts(&resolution), vec!["新竹縣竹北市"]);

        let as_municipality = Scope::Municipality("新竹縣竹北市".to_string());
        assert!(resolve(&records, &as_municipality).unwrap().is_empty());
    }

    #[test]
    fn unknown_area_resolves_nothing() {
        let records = sample();
        let resolution = resolve(&records, &Scope::parse("不存在的地區")).unwrap();
        assert!(resolution.is_empty());

        let resolution = resolve(&records, &Scope::parse("Taipei")).unwrap();
        assert!(resolution.is_empty());
        assert_eq!(resolution.unresolved.len(), 5);
    }

    #[test]
    fn empty_table_resolves_to_empty() {
        let resolution = resolve_or_empty(&[], &Scope::AllAreas);
        assert!(resolution.is_empty());
        assert!(resolution.drop_rate().abs() < f64::EPSILON);
    }

    #[test]
    fn single_location_helper() {
        assert_eq!(
            resolve_location(" 高雄市 前金區中正四路", &Scope::parse("高雄市"))
                .unwrap()
                .as_deref(),
            Some("高雄市前金區")
        );
        assert_eq!(
            resolve_location("高雄市前金區", &Scope::parse("台北市")).unwrap(),
            None
        );
    }
}
