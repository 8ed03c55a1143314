//! Plain-text rendering of query results.

use crime_stats_analytics_models::{
    DistrictCount, DistrictDistribution, DistrictRanking, LabelCount, SummaryStatistics,
    YearlyBreakdown,
};
use crime_stats_session::DataOrigin;

fn label_lines(heading: &str, counts: &[LabelCount]) -> Vec<String> {
    let mut lines = vec![format!("{heading}:")];
    lines.extend(
        counts
            .iter()
            .map(|c| format!("  {}: {}", c.label, c.count)),
    );
    lines
}

fn district_lines(counts: &[DistrictCount], numbered: bool) -> Vec<String> {
    counts
        .iter()
        .enumerate()
        .map(|(i, c)| {
            if numbered {
                format!("{:>3}. {}  {}", i + 1, c.district, c.count)
            } else {
                format!("  {}  {}", c.district, c.count)
            }
        })
        .collect()
}

/// Dataset overview.
#[must_use]
pub fn summary(stats: &SummaryStatistics, origin: DataOrigin) -> String {
    let mut lines = vec![
        format!("資料來源: {origin}"),
        format!("總案件數: {}", stats.total_count),
        format!("資料年份: {}", stats.year_range),
        "各年度案件數:".to_string(),
    ];
    lines.extend(
        stats
            .years
            .iter()
            .map(|y| format!("  {}: {}", y.year, y.count)),
    );
    lines.extend(label_lines("案件類型", &stats.categories));
    lines.extend(label_lines("時段分布", &stats.time_slots));
    lines.push("行政區數:".to_string());
    lines.extend(
        stats
            .districts_catalog
            .iter()
            .map(|(kind, districts)| format!("  {}: {}", kind.label(), districts.len())),
    );
    lines.join("\n")
}

/// Area selection menu.
#[must_use]
pub fn areas(menu: &[String]) -> String {
    menu.iter()
        .map(|area| format!("  {area}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Single-year distribution.
#[must_use]
pub fn distribution(view: &DistrictDistribution) -> String {
    let mut lines = vec![view.title.clone()];
    lines.extend(district_lines(&view.counts, false));
    lines.join("\n")
}

/// Top-N ranking.
#[must_use]
pub fn ranking(view: &DistrictRanking) -> String {
    let mut lines = vec![view.title.clone()];
    lines.extend(district_lines(&view.counts, true));
    lines.join("\n")
}

/// Year × district table with a per-year total column.
#[must_use]
pub fn yearly(view: &YearlyBreakdown) -> String {
    let matrix = &view.matrix;

    let mut header = vec!["年份".to_string()];
    header.extend(matrix.districts.iter().cloned());
    header.push("合計".to_string());

    let mut lines = vec![view.title.clone(), header.join("\t")];
    for (year, row) in matrix.years.iter().zip(&matrix.counts) {
        let mut cells = vec![year.to_string()];
        cells.extend(row.iter().map(ToString::to_string));
        cells.push(row.iter().sum::<u64>().to_string());
        lines.push(cells.join("\t"));
    }
    lines.join("\n")
}
