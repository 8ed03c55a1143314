//! Whitespace-delimited default data file.
//!
//! The bundled dataset is a header line followed by one case per line:
//!
//! ```text
//! 編號 案類 日期 時段 地點
//! 1 竊盜 1120101 0-6 台北市中山區民權東路一段100號
//! ```
//!
//! The location may itself contain spaces, so every token from the fifth
//! onward belongs to it. Lines that do not fit are skipped, never fatal.

use crime_stats_incident_models::IncidentRecord;

use crate::NormalizeError;
use crate::dates::{is_roc_compact, roc_year};

/// Records parsed from a fixed-width file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedWidthLoad {
    /// Accepted records.
    pub records: Vec<IncidentRecord>,
    /// Non-blank data lines that were rejected.
    pub dropped_rows: usize,
}

/// Parses one data line.
///
/// Returns `None` when the line has fewer than five tokens or its date
/// token is not a seven-digit ROC date.
#[must_use]
pub fn parse_fixed_width_line(line: &str) -> Option<IncidentRecord> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 5 {
        return None;
    }

    let date = tokens[2];
    if !is_roc_compact(date) {
        return None;
    }

    Some(IncidentRecord {
        id: tokens[0].to_string(),
        category: tokens[1].to_string(),
        date: date.to_string(),
        time_slot: tokens[3].to_string(),
        location: tokens[4..].join(" "),
        year: roc_year(date)?,
    })
}

/// Parses a whole fixed-width file, skipping the header line.
///
/// # Errors
///
/// Returns [`NormalizeError::NoValidRecords`] if no data line is accepted.
pub fn parse_fixed_width_text(text: &str) -> Result<FixedWidthLoad, NormalizeError> {
    let mut records = Vec::new();
    let mut dropped_rows = 0;

    for (line_num, line) in text.lines().enumerate().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(record) = parse_fixed_width_line(line) {
            records.push(record);
        } else {
            log::debug!("Skipping malformed line {}: {line}", line_num + 1);
            dropped_rows += 1;
        }
    }

    if records.is_empty() {
        return Err(NormalizeError::NoValidRecords);
    }

    log::info!(
        "Parsed {} fixed-width records ({dropped_rows} lines skipped)",
        records.len()
    );

    Ok(FixedWidthLoad {
        records,
        dropped_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "編號 案類 日期 時段 地點
1 竊盜 1120101 0-6 台北市中山區民權東路一段100號
2 詐欺 1120102 6-12 新北市板橋區中山路二段200號
3 竊盜 1120103 12-18 台北市信義區信義路三段300號
4 傷害 1120104 18-24 台中市西屯區台灣大道四段400號
5 竊盜 1120105 0-6 高雄市前金區中正四路五段500號
";

    #[test]
    fn parses_sample_file() {
        let load = parse_fixed_width_text(SAMPLE).unwrap();
        assert_eq!(load.records.len(), 5);
        assert_eq!(load.dropped_rows, 0);
        assert_eq!(load.records[0].location, "台北市中山區民權東路一段100號");
        assert!(load.records.iter().all(|r| r.year == 2023));
    }

    #[test]
    fn joins_location_tokens() {
        let record = parse_fixed_width_line("7 竊盜 1120101 0-6 台北市 大安區  復興南路").unwrap();
        assert_eq!(record.location, "台北市 大安區 復興南路");
        assert_eq!(record.time_slot, "0-6");
    }

    #[test]
    fn rejects_short_and_non_roc_lines() {
        assert!(parse_fixed_width_line("1 竊盜 1120101 0-6").is_none());
        assert!(parse_fixed_width_line("1 竊盜 2023-01-01 0-6 台北市").is_none());
        assert!(parse_fixed_width_line("1 竊盜 112010 0-6 台北市").is_none());
        assert!(parse_fixed_width_line("1 竊盜 11201x1 0-6 台北市").is_none());
    }

    #[test]
    fn skips_bad_lines_without_failing() {
        let text = "header\n1 竊盜 1120101 0-6 台北市中山區\n\nbroken line\n";
        let load = parse_fixed_width_text(text).unwrap();
        assert_eq!(load.records.len(), 1);
        assert_eq!(load.dropped_rows, 1);
    }

    #[test]
    fn header_only_file_has_no_records() {
        let err = parse_fixed_width_text("編號 案類 日期 時段 地點\n").unwrap_err();
        assert!(matches!(err, NormalizeError::NoValidRecords));
    }
}
