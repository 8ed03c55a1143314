//! Year derivation from heterogeneous date tokens.
//!
//! Taiwanese agencies publish dates as Republic-of-China calendar tokens
//! (`1120101` is 2023-01-01), ISO dates, or bare Gregorian years. Each
//! strategy is a pure function over the whole column; the first one in
//! [`DateStrategy::PRIORITY`] that succeeds decides every row's year.

use std::sync::LazyLock;

use chrono::{Datelike as _, NaiveDate, NaiveDateTime};
use regex::Regex;
use strum_macros::{AsRefStr, Display};

use crate::NormalizeError;

/// Offset between ROC years and Gregorian years.
pub const ROC_YEAR_OFFSET: i32 = 1911;

/// Three-digit ROC year followed by a non-digit (`112/01/05`,
/// `112年01月05日`, `112.01.05 10:30`) or by exactly four more digits
/// (`1120105`), or a two-digit year followed by `年`.
static ROC_LEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:([0-9]{3})(?:[^0-9]|[0-9]{4}$)|([0-9]{2})年)").expect("valid regex")
});

/// Two- or three-digit ROC year with separated month and day, optionally
/// followed by a time, e.g. `99-3-1` or `99/3/1 08:00`.
static ROC_SEPARATED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{2,3})[/.\-]([0-9]{1,2})[/.\-]([0-9]{1,2})(?:[ T][0-9]{1,2}:[0-9]{2}(?::[0-9]{2})?)?$")
        .expect("valid regex")
});

/// `%Y` also accepts short years, which would turn `112/01/05` into year
/// 112.
const GREGORIAN_YEARS: std::ops::RangeInclusive<i32> = 1000..=9999;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y.%m.%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
];

/// A whole-column year derivation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum DateStrategy {
    /// Leading three digits are an ROC year. Every row must match.
    RocYear,
    /// General calendar date parsing. Rows that do not parse are dropped;
    /// at least one row must parse.
    CalendarDate,
    /// Leading four characters are a Gregorian year. Every row must match.
    BareYear,
}

impl DateStrategy {
    /// Strategies in the order they are attempted.
    pub const PRIORITY: [Self; 3] = [Self::RocYear, Self::CalendarDate, Self::BareYear];

    /// Applies this strategy to a whole column.
    ///
    /// Returns `None` if the strategy does not apply to the column. On
    /// success, the result has one entry per input token, `None` marking a
    /// row to drop.
    #[must_use]
    pub fn apply<S: AsRef<str>>(self, dates: &[S]) -> Option<Vec<Option<i32>>> {
        match self {
            Self::RocYear => every(dates, roc_year),
            Self::BareYear => every(dates, bare_year),
            Self::CalendarDate => {
                let years: Vec<Option<i32>> =
                    dates.iter().map(|d| calendar_year(d.as_ref())).collect();
                if !years.is_empty() && years.iter().all(Option::is_none) {
                    return None;
                }
                Some(years)
            }
        }
    }
}

fn every<S: AsRef<str>>(dates: &[S], parse: fn(&str) -> Option<i32>) -> Option<Vec<Option<i32>>> {
    dates
        .iter()
        .map(|d| parse(d.as_ref()).map(Some))
        .collect()
}

/// Years for a date column along with the strategy that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedYears {
    /// Strategy that succeeded.
    pub strategy: DateStrategy,
    /// One entry per input row; `None` rows are dropped by the caller.
    pub years: Vec<Option<i32>>,
}

impl DerivedYears {
    /// Number of rows without a year.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.years.iter().filter(|y| y.is_none()).count()
    }
}

/// Derives a year for every date token using the first strategy that
/// succeeds for the entire column.
///
/// # Errors
///
/// Returns [`NormalizeError::UnparsableDateFormat`] if no strategy applies.
pub fn derive_years<S: AsRef<str>>(dates: &[S]) -> Result<DerivedYears, NormalizeError> {
    for strategy in DateStrategy::PRIORITY {
        if let Some(years) = strategy.apply(dates) {
            log::debug!("Derived years for {} rows via {strategy}", dates.len());
            return Ok(DerivedYears { strategy, years });
        }
    }

    log::warn!("No date strategy matched a column of {} rows", dates.len());
    Err(NormalizeError::UnparsableDateFormat)
}

/// Parses an ROC date token and returns its Gregorian year.
///
/// Accepts compact `YYYMMDD`, a three-digit year followed by any
/// separator (`112/01/05`, `112年01月05日`, `112/01/05 10:30`), and a
/// two-digit year with separated month and day. Four-digit leading years
/// (`2023-01-01`, `20230101`) are not ROC dates.
#[must_use]
pub fn roc_year(token: &str) -> Option<i32> {
    let token = token.trim();

    let caps = ROC_LEADING_RE
        .captures(token)
        .or_else(|| ROC_SEPARATED_RE.captures(token))?;
    let year = caps.get(1).or_else(|| caps.get(2))?;
    year.as_str().parse::<i32>().ok().map(|y| y + ROC_YEAR_OFFSET)
}

/// Returns `true` for a seven-digit ROC date token.
#[must_use]
pub fn is_roc_compact(token: &str) -> bool {
    token.len() == 7 && token.bytes().all(|b| b.is_ascii_digit())
}

/// Parses a Gregorian calendar date or date-time and returns its year.
#[must_use]
pub fn calendar_year(token: &str) -> Option<i32> {
    let token = token.trim();

    if token.len() == 8 && token.bytes().all(|b| b.is_ascii_digit()) {
        let year = token[..4].parse().ok()?;
        let month = token[4..6].parse().ok()?;
        let day = token[6..].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day).map(|d| d.year());
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(token, fmt).ok())
        .map(|d| d.year())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(token, fmt).ok())
                .map(|dt| dt.year())
        })
        .filter(|year| GREGORIAN_YEARS.contains(year))
}

/// Reads the first four characters of `token` as a Gregorian year.
#[must_use]
pub fn bare_year(token: &str) -> Option<i32> {
    let prefix = token.trim().get(..4)?;
    if !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    prefix.parse().ok()
}
