//! Header-to-field mapping.
//!
//! Agencies label the same column many ways: `發生日期`, `日期`, `Date`,
//! `發生(現)日期`. Each [`CanonicalField`] has a ranked alias list. An exact
//! alias match anywhere in the header row beats a substring match, and a
//! header claimed by one field is not handed to another.

use crime_stats_incident_models::CanonicalField;

use crate::NormalizeError;

/// Known header spellings for `field`, best first.
#[must_use]
pub const fn aliases(field: CanonicalField) -> &'static [&'static str] {
    match field {
        CanonicalField::Id => &["編號", "ID", "id", "序號", "No", "number"],
        CanonicalField::Category => &[
            "案類",
            "案件類型",
            "類型",
            "category",
            "Category",
            "Type",
            "type",
            "案件類別",
        ],
        CanonicalField::Date => &[
            "日期",
            "發生日期",
            "時間",
            "Date",
            "date",
            "發生(現)日期",
            "發生時間",
        ],
        CanonicalField::TimeSlot => &[
            "時段",
            "時間段",
            "發生時段",
            "time_slot",
            "Time",
            "time",
            "時間",
        ],
        CanonicalField::Location => &["地點", "發生地點", "位置", "Location", "location", "地址", "發生地址"],
    }
}

/// Cleans a raw header cell: trims whitespace and removes byte order marks.
#[must_use]
pub fn clean_header(raw: &str) -> String {
    raw.replace('\u{feff}', "").trim().to_string()
}

/// Column index for every canonical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    id: usize,
    category: usize,
    date: usize,
    time_slot: usize,
    location: usize,
}

impl ColumnMapping {
    /// Returns the header index mapped to `field`.
    #[must_use]
    pub const fn index(&self, field: CanonicalField) -> usize {
        match field {
            CanonicalField::Id => self.id,
            CanonicalField::Category => self.category,
            CanonicalField::Date => self.date,
            CanonicalField::TimeSlot => self.time_slot,
            CanonicalField::Location => self.location,
        }
    }
}

/// Maps the header row onto the canonical fields.
///
/// # Errors
///
/// Returns [`NormalizeError::MissingRequiredColumn`] naming the first field
/// (in [`CanonicalField::all`] order) that no header matches.
pub fn map_columns(headers: &[String]) -> Result<ColumnMapping, NormalizeError> {
    let mut claimed: Vec<usize> = Vec::with_capacity(5);
    let mut find = |field: CanonicalField| {
        let index = find_column(headers, aliases(field), &claimed)
            .ok_or(NormalizeError::MissingRequiredColumn(field))?;
        log::debug!("Mapped header '{}' to {field}", headers[index]);
        claimed.push(index);
        Ok::<_, NormalizeError>(index)
    };

    Ok(ColumnMapping {
        id: find(CanonicalField::Id)?,
        category: find(CanonicalField::Category)?,
        date: find(CanonicalField::Date)?,
        time_slot: find(CanonicalField::TimeSlot)?,
        location: find(CanonicalField::Location)?,
    })
}

fn find_column(headers: &[String], aliases: &[&str], claimed: &[usize]) -> Option<usize> {
    let free = |i: &usize| !claimed.contains(i);

    // Exact pass, alias rank first
    let exact = aliases.iter().find_map(|alias| {
        headers
            .iter()
            .enumerate()
            .find(|(i, h)| free(i) && h.as_str() == *alias)
            .map(|(i, _)| i)
    });
    if exact.is_some() {
        return exact;
    }

    // Containment pass, header order first
    headers
        .iter()
        .enumerate()
        .find(|(i, h)| free(i) && aliases.iter().any(|alias| h.contains(alias)))
        .map(|(i, _)| i)
}
