//! District label cleanup.

/// Removes all whitespace from a matched label.
///
/// Returns `None` if nothing is left, so an all-blank match never becomes
/// a district.
#[must_use]
pub fn clean_district(raw: &str) -> Option<String> {
    let cleaned: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_boundary_and_internal_whitespace() {
        assert_eq!(
            clean_district("   台北市 大安區  ").as_deref(),
            Some("台北市大安區")
        );
    }

    #[test]
    fn strips_ideographic_space() {
        assert_eq!(
            clean_district("台北市\u{3000}大安區").as_deref(),
            Some("台北市大安區")
        );
    }

    #[test]
    fn is_idempotent() {
        let once = clean_district(" 新竹縣 竹北市 ").unwrap();
        assert_eq!(clean_district(&once).as_deref(), Some(once.as_str()));
    }

    #[test]
    fn blank_is_none() {
        assert_eq!(clean_district(" \t "), None);
        assert_eq!(clean_district(""), None);
    }
}
