//! Date boundary matching and text lookup.
//!
//! Boundaries are matched textually: a node marks a date when its metadata
//! contains the `DD/MM/YYYY` rendering of that date anywhere in the string.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{DateBoundary, DocumentQuery, Lookup, Result};

#[allow(clippy::expect_used)]
static DATE_SHAPED: LazyLock<Regex> = LazyLock::new(|| {
    // day / month / year
    Regex::new(r"[0-3][0-9]/[0-1][0-9]/[1-2][0-9]{3}").expect("valid regex")
});

/// Whether `metadata` contains the formatted `date`.
#[must_use]
pub fn matches_date(metadata: &str, date: DateBoundary) -> bool {
    metadata.contains(&date.formatted())
}

/// Whether `text` contains something that looks like a `DD/MM/YYYY` date.
#[must_use]
pub fn is_date_shaped(text: &str) -> bool {
    DATE_SHAPED.is_match(text)
}

/// Looks up the first node whose text contains `needle`.
///
/// Logs a warning on a miss unless `needle` is a date; date misses are the
/// normal state while scrolling towards an anchor.
///
/// # Errors
/// Returns error if the session is lost.
pub fn find_text<Q: DocumentQuery>(query: &mut Q, needle: &str) -> Result<Option<Q::Node>> {
    match query.find_by_text(needle)? {
        Lookup::Found(node) => Ok(Some(node)),
        Lookup::NotFound | Lookup::Invalidated => {
            if !is_date_shaped(needle) {
                tracing::warn!("{} not found.", needle);
            }
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn boundary(y: i32, m: u32, d: u32) -> DateBoundary {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().into()
    }

    #[test]
    fn test_matches_date_substring() {
        let end = boundary(2024, 3, 5);
        assert!(matches_date("[09:15, 05/03/2024] Alice: ", end));
        assert!(!matches_date("[09:15, 04/03/2024] Alice: ", end));
        assert!(!matches_date("", end));
    }

    #[test]
    fn test_matches_date_exact_string() {
        assert!(matches_date("05/03/2024", boundary(2024, 3, 5)));
    }

    #[test]
    fn test_matches_date_incidental_digits() {
        // Textual containment: a sender name carrying the digits also matches.
        assert!(matches_date(
            "[09:15, 01/03/2024] Fan of 05/03/2024: ",
            boundary(2024, 3, 5)
        ));
    }

    #[test]
    fn test_is_date_shaped() {
        assert!(is_date_shaped("29/02/2024"));
        assert!(is_date_shaped("since 01/12/1999 ok"));
        assert!(!is_date_shaped("Alice"));
        assert!(!is_date_shaped("2024-02-29"));
        assert!(!is_date_shaped("45/02/2024"));
    }
}
