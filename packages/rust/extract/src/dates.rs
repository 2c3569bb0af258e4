//! Date normalization for heterogeneous hand-authored date strings.
//!
//! The corpus mixes ISO dates, abbreviated and full month names, and both
//! day-first and month-first orders. The first structurally matching
//! grammar is chosen and parsed; there is no retry across formats.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use endorsetrack_shared::{EndorseTrackError, Result};

/// All-numeric `YYYY-MM-DD`.
static NUMERIC_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));

/// Abbreviated month lead token ("May 4, 2016" but not "March 26, 2016").
static MONTH_ABBREV_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][a-z]{2} ").expect("valid regex"));

/// Parse a raw date string into a calendar date.
///
/// Grammar precedence is fixed: numeric ISO; abbreviated-month-first; then
/// for comma-less strings day-first with an abbreviated (3-char middle
/// token) or full month name; otherwise month-first with a full name.
/// A string failing its chosen grammar is a [`EndorseTrackError::Date`],
/// which callers downgrade to an absent date.
pub fn normalize_date(raw: &str) -> Result<NaiveDate> {
    let format = if NUMERIC_DATE_RE.is_match(raw) {
        "%Y-%m-%d"
    } else if MONTH_ABBREV_RE.is_match(raw) {
        "%b %d, %Y"
    } else if !raw.contains(',') {
        let abbreviated_middle = raw.matches(' ').count() == 2
            && raw.split(' ').nth(1).is_some_and(|t| t.len() == 3);
        if abbreviated_middle {
            "%d %b %Y"
        } else {
            "%d %B %Y"
        }
    } else {
        "%B %d, %Y"
    };

    NaiveDate::parse_from_str(raw, format).map_err(|e| {
        EndorseTrackError::date(format!("{raw:?} does not match {format}: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn numeric_iso_roundtrip() {
        assert_eq!(normalize_date("2016-02-25").unwrap(), date(2016, 2, 25));
    }

    #[test]
    fn abbreviated_month_first() {
        assert_eq!(normalize_date("May 4, 2016").unwrap(), date(2016, 5, 4));
        assert_eq!(normalize_date("Oct 25, 2016").unwrap(), date(2016, 10, 25));
    }

    #[test]
    fn full_month_first_with_comma() {
        assert_eq!(
            normalize_date("February 29, 2016").unwrap(),
            date(2016, 2, 29)
        );
        assert_eq!(normalize_date("July 16, 2016").unwrap(), date(2016, 7, 16));
    }

    #[test]
    fn day_first_with_abbreviated_month() {
        assert_eq!(normalize_date("25 Dec 2015").unwrap(), date(2015, 12, 25));
    }

    #[test]
    fn day_first_with_full_month() {
        assert_eq!(normalize_date("3 October 2016").unwrap(), date(2016, 10, 3));
    }

    #[test]
    fn chosen_grammar_failure_is_an_error_not_a_retry() {
        // Two spaces and a 3-char middle token select "%d %b %Y"; the
        // non-month token then fails instead of retrying other grammars.
        let err = normalize_date("12 the 2016").unwrap_err();
        assert!(matches!(err, EndorseTrackError::Date(_)));

        assert!(normalize_date("sometime in fall").is_err());
        assert!(normalize_date("").is_err());
    }
}
