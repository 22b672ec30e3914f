// SPDX-License-Identifier: MIT

//! Date validation and formatting for exercise logs.
//!
//! Inbound dates must be strict `YYYY-MM-DD`. The calendar check is
//! leap-agnostic: February always allows day 29, and Feb 29 of a non-leap
//! year rolls over to Mar 1 the way a lenient date parser would. This
//! looseness is intentional, documented behavior.

use crate::error::AppError;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Validate and parse a caller-supplied exercise date.
///
/// An absent or empty input defaults to the current server time. Anything
/// else must match strict `YYYY-MM-DD` with a calendar-valid month/day pair,
/// otherwise the request fails with the fixed "Invalid Date Entry" message
/// before anything is persisted.
pub fn parse_exercise_date(input: Option<&str>) -> Result<DateTime<Utc>, AppError> {
    let raw = match input {
        None | Some("") => return Ok(Utc::now()),
        Some(raw) => raw,
    };

    let (year, month, day) = check_calendar_pattern(raw).ok_or(AppError::InvalidDate)?;

    let date = match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        // Only reachable for Feb 29 of a non-leap year: roll over to Mar 1
        None => NaiveDate::from_ymd_opt(year, 3, 1).ok_or(AppError::InvalidDate)?,
    };

    Ok(date.and_time(NaiveTime::MIN).and_utc())
}

/// Parse a `from`/`to` query parameter, naming the offending parameter in
/// the error. Same strict format as exercise dates, midnight UTC.
pub fn parse_query_date(param: &'static str, raw: &str) -> Result<DateTime<Utc>, AppError> {
    parse_exercise_date(Some(raw))
        .map_err(|_| AppError::BadRequest(format!("Invalid '{param}' parameter: expected YYYY-MM-DD")))
}

/// Render the fixed human-readable date stored alongside the true date
/// value, e.g. "Mon Jan 01 2020".
pub fn display_date(date: DateTime<Utc>) -> String {
    date.format("%a %b %d %Y").to_string()
}

/// Strict `YYYY-MM-DD` check: digits with dashes at positions 4 and 7, and
/// a month/day pair valid on a leap-agnostic calendar (Feb allows 29).
fn check_calendar_pattern(s: &str) -> Option<(i32, u32, u32)> {
    let bytes = s.as_bytes();
    if bytes.len() != 10 {
        return None;
    }
    for (i, b) in bytes.iter().enumerate() {
        let ok = if i == 4 || i == 7 {
            *b == b'-'
        } else {
            b.is_ascii_digit()
        };
        if !ok {
            return None;
        }
    }

    let year: i32 = s[0..4].parse().ok()?;
    let month: u32 = s[5..7].parse().ok()?;
    let day: u32 = s[8..10].parse().ok()?;

    let max_day = match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => 29,
        _ => return None,
    };
    if day == 0 || day > max_day {
        return None;
    }

    Some((year, month, day))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_valid_date_parses_to_midnight_utc() {
        let date = parse_exercise_date(Some("2023-01-15")).unwrap();
        assert_eq!(date.year(), 2023);
        assert_eq!(date.month(), 1);
        assert_eq!(date.day(), 15);
        assert_eq!(date.hour(), 0);
        assert_eq!(date.minute(), 0);
    }

    #[test]
    fn test_empty_or_absent_defaults_to_now() {
        let before = Utc::now();
        let from_empty = parse_exercise_date(Some("")).unwrap();
        let from_absent = parse_exercise_date(None).unwrap();
        let after = Utc::now();

        assert!(from_empty >= before && from_empty <= after);
        assert!(from_absent >= before && from_absent <= after);
    }

    #[test]
    fn test_rejects_calendar_invalid_days() {
        assert!(matches!(
            parse_exercise_date(Some("2023-02-30")),
            Err(AppError::InvalidDate)
        ));
        assert!(matches!(
            parse_exercise_date(Some("2023-04-31")),
            Err(AppError::InvalidDate)
        ));
        assert!(matches!(
            parse_exercise_date(Some("2023-13-01")),
            Err(AppError::InvalidDate)
        ));
        assert!(matches!(
            parse_exercise_date(Some("2023-00-10")),
            Err(AppError::InvalidDate)
        ));
        assert!(matches!(
            parse_exercise_date(Some("2023-06-00")),
            Err(AppError::InvalidDate)
        ));
    }

    #[test]
    fn test_rejects_malformed_patterns() {
        for raw in [
            "01-15-2023",
            "2023/01/15",
            "2023-1-15",
            "2023-01-15T00:00:00Z",
            "not-a-date",
            "+023-01-15",
            "2023-+1-15",
        ] {
            assert!(
                matches!(parse_exercise_date(Some(raw)), Err(AppError::InvalidDate)),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_leap_agnostic_feb_29() {
        // Leap year: Feb 29 is a real date
        let leap = parse_exercise_date(Some("2024-02-29")).unwrap();
        assert_eq!((leap.month(), leap.day()), (2, 29));

        // Non-leap year: passes the pattern check and rolls over to Mar 1
        let non_leap = parse_exercise_date(Some("2023-02-29")).unwrap();
        assert_eq!((non_leap.month(), non_leap.day()), (3, 1));
    }

    #[test]
    fn test_display_date_format() {
        let date = parse_exercise_date(Some("2020-01-01")).unwrap();
        assert_eq!(display_date(date), "Wed Jan 01 2020");
    }

    #[test]
    fn test_query_date_error_names_parameter() {
        let err = parse_query_date("from", "bogus").unwrap_err();
        match err {
            AppError::BadRequest(msg) => assert!(msg.contains("'from'")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
