// 📅 Dates - the single date-parsing capability
//
// Validation, range filtering and month grouping all go through parse_date so
// that "is this a date" and "which day is it" never disagree.

use crate::error::DateParseError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Plain calendar-date layouts, tried in order
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",  // 2024-01-15
    "%Y/%m/%d",  // 2024/01/15
    "%m/%d/%Y",  // 01/15/2024
    "%B %d, %Y", // January 15, 2024
    "%d %B %Y",  // 15 January 2024
];

/// Date-time layouts without an offset; the time part is dropped
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse a date string into a calendar date.
///
/// Date-times carrying an offset are normalized to their UTC calendar day.
/// `YYYY-MM` resolves to the first of the month and a bare `YYYY` to January 1st.
pub fn parse_date(input: &str) -> Result<NaiveDate, DateParseError> {
    let s = input.trim();
    let fail = || DateParseError {
        input: input.to_string(),
    };

    if s.is_empty() {
        return Err(fail());
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Ok(date);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc).date_naive());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt.date());
        }
    }

    // Partial dates: "2024-03" and "2024"
    if is_year(s) {
        let year: i32 = s.parse().map_err(|_| fail())?;
        return NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(fail);
    }
    if s.len() == 7 && s.as_bytes()[4] == b'-' && is_year(&s[..4]) {
        return NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d").map_err(|_| fail());
    }

    Err(fail())
}

/// "YYYY-MM" grouping key for a calendar date
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// ISO "YYYY-MM-DD" rendering, the form filters are built from
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn is_year(s: &str) -> bool {
    s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit())
}
