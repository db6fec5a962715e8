//! Date and time utility functions
//!
//! Tasks carry plain dates (YYYY-MM-DD) and fixed-width UTC timestamps as
//! text; these helpers centralize parsing, formatting, and the comparisons
//! the dashboard views need.

use chrono::{Duration, NaiveDate, Utc};

use crate::constants::{DATE_FORMAT, TIMESTAMP_FORMAT};

/// Parse a date string in YYYY-MM-DD format to `NaiveDate`
pub fn parse_date(date_str: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(date_str, DATE_FORMAT)
}

/// Format a `NaiveDate` to a YYYY-MM-DD string
pub fn format_ymd(d: NaiveDate) -> String {
    d.format(DATE_FORMAT).to_string()
}

/// Format the current UTC date to a YYYY-MM-DD string
pub fn format_today() -> String {
    format_ymd(Utc::now().date_naive())
}

/// Format the date `days_offset` days from today to a YYYY-MM-DD string
pub fn format_date_with_offset(days_offset: i64) -> String {
    format_ymd(Utc::now().date_naive() + Duration::days(days_offset))
}

/// Current UTC timestamp in the fixed-width format used for `created_at`
/// columns. Lexicographic order of these strings is chronological order.
pub fn now_timestamp() -> String {
    Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Whether `date_str` (YYYY-MM-DD) is strictly before `today` (YYYY-MM-DD).
///
/// Unparseable dates are never considered overdue.
pub fn is_before(date_str: &str, today: &str) -> bool {
    match (parse_date(date_str), parse_date(today)) {
        (Ok(date), Ok(today)) => date < today,
        _ => false,
    }
}

/// Whether `date_str` falls inside the inclusive range `(after, until]`.
pub fn is_within(date_str: &str, after: &str, until: &str) -> bool {
    match (parse_date(date_str), parse_date(after), parse_date(until)) {
        (Ok(date), Ok(after), Ok(until)) => date > after && date <= until,
        _ => false,
    }
}
