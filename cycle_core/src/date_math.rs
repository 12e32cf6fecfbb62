//! Calendar-day helpers.
//!
//! All comparisons go through `NaiveDate` arithmetic; wire strings and
//! timestamps are never compared directly.

use chrono::{Duration, NaiveDate};

/// Wire format for persisted dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a wire date, tolerating trailing time components.
///
/// Only the first 10 characters are considered, so `2024-01-01T08:00:00Z`
/// files under `2024-01-01`. Malformed input yields `None`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let prefix = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok()
}

/// Whole calendar days from `earlier` to `later` (negative if reversed)
pub fn days_between(later: NaiveDate, earlier: NaiveDate) -> i64 {
    (later - earlier).num_days()
}

/// Position within a repeating cycle; never negative
pub fn day_in_cycle(diff: i64, cycle_len: i64) -> i64 {
    diff.rem_euclid(cycle_len.max(1))
}

/// `date` shifted by `days`; `None` if the result leaves chrono's range
pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    Duration::try_days(days).and_then(|delta| date.checked_add_signed(delta))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
