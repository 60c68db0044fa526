//! Fixed-offset clock helpers for the reporting timezone.
//!
//! All day-boundary computations in the engine happen in UTC+8. The ambient
//! clock is read once per generation cycle and threaded through as a
//! `NaiveDate` so every component agrees on what "today" means.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};

const REPORTING_OFFSET_SECS: i32 = 8 * 3600;

/// The fixed UTC+8 offset used for all reporting-period arithmetic.
pub fn reporting_offset() -> FixedOffset {
    FixedOffset::east_opt(REPORTING_OFFSET_SECS).unwrap()
}

/// Today's calendar date in the reporting timezone.
pub fn reporting_today(now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&reporting_offset()).date_naive()
}

/// First instant of `date` (00:00:00.000) in the reporting timezone.
pub fn day_start(date: NaiveDate) -> DateTime<FixedOffset> {
    let naive = date.and_hms_opt(0, 0, 0).unwrap();
    reporting_offset().from_local_datetime(&naive).unwrap()
}

/// Last instant of `date` (23:59:59.999) in the reporting timezone.
pub fn day_end(date: NaiveDate) -> DateTime<FixedOffset> {
    let naive = date.and_hms_milli_opt(23, 59, 59, 999).unwrap();
    reporting_offset().from_local_datetime(&naive).unwrap()
}

/// Wire-format date string, e.g. "2025-03-01".
pub fn wire_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Human-readable date, e.g. "Mar 1, 2025".
pub fn human_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Compact date token for filenames, e.g. "20250301".
pub fn date_token(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Compact month token for filenames, e.g. "202503".
pub fn month_token(date: NaiveDate) -> String {
    date.format("%Y%m").to_string()
}
