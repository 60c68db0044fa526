//! Range validation applied between resolution and the outbound request.
//!
//! Checks run in a fixed order and stop at the first failure so the user
//! sees a single actionable message at a time.

use chrono::NaiveDate;

use super::resolver::DateRange;
use super::PeriodError;

/// Longest period a single report may cover, inclusive of both bounds.
pub const MAX_SPAN_DAYS: i64 = 365;

/// Validate a resolved range against `today` (reporting zone).
pub fn validate(range: &DateRange, today: NaiveDate) -> Result<(), PeriodError> {
    if range.start > range.end {
        return Err(PeriodError::OutOfOrder);
    }
    let span = range.span_days();
    if span > MAX_SPAN_DAYS {
        return Err(PeriodError::SpanTooLong(span));
    }
    if range.start_date() > today {
        return Err(PeriodError::StartInFuture);
    }
    Ok(())
}
