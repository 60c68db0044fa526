//! Reporting-period selection: timezone-normalized date arithmetic,
//! range resolution per report type, quick presets, and range validation.

pub mod clock;
pub mod presets;
pub mod resolver;
pub mod validation;

pub use clock::{day_end, day_start, reporting_offset, reporting_today};
pub use presets::{Preset, PresetSelection};
pub use resolver::{resolve, DateRange, PeriodSelection, ReportType};
pub use validation::validate;

use thiserror::Error;

/// Errors raised while resolving or validating a reporting period.
///
/// Every variant carries a message suitable for inline display next to the
/// period controls; the user corrects the input, no retry is needed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PeriodError {
    #[error("select a month to report on")]
    MissingMonth,
    #[error("'{0}' is not a valid month, expected YYYY-MM")]
    InvalidMonthToken(String),
    #[error("select a date to report on")]
    MissingAnchor,
    #[error("select both a start date and an end date")]
    MissingCustomBounds,
    #[error("the start date must fall on or before the end date")]
    OutOfOrder,
    #[error("the selected period spans {0} days, the maximum is 365")]
    SpanTooLong(i64),
    #[error("the start date cannot be in the future")]
    StartInFuture,
}
