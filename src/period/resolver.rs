//! Resolves a report-type selection into a concrete inclusive date range.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::clock::{day_end, day_start};
use super::PeriodError;

/// Which kind of reporting period the user selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Monthly,
    Weekly,
    Daily,
    Custom,
}

impl ReportType {
    /// Filename prefix, e.g. "monthly" in "monthly-report-...".
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Weekly => "weekly",
            Self::Daily => "daily",
            Self::Custom => "custom",
        }
    }
}

/// Raw period inputs as they come off the report form. Which fields matter
/// depends on the active [`ReportType`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeriodSelection {
    /// "YYYY-MM" token, Monthly only.
    pub month: Option<String>,
    /// Anchor date, Weekly and Daily.
    pub anchor: Option<NaiveDate>,
    /// Custom range bounds, in either order.
    pub custom_start: Option<NaiveDate>,
    pub custom_end: Option<NaiveDate>,
}

impl PeriodSelection {
    pub fn monthly(token: impl Into<String>) -> Self {
        Self {
            month: Some(token.into()),
            ..Self::default()
        }
    }

    pub fn anchored(date: NaiveDate) -> Self {
        Self {
            anchor: Some(date),
            ..Self::default()
        }
    }

    pub fn custom(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            custom_start: Some(start),
            custom_end: Some(end),
            ..Self::default()
        }
    }
}

/// An inclusive instant pair in the reporting timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl DateRange {
    /// Build a range from inclusive calendar dates, expanding to full days.
    pub fn over_days(first: NaiveDate, last: NaiveDate) -> Self {
        Self {
            start: day_start(first),
            end: day_end(last),
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date_naive()
    }

    /// Calendar-day distance between the bounds; 0 for a single-day range.
    pub fn span_days(&self) -> i64 {
        (self.end_date() - self.start_date()).num_days()
    }

    pub fn is_single_day(&self) -> bool {
        self.start_date() == self.end_date()
    }
}

/// Resolve the selected period into a concrete range.
///
/// Pure and deterministic: the ambient clock plays no part here. Future or
/// oversized ranges are caught afterwards by [`super::validate`], which takes
/// the "today" computed once per generation cycle.
pub fn resolve(
    report_type: ReportType,
    selection: &PeriodSelection,
) -> Result<DateRange, PeriodError> {
    match report_type {
        ReportType::Monthly => {
            let token = selection.month.as_deref().ok_or(PeriodError::MissingMonth)?;
            let first = parse_month_token(token)?;
            Ok(DateRange::over_days(first, last_day_of_month(first)))
        }
        ReportType::Weekly => {
            let anchor = selection.anchor.ok_or(PeriodError::MissingAnchor)?;
            // ISO week: Monday through the Sunday of the same week. A Sunday
            // anchor belongs to the week that precedes it, not the next one.
            let week = anchor.week(Weekday::Mon);
            Ok(DateRange::over_days(week.first_day(), week.last_day()))
        }
        ReportType::Daily => {
            let anchor = selection.anchor.ok_or(PeriodError::MissingAnchor)?;
            Ok(DateRange::over_days(anchor, anchor))
        }
        ReportType::Custom => {
            let (a, b) = match (selection.custom_start, selection.custom_end) {
                (Some(a), Some(b)) => (a, b),
                _ => return Err(PeriodError::MissingCustomBounds),
            };
            // Reversed bounds are swapped rather than rejected.
            let (first, last) = if a <= b { (a, b) } else { (b, a) };
            Ok(DateRange::over_days(first, last))
        }
    }
}

fn parse_month_token(token: &str) -> Result<NaiveDate, PeriodError> {
    let invalid = || PeriodError::InvalidMonthToken(token.to_string());
    let (year, month) = token.split_once('-').ok_or_else(invalid)?;
    if year.len() != 4 || month.len() != 2 {
        return Err(invalid());
    }
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)
}

fn last_day_of_month(first: NaiveDate) -> NaiveDate {
    let (next_year, next_month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .unwrap()
}
