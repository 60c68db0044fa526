//! Quick-pick period presets.
//!
//! A preset is nothing more than a range producer: applying one switches the
//! report form to a custom range seeded with the computed bounds, so manual
//! edits afterwards compose naturally with the pick.

use chrono::{Datelike, Days, NaiveDate};

use super::resolver::{DateRange, PeriodSelection, ReportType};

/// Named shortcuts shown next to the custom date pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Today,
    Yesterday,
    Last7Days,
    Last30Days,
    ThisMonth,
    LastMonth,
}

/// Result of picking a preset: the report type flips to Custom and the
/// custom bounds are pre-filled with the preset's range.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetSelection {
    pub report_type: ReportType,
    pub selection: PeriodSelection,
}

impl Preset {
    /// Catalog order as presented in the period picker.
    pub fn all() -> [Preset; 6] {
        [
            Preset::Today,
            Preset::Yesterday,
            Preset::Last7Days,
            Preset::Last30Days,
            Preset::ThisMonth,
            Preset::LastMonth,
        ]
    }

    pub fn id(&self) -> &'static str {
        match self {
            Preset::Today => "today",
            Preset::Yesterday => "yesterday",
            Preset::Last7Days => "last-7-days",
            Preset::Last30Days => "last-30-days",
            Preset::ThisMonth => "this-month",
            Preset::LastMonth => "last-month",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Preset::Today => "Today",
            Preset::Yesterday => "Yesterday",
            Preset::Last7Days => "Last 7 Days",
            Preset::Last30Days => "Last 30 Days",
            Preset::ThisMonth => "This Month",
            Preset::LastMonth => "Last Month",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Preset::Today => "Everything published today",
            Preset::Yesterday => "Everything published yesterday",
            Preset::Last7Days => "The last seven days, including today",
            Preset::Last30Days => "The last thirty days, including today",
            Preset::ThisMonth => "From the first of this month through today",
            Preset::LastMonth => "The whole previous calendar month",
        }
    }

    /// Compute the preset's range. Re-evaluated at selection time, never
    /// stored; `today` is the reporting-zone date for this cycle.
    pub fn compute(&self, today: NaiveDate) -> DateRange {
        let (first, last) = self.bounds(today);
        DateRange::over_days(first, last)
    }

    /// Seed a custom selection with the computed range.
    pub fn apply(&self, today: NaiveDate) -> PresetSelection {
        let (first, last) = self.bounds(today);
        PresetSelection {
            report_type: ReportType::Custom,
            selection: PeriodSelection::custom(first, last),
        }
    }

    fn bounds(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Preset::Today => (today, today),
            Preset::Yesterday => {
                let yesterday = today - Days::new(1);
                (yesterday, yesterday)
            }
            Preset::Last7Days => (today - Days::new(6), today),
            Preset::Last30Days => (today - Days::new(29), today),
            Preset::ThisMonth => (today.with_day(1).unwrap(), today),
            Preset::LastMonth => {
                let first_of_this = today.with_day(1).unwrap();
                let last_of_previous = first_of_this - Days::new(1);
                (last_of_previous.with_day(1).unwrap(), last_of_previous)
            }
        }
    }
}
