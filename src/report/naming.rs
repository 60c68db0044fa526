//! Human-readable period labels and filesystem-safe export names.

use chrono::NaiveDate;

use crate::period::clock::{date_token, human_date, month_token};
use crate::period::{DateRange, ReportType};

/// Month name + year, e.g. "March 2025".
fn month_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

/// Period description shown above the generated report.
pub fn period_label(report_type: ReportType, range: &DateRange) -> String {
    match report_type {
        ReportType::Monthly => month_label(range.start_date()),
        ReportType::Weekly => format!(
            "Week: {} \u{2013} {}",
            human_date(range.start_date()),
            human_date(range.end_date())
        ),
        ReportType::Daily => human_date(range.start_date()),
        ReportType::Custom => {
            // A one-day custom range reads like a daily report.
            if range.is_single_day() {
                human_date(range.start_date())
            } else {
                format!(
                    "{} \u{2013} {}",
                    human_date(range.start_date()),
                    human_date(range.end_date())
                )
            }
        }
    }
}

/// Export filename: type, range tokens, and the generation date.
///
/// Non-monthly names carry both range boundaries so two ranges that differ
/// only by boundary rounding never collide on the date components.
pub fn export_filename(
    report_type: ReportType,
    range: &DateRange,
    generated_on: NaiveDate,
) -> String {
    let range_tokens = match report_type {
        ReportType::Monthly => month_token(range.start_date()),
        _ => format!(
            "{}-{}",
            date_token(range.start_date()),
            date_token(range.end_date())
        ),
    };
    format!(
        "{}-report-{}-{}.pdf",
        report_type.slug(),
        range_tokens,
        date_token(generated_on)
    )
}

/// Reduce a free-form string to a lowercase dashed filename component.
pub fn sanitize_component(name: &str, fallback: &str) -> String {
    let mut result = String::new();
    let mut last_dash = false;

    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if ch.is_whitespace() || ch == '-' || ch == '_' {
            if !last_dash && !result.is_empty() {
                result.push('-');
                last_dash = true;
            }
        }
    }

    if result.is_empty() {
        return fallback.to_string();
    }

    result.trim_matches('-').to_string()
}
