//! Outbound query shaping for the aggregation service.
//!
//! Pure payload construction: the report type picks which date-field group
//! is populated, content filters and the image flag ride along unchanged.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::period::clock::wire_date;
use crate::period::{DateRange, ReportType};

/// Content types the aggregator can include, under their wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentField {
    Announcements,
    SchoolCalendar,
}

/// Per-generation options chosen on the report form.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub fields: Vec<ContentField>,
    pub include_images: bool,
    /// Concurrent image fetches during export.
    pub image_concurrency: usize,
    /// Per-image fetch deadline.
    pub image_timeout: Duration,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            fields: vec![ContentField::Announcements, ContentField::SchoolCalendar],
            include_images: true,
            image_concurrency: 4,
            image_timeout: Duration::from_secs(10),
        }
    }
}

/// The request payload sent to the aggregation service. Exactly one of the
/// date-shaped field groups is populated, selected by report type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_end: Option<String>,
    pub fields: Vec<ContentField>,
    pub include_images: bool,
}

/// Map a validated range into the outbound request shape.
pub fn build_query(
    report_type: ReportType,
    range: &DateRange,
    options: &ReportOptions,
) -> ReportQuery {
    let mut query = ReportQuery {
        month: None,
        start_date: None,
        end_date: None,
        week_start: None,
        week_end: None,
        fields: options.fields.clone(),
        include_images: options.include_images,
    };
    match report_type {
        ReportType::Monthly => {
            query.month = Some(range.start_date().format("%Y-%m").to_string());
        }
        ReportType::Weekly => {
            query.week_start = Some(wire_date(range.start_date()));
            query.week_end = Some(wire_date(range.end_date()));
        }
        ReportType::Daily | ReportType::Custom => {
            query.start_date = Some(wire_date(range.start_date()));
            query.end_date = Some(wire_date(range.end_date()));
        }
    }
    query
}
