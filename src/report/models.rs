//! Wire models for the aggregation-service response.
//!
//! The engine treats everything here as read-only input: items and tallies
//! are owned by the remote aggregator and live only for one
//! generate-then-export cycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Announcement,
    CalendarEvent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Regular,
    Alert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementStatus {
    Draft,
    Pending,
    Published,
    Archived,
}

impl AnnouncementStatus {
    pub fn display(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Pending => "Pending",
            Self::Published => "Published",
            Self::Archived => "Archived",
        }
    }
}

/// Kind-specific status payload carried by each item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemStatus {
    #[serde(rename_all = "camelCase")]
    Announcement {
        status: AnnouncementStatus,
        visible_until: Option<DateTime<Utc>>,
    },
    #[serde(rename_all = "camelCase")]
    CalendarEvent {
        active: bool,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportItem {
    pub id: Uuid,
    pub kind: ItemKind,
    pub title: String,
    pub body: String,
    pub occurred_at: DateTime<Utc>,
    pub category: Category,
    /// Image references in display order; may be empty.
    #[serde(default)]
    pub images: Vec<String>,
    pub attribution: String,
    pub status: ItemStatus,
}

/// Counts for one content type, split by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyGroup {
    pub regular: u32,
    pub alert: u32,
    pub total: u32,
}

impl TallyGroup {
    pub fn is_consistent(&self) -> bool {
        self.total == self.regular + self.alert
    }
}

/// Precomputed counts returned by the aggregator. Trusted but checked:
/// a group whose total disagrees with its parts marks the whole response
/// as malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTallies {
    pub announcements: TallyGroup,
    pub calendar_events: TallyGroup,
}

impl ReportTallies {
    /// Name of the first inconsistent group, if any.
    pub fn first_inconsistent(&self) -> Option<&'static str> {
        if !self.announcements.is_consistent() {
            Some("announcements")
        } else if !self.calendar_events.is_consistent() {
            Some("calendarEvents")
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMeta {
    pub generated_at: DateTime<Utc>,
    pub generated_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportBody {
    pub title: String,
    pub description: String,
    pub tallies: ReportTallies,
    pub items: Vec<ReportItem>,
    pub meta: ReportMeta,
}

/// Top-level response envelope from the aggregation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEnvelope {
    pub report: ReportBody,
}
