//! Shared helpers and mock collaborators for the integration tests.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use printpdf::image_crate;
use uuid::Uuid;

use bulletin_report_engine::render::{EmbedError, ImageFetcher};
use bulletin_report_engine::report::{
    AnnouncementStatus, Category, ItemKind, ItemStatus, ReportBody, ReportEnvelope, ReportItem,
    ReportMeta, ReportQuery, ReportSource, ReportTallies, SourceError, TallyGroup,
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Smallest valid PNG used wherever tests need real image bytes.
pub fn tiny_png() -> Vec<u8> {
    let mut bytes = Vec::new();
    image_crate::DynamicImage::new_rgb8(2, 2)
        .write_to(&mut Cursor::new(&mut bytes), image_crate::ImageOutputFormat::Png)
        .unwrap();
    bytes
}

pub fn announcement(title: &str, images: Vec<&str>) -> ReportItem {
    ReportItem {
        id: Uuid::new_v4(),
        kind: ItemKind::Announcement,
        title: title.to_string(),
        body: "Details follow.".to_string(),
        occurred_at: Utc.with_ymd_and_hms(2025, 3, 5, 1, 30, 0).unwrap(),
        category: Category::Regular,
        images: images.into_iter().map(str::to_string).collect(),
        attribution: "Admin Office".to_string(),
        status: ItemStatus::Announcement {
            status: AnnouncementStatus::Published,
            visible_until: None,
        },
    }
}

pub fn calendar_event(title: &str) -> ReportItem {
    ReportItem {
        id: Uuid::new_v4(),
        kind: ItemKind::CalendarEvent,
        title: title.to_string(),
        body: String::new(),
        occurred_at: Utc.with_ymd_and_hms(2025, 3, 7, 1, 0, 0).unwrap(),
        category: Category::Alert,
        images: Vec::new(),
        attribution: "Registrar".to_string(),
        status: ItemStatus::CalendarEvent {
            active: true,
            starts_at: Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap(),
            ends_at: Utc.with_ymd_and_hms(2025, 3, 11, 0, 0, 0).unwrap(),
        },
    }
}

pub fn envelope(items: Vec<ReportItem>) -> ReportEnvelope {
    let count = |kind: ItemKind, category: Category| {
        items
            .iter()
            .filter(|i| i.kind == kind && i.category == category)
            .count() as u32
    };
    let group = |kind: ItemKind| {
        let regular = count(kind, Category::Regular);
        let alert = count(kind, Category::Alert);
        TallyGroup {
            regular,
            alert,
            total: regular + alert,
        }
    };
    ReportEnvelope {
        report: ReportBody {
            title: "Bulletin Report".to_string(),
            description: "Content activity for the selected period".to_string(),
            tallies: ReportTallies {
                announcements: group(ItemKind::Announcement),
                calendar_events: group(ItemKind::CalendarEvent),
            },
            items,
            meta: ReportMeta {
                generated_at: Utc.with_ymd_and_hms(2025, 8, 5, 2, 0, 0).unwrap(),
                generated_by: "aggregator".to_string(),
            },
        },
    }
}

/// In-memory aggregation service; records the last query it received.
pub struct MockReportSource {
    envelope: ReportEnvelope,
    last_query: Arc<Mutex<Option<ReportQuery>>>,
    fail_with_status: Option<u16>,
}

impl MockReportSource {
    pub fn new(envelope: ReportEnvelope) -> Self {
        Self {
            envelope,
            last_query: Arc::new(Mutex::new(None)),
            fail_with_status: None,
        }
    }

    pub fn failing(envelope: ReportEnvelope, status: u16) -> Self {
        Self {
            fail_with_status: Some(status),
            ..Self::new(envelope)
        }
    }

    /// Handle that keeps working after the source moves into an engine.
    pub fn query_log(&self) -> Arc<Mutex<Option<ReportQuery>>> {
        self.last_query.clone()
    }
}

#[async_trait::async_trait]
impl ReportSource for MockReportSource {
    async fn fetch_report(&self, query: &ReportQuery) -> Result<ReportEnvelope, SourceError> {
        *self.last_query.lock().unwrap() = Some(query.clone());
        if let Some(status) = self.fail_with_status {
            return Err(SourceError::Status(status));
        }
        Ok(self.envelope.clone())
    }
}

/// In-memory image host: known references resolve to bytes, everything
/// else fails like a missing object.
pub struct MockImageFetcher {
    files: HashMap<String, Vec<u8>>,
}

impl MockImageFetcher {
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
        }
    }

    pub fn with(mut self, reference: &str, bytes: Vec<u8>) -> Self {
        self.files.insert(reference.to_string(), bytes);
        self
    }
}

#[async_trait::async_trait]
impl ImageFetcher for MockImageFetcher {
    async fn fetch(&self, reference: &str) -> Result<Vec<u8>, EmbedError> {
        match self.files.get(reference) {
            Some(bytes) => Ok(bytes.clone()),
            None => Err(EmbedError::Status(404)),
        }
    }
}
