//! Two-phase layout: plan the ordered section sequence, then flow it onto
//! fixed-size pages.
//!
//! The page-break policy lives entirely in the flow pass and is
//! kind-agnostic: an atomic block that does not fit in the remaining
//! vertical space moves whole to a fresh page. Tables are the one section
//! that may split, and only between rows; the header is re-emitted on the
//! continuation page so no page ever shows a header with zero rows under
//! it.

use thiserror::Error;

use crate::period::reporting_offset;
use crate::report::models::{Category, ItemKind, ItemStatus, ReportBody, ReportItem};

use super::images::ImageOutcome;
use super::sections::{
    Block, Document, Footer, Page, PlacedBlock, Section, TableSection, TitleSection,
    CONFIDENTIALITY_NOTICE,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("the report tallies are inconsistent for {0}")]
    InconsistentTallies(&'static str),
    #[error("expected {expected} image outcomes but received {received}")]
    ImageCountMismatch { expected: usize, received: usize },
}

/// Fixed page geometry and block footprints, in millimetres of printable
/// content area (footer band excluded).
#[derive(Debug, Clone, PartialEq)]
pub struct PageMetrics {
    pub content_width: f64,
    pub content_height: f64,
    pub title_height: f64,
    pub heading_height: f64,
    pub table_header_height: f64,
    pub row_height: f64,
    pub image_height: f64,
    pub placeholder_height: f64,
    pub section_gap: f64,
}

impl Default for PageMetrics {
    fn default() -> Self {
        // A4 with 20 mm side margins and a reserved footer band.
        Self {
            content_width: 170.0,
            content_height: 245.0,
            title_height: 30.0,
            heading_height: 10.0,
            table_header_height: 12.0,
            row_height: 7.0,
            image_height: 70.0,
            placeholder_height: 8.0,
            section_gap: 6.0,
        }
    }
}

/// Materialize the ordered section sequence for one report.
///
/// `outcomes` must hold one entry per `(item, image index)` pair across
/// `body.items`, in item order, as produced by
/// [`super::embed_item_images`]; pass an empty slice when images are
/// excluded.
pub fn plan(
    body: &ReportBody,
    outcomes: &[ImageOutcome],
    period_label: &str,
    include_images: bool,
) -> Result<Vec<Section>, LayoutError> {
    if let Some(group) = body.tallies.first_inconsistent() {
        return Err(LayoutError::InconsistentTallies(group));
    }

    let mut sections = Vec::new();

    let zone = reporting_offset();
    sections.push(Section::Title(TitleSection {
        heading: body.title.clone(),
        description: body.description.clone(),
        period_label: period_label.to_string(),
        generated_at: body
            .meta
            .generated_at
            .with_timezone(&zone)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
        generated_by: body.meta.generated_by.clone(),
    }));

    sections.push(Section::Table(summary_table(body)));

    // Announcements always precede calendar events.
    for kind in [ItemKind::Announcement, ItemKind::CalendarEvent] {
        let partition: Vec<&ReportItem> =
            body.items.iter().filter(|item| item.kind == kind).collect();
        if !partition.is_empty() {
            sections.push(Section::Table(detail_table(kind, &partition)));
        }
    }

    if include_images {
        let expected: usize = body.items.iter().map(|item| item.images.len()).sum();
        if expected != outcomes.len() {
            return Err(LayoutError::ImageCountMismatch {
                expected,
                received: outcomes.len(),
            });
        }
        if !outcomes.is_empty() {
            sections.push(Section::Heading("Attached Images".to_string()));
            for outcome in outcomes {
                match outcome {
                    ImageOutcome::Embedded(image) => sections.push(Section::Image(image.clone())),
                    ImageOutcome::Failed { reference, .. } => {
                        sections.push(Section::Placeholder {
                            reference: reference.clone(),
                        })
                    }
                }
            }
        }
    }

    log::debug!("planned {} sections", sections.len());
    Ok(sections)
}

fn summary_table(body: &ReportBody) -> TableSection {
    let tallies = &body.tallies;
    let row = |content: &str, category: &str, count: u32| {
        vec![content.to_string(), category.to_string(), count.to_string()]
    };
    TableSection {
        title: "Summary".to_string(),
        columns: vec!["Content", "Category", "Count"],
        rows: vec![
            row("Announcements", "Regular", tallies.announcements.regular),
            row("Announcements", "Alert", tallies.announcements.alert),
            row("Calendar Events", "Regular", tallies.calendar_events.regular),
            row("Calendar Events", "Alert", tallies.calendar_events.alert),
        ],
    }
}

/// The one place kind-specific column shapes and status vocabulary live.
fn detail_table(kind: ItemKind, items: &[&ReportItem]) -> TableSection {
    let zone = reporting_offset();
    let local_date = |instant: &chrono::DateTime<chrono::Utc>| {
        instant.with_timezone(&zone).format("%Y-%m-%d").to_string()
    };
    let category = |item: &ReportItem| {
        match item.category {
            Category::Regular => "Regular",
            Category::Alert => "Alert",
        }
        .to_string()
    };

    match kind {
        ItemKind::Announcement => TableSection {
            title: "Announcements".to_string(),
            columns: vec!["Title", "Category", "Published", "Status", "Author"],
            rows: items
                .iter()
                .map(|item| {
                    let status = match &item.status {
                        ItemStatus::Announcement { status, .. } => status.display().to_string(),
                        ItemStatus::CalendarEvent { .. } => "-".to_string(),
                    };
                    vec![
                        item.title.clone(),
                        category(item),
                        local_date(&item.occurred_at),
                        status,
                        item.attribution.clone(),
                    ]
                })
                .collect(),
        },
        ItemKind::CalendarEvent => TableSection {
            title: "Calendar Events".to_string(),
            columns: vec!["Title", "Category", "Starts", "Ends", "Active"],
            rows: items
                .iter()
                .map(|item| {
                    let (starts, ends, active) = match &item.status {
                        ItemStatus::CalendarEvent {
                            active,
                            starts_at,
                            ends_at,
                        } => (
                            local_date(starts_at),
                            local_date(ends_at),
                            if *active { "Active" } else { "Inactive" }.to_string(),
                        ),
                        ItemStatus::Announcement { .. } => {
                            ("-".to_string(), "-".to_string(), "-".to_string())
                        }
                    };
                    vec![item.title.clone(), category(item), starts, ends, active]
                })
                .collect(),
        },
    }
}

struct PageCursor {
    page_index: usize,
    offset: f64,
}

struct Flow<'a> {
    metrics: &'a PageMetrics,
    pages: Vec<Vec<PlacedBlock>>,
    cursor: PageCursor,
}

impl<'a> Flow<'a> {
    fn new(metrics: &'a PageMetrics) -> Self {
        Self {
            metrics,
            pages: vec![Vec::new()],
            cursor: PageCursor {
                page_index: 0,
                offset: 0.0,
            },
        }
    }

    fn remaining(&self) -> f64 {
        self.metrics.content_height - self.cursor.offset
    }

    fn advance_page(&mut self) {
        self.pages.push(Vec::new());
        self.cursor.page_index += 1;
        self.cursor.offset = 0.0;
    }

    /// Advance to a fresh page unless `needed` fits in the remaining space.
    /// Never advances from the top of a fresh page, so an oversized block
    /// is placed once instead of looping.
    fn reserve(&mut self, needed: f64) {
        if needed > self.remaining() && self.cursor.offset > 0.0 {
            self.advance_page();
        }
    }

    fn place(&mut self, height: f64, block: Block) {
        self.reserve(height);
        self.pages[self.cursor.page_index].push(PlacedBlock {
            y: self.cursor.offset,
            height,
            block,
        });
        self.cursor.offset += height;
    }

    fn gap(&mut self) {
        if self.cursor.offset > 0.0 {
            self.cursor.offset += self.metrics.section_gap;
        }
    }

    fn place_table(&mut self, table: &TableSection) {
        let m = self.metrics;
        // Never start a table unless the header and at least one row fit.
        self.reserve(m.table_header_height + m.row_height);
        self.place(
            m.table_header_height,
            Block::TableHeader {
                title: table.title.clone(),
                columns: table.columns.clone(),
            },
        );
        for row in &table.rows {
            if m.row_height > self.remaining() {
                self.advance_page();
                // Continuation pages repeat the header; rows never split.
                self.place(
                    m.table_header_height,
                    Block::TableHeader {
                        title: table.title.clone(),
                        columns: table.columns.clone(),
                    },
                );
            }
            self.place(m.row_height, Block::TableRow { cells: row.clone() });
        }
    }

    fn finish(self) -> Document {
        let total = self.pages.len();
        let pages = self
            .pages
            .into_iter()
            .enumerate()
            .map(|(index, blocks)| Page {
                number: index + 1,
                blocks,
                footer: Footer {
                    text: format!("page {} of {}", index + 1, total),
                    notice: CONFIDENTIALITY_NOTICE,
                },
            })
            .collect();
        Document { pages }
    }
}

/// Flow planned sections onto pages and stamp the footers.
pub fn flow(sections: &[Section], metrics: &PageMetrics) -> Document {
    let mut state = Flow::new(metrics);

    for section in sections {
        match section {
            Section::Title(title) => {
                state.place(metrics.title_height, Block::Title(title.clone()));
            }
            Section::Table(table) => {
                state.gap();
                state.place_table(table);
            }
            Section::Heading(text) => {
                state.gap();
                // Keep the heading attached to at least the smallest block
                // that can follow it.
                state.reserve(metrics.heading_height + metrics.placeholder_height);
                state.place(metrics.heading_height, Block::Heading(text.clone()));
            }
            Section::Image(image) => {
                state.place(metrics.image_height, Block::Image(image.clone()));
            }
            Section::Placeholder { reference } => {
                state.place(
                    metrics.placeholder_height,
                    Block::Placeholder {
                        text: format!("image unavailable: {}", reference),
                    },
                );
            }
        }
    }

    let document = state.finish();
    log::info!("laid out {} pages", document.page_count());
    document
}
