//! The one asynchronous entry point: resolve, validate, fetch, embed,
//! lay out, render, name.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::period::{
    reporting_today, resolve, validate, PeriodError, PeriodSelection, ReportType,
};
use crate::render::layout::{flow, plan, LayoutError, PageMetrics};
use crate::render::pdf::render_pdf;
use crate::render::{embed_item_images, GeneratedReport, ImageFetcher, RenderError};
use crate::report::client::{verify_envelope, ReportSource, SourceError};
use crate::report::naming::{export_filename, period_label};
use crate::report::request::{build_query, ReportOptions};

/// Top-level failure taxonomy for one generation attempt.
///
/// Period and source failures are terminal: no partial document is
/// produced. Per-image failures never appear here; they degrade the
/// document in place.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Period(#[from] PeriodError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Sequences a full generate-then-export cycle over the two remote seams.
///
/// Holds no per-report state: every invocation owns its own range, item
/// snapshot, and page cursor, so rapid re-invocations cannot interfere
/// with each other. Guarding the trigger while a generation is in flight
/// is the caller's concern.
pub struct ReportEngine<S, F> {
    source: S,
    images: F,
    options: ReportOptions,
    metrics: PageMetrics,
}

impl<S: ReportSource, F: ImageFetcher> ReportEngine<S, F> {
    pub fn new(source: S, images: F, options: ReportOptions) -> Self {
        Self {
            source,
            images,
            options,
            metrics: PageMetrics::default(),
        }
    }

    pub fn with_page_metrics(mut self, metrics: PageMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// Run one full cycle. `now` is read exactly once, here, and threaded
    /// through every boundary check.
    pub async fn generate_and_export(
        &self,
        report_type: ReportType,
        selection: &PeriodSelection,
        now: DateTime<Utc>,
    ) -> Result<GeneratedReport, GenerateError> {
        let today = reporting_today(now);

        let range = resolve(report_type, selection)?;
        validate(&range, today)?;
        let label = period_label(report_type, &range);
        log::info!("generating {} report for {}", report_type.slug(), label);

        let query = build_query(report_type, &range, &self.options);
        let envelope = self.source.fetch_report(&query).await?;
        verify_envelope(&envelope)?;
        let body = &envelope.report;
        log::debug!(
            "received {} items ({} announcements tallied, {} events tallied)",
            body.items.len(),
            body.tallies.announcements.total,
            body.tallies.calendar_events.total
        );

        let outcomes = if self.options.include_images {
            embed_item_images(
                &body.items,
                &self.images,
                self.options.image_concurrency,
                self.options.image_timeout,
            )
            .await
        } else {
            Vec::new()
        };

        let sections = plan(body, &outcomes, &label, self.options.include_images)?;
        let document = flow(&sections, &self.metrics);
        let pdf = render_pdf(&document, &self.metrics, &body.title)?;

        Ok(GeneratedReport {
            filename: export_filename(report_type, &range, today),
            pdf,
            period_label: label,
        })
    }
}
