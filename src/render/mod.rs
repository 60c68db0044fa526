//! Document assembly: section planning, page flow, image embedding, and
//! the PDF backend.

pub mod images;
pub mod layout;
pub mod pdf;
pub mod sections;

pub use images::{embed_item_images, EmbedError, EmbeddedImage, HttpImageFetcher, ImageFetcher, ImageOutcome};
pub use layout::{flow, plan, LayoutError, PageMetrics};
pub use pdf::render_pdf;
pub use sections::{Block, Document, Footer, Page, PlacedBlock, Section};

use thiserror::Error;

/// Errors from the PDF backend.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to assemble the PDF: {0}")]
    Pdf(String),
    #[error("failed to place an embedded image: {0}")]
    Image(String),
}

/// Result of a successful generation cycle.
#[derive(Debug)]
pub struct GeneratedReport {
    pub filename: String,
    pub pdf: Vec<u8>,
    pub period_label: String,
}
