//! Report data model, outbound query shaping, export naming, and the
//! client seam to the remote aggregation service.

pub mod client;
pub mod models;
pub mod naming;
pub mod request;

pub use client::{HttpReportSource, ReportSource, SourceError};
pub use models::{
    AnnouncementStatus, Category, ItemKind, ItemStatus, ReportBody, ReportEnvelope, ReportItem,
    ReportMeta, ReportTallies, TallyGroup,
};
pub use naming::{export_filename, period_label};
pub use request::{build_query, ContentField, ReportOptions, ReportQuery};
