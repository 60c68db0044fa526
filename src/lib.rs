//! Report generation and pagination engine for the bulletin admin console.
//!
//! The engine resolves a user-selected reporting period into a concrete,
//! timezone-correct date range, shapes the request for the remote
//! aggregation service, and lays the returned tallies, item listings, and
//! images out into a fixed-page-size PDF document.
//!
//! Everything is in-memory and per-invocation: no persisted state, no
//! environment configuration. The remote collaborators (the aggregation
//! service and the image host) sit behind the [`report::ReportSource`] and
//! [`render::ImageFetcher`] traits.

pub mod generate;
pub mod period;
pub mod render;
pub mod report;

pub use generate::{GenerateError, ReportEngine};
pub use period::{Preset, ReportType};
pub use render::GeneratedReport;
pub use report::ReportOptions;
