//! Client seam to the remote aggregation service.
//!
//! The service owns all tallying; the engine only sends a [`ReportQuery`]
//! and consumes the envelope. A failed fetch is terminal for the current
//! generation attempt, and the same built query can be re-issued verbatim
//! for a retry.

use async_trait::async_trait;
use thiserror::Error;

use super::models::ReportEnvelope;
use super::request::ReportQuery;

/// Transport-level failures talking to the aggregation service.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("could not reach the report service, check your connection and try again")]
    Network(#[source] reqwest::Error),
    #[error("the report service rejected the request (HTTP {0}), try again")]
    Status(u16),
    #[error("the report service returned an unreadable response")]
    Malformed(#[source] serde_json::Error),
    #[error("the report service returned inconsistent tallies for {0}")]
    InconsistentTallies(&'static str),
}

/// Where report data comes from. Implemented over HTTP in production and
/// by in-memory fakes in tests.
#[async_trait]
pub trait ReportSource: Send + Sync {
    async fn fetch_report(&self, query: &ReportQuery) -> Result<ReportEnvelope, SourceError>;
}

/// HTTP-backed source posting the query as JSON.
pub struct HttpReportSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpReportSource {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ReportSource for HttpReportSource {
    async fn fetch_report(&self, query: &ReportQuery) -> Result<ReportEnvelope, SourceError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(query)
            .send()
            .await
            .map_err(SourceError::Network)?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("report service returned HTTP {}", status.as_u16());
            return Err(SourceError::Status(status.as_u16()));
        }

        let raw = response.bytes().await.map_err(SourceError::Network)?;
        let envelope: ReportEnvelope =
            serde_json::from_slice(&raw).map_err(SourceError::Malformed)?;
        verify_envelope(&envelope)?;
        Ok(envelope)
    }
}

/// Reject envelopes whose tallies disagree with themselves before any
/// layout work starts.
pub fn verify_envelope(envelope: &ReportEnvelope) -> Result<(), SourceError> {
    if let Some(group) = envelope.report.tallies.first_inconsistent() {
        return Err(SourceError::InconsistentTallies(group));
    }
    Ok(())
}
