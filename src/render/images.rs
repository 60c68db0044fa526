//! Per-image fetch, decode, and re-encode pipeline.
//!
//! Each image is fetched independently and failures stay local: a broken
//! image becomes a placeholder in the document, never an aborted export.
//! Fetches run concurrently up to a small cap, and outcomes are collected
//! in item order so section placement stays deterministic regardless of
//! completion order.

use std::io::Cursor;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use futures::StreamExt;
use printpdf::image_crate::{self, GenericImageView};
use thiserror::Error;

use crate::report::models::ReportItem;

/// Failures that can befall a single image. Recovered per image; never
/// surfaced as a top-level error.
#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("image request failed")]
    Network(#[source] reqwest::Error),
    #[error("image host returned HTTP {0}")]
    Status(u16),
    #[error("image fetch timed out")]
    TimedOut,
    #[error("image data could not be decoded: {0}")]
    Decode(String),
}

/// Where image bytes come from. HTTP in production, fakes in tests.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, reference: &str) -> Result<Vec<u8>, EmbedError>;
}

pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, reference: &str) -> Result<Vec<u8>, EmbedError> {
        let guessed = mime_guess::from_path(reference).first_or_octet_stream();
        log::debug!("fetching image {} ({})", reference, guessed);

        let response = self
            .client
            .get(reference)
            .send()
            .await
            .map_err(EmbedError::Network)?;
        let status = response.status();
        if !status.is_success() {
            return Err(EmbedError::Status(status.as_u16()));
        }
        let bytes = response.bytes().await.map_err(EmbedError::Network)?;
        Ok(bytes.to_vec())
    }
}

/// An image decoded to its natural dimensions and re-encoded to PNG,
/// carried base64-encoded so the document model stays plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedImage {
    pub reference: String,
    pub mime_type: &'static str,
    pub width_px: u32,
    pub height_px: u32,
    pub data: String,
}

impl EmbeddedImage {
    /// Decode raw fetched bytes and normalize them to PNG.
    pub fn from_bytes(reference: &str, bytes: &[u8]) -> Result<Self, EmbedError> {
        let decoded = image_crate::load_from_memory(bytes)
            .map_err(|e| EmbedError::Decode(e.to_string()))?;
        let (width_px, height_px) = decoded.dimensions();

        let mut buffer = Vec::new();
        decoded
            .write_to(&mut Cursor::new(&mut buffer), image_crate::ImageOutputFormat::Png)
            .map_err(|e| EmbedError::Decode(e.to_string()))?;

        Ok(Self {
            reference: reference.to_string(),
            mime_type: "image/png",
            width_px,
            height_px,
            data: BASE64.encode(&buffer),
        })
    }

    pub fn decode_data(&self) -> Result<Vec<u8>, base64::DecodeError> {
        BASE64.decode(&self.data)
    }
}

/// One outcome per `(item, image index)` pair, in item order.
#[derive(Debug)]
pub enum ImageOutcome {
    Embedded(EmbeddedImage),
    Failed { reference: String, error: EmbedError },
}

impl ImageOutcome {
    pub fn reference(&self) -> &str {
        match self {
            Self::Embedded(image) => &image.reference,
            Self::Failed { reference, .. } => reference,
        }
    }
}

/// Fetch and embed every image across `items`.
///
/// Fetches run `concurrency`-wide, but the returned vector is ordered by
/// `(item, image index)`, not by completion.
pub async fn embed_item_images<F: ImageFetcher>(
    items: &[ReportItem],
    fetcher: &F,
    concurrency: usize,
    timeout: Duration,
) -> Vec<ImageOutcome> {
    let references: Vec<String> = items
        .iter()
        .flat_map(|item| item.images.iter().cloned())
        .collect();

    let fetches = references.into_iter().map(|reference| async move {
        let result = match tokio::time::timeout(timeout, fetcher.fetch(&reference)).await {
            Err(_) => Err(EmbedError::TimedOut),
            Ok(fetched) => fetched.and_then(|bytes| EmbeddedImage::from_bytes(&reference, &bytes)),
        };
        match result {
            Ok(image) => ImageOutcome::Embedded(image),
            Err(error) => {
                log::warn!("image {} skipped: {}", reference, error);
                ImageOutcome::Failed { reference, error }
            }
        }
    });

    futures::stream::iter(fetches)
        .buffered(concurrency.max(1))
        .collect()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    // Smallest valid 1x1 PNG, used across the render tests.
    pub(crate) fn tiny_png() -> Vec<u8> {
        let mut bytes = Vec::new();
        let img = image_crate::DynamicImage::new_rgb8(1, 1);
        img.write_to(&mut Cursor::new(&mut bytes), image_crate::ImageOutputFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn from_bytes_records_natural_dimensions() {
        let img = image_crate::DynamicImage::new_rgb8(4, 3);
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image_crate::ImageOutputFormat::Png)
            .unwrap();

        let embedded = EmbeddedImage::from_bytes("pic.png", &bytes).unwrap();
        assert_eq!(embedded.width_px, 4);
        assert_eq!(embedded.height_px, 3);
        assert_eq!(embedded.mime_type, "image/png");
        assert!(!embedded.data.is_empty());
    }

    #[test]
    fn from_bytes_rejects_garbage() {
        let err = EmbeddedImage::from_bytes("broken.png", b"not an image").unwrap_err();
        assert!(matches!(err, EmbedError::Decode(_)));
    }

    #[test]
    fn round_trips_through_base64() {
        let embedded = EmbeddedImage::from_bytes("pic.png", &tiny_png()).unwrap();
        let decoded = embedded.decode_data().unwrap();
        assert!(decoded.starts_with(&[0x89, 0x50, 0x4E, 0x47]));
    }
}
