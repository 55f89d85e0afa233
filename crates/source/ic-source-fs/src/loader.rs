//! Path-based image loading.

use async_trait::async_trait;
use ic_error::SourceError;
use ic_traits::ImageSource;
use ic_types::{DecodedImage, Descriptor};
use std::io::ErrorKind;
use tracing::trace;

/// Image source that reads from the local filesystem.
///
/// The descriptor URI is interpreted as a path. Formats are whatever the
/// `image` crate can sniff from the file contents.
#[derive(Debug, Default, Clone, Copy)]
pub struct PathSource;

impl PathSource {
    /// Create a new filesystem source.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ImageSource for PathSource {
    async fn decode(&self, descriptor: &Descriptor) -> Result<DecodedImage, SourceError> {
        let path = descriptor.uri().to_string();
        trace!(path = %path, "Reading image file");

        let bytes = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => SourceError::NotFound(path.clone()),
            ErrorKind::PermissionDenied => SourceError::AccessDenied(path.clone()),
            _ => SourceError::Io(e.to_string()),
        })?;

        decode_on_blocking_pool(bytes, path).await
    }
}

/// Decode raw bytes on the blocking pool.
///
/// `image::load_from_memory` can take tens of milliseconds for large images,
/// which would stall the async fill task if run inline.
pub(crate) async fn decode_on_blocking_pool(
    bytes: Vec<u8>,
    source: String,
) -> Result<DecodedImage, SourceError> {
    let decode_source = source.clone();
    tokio::task::spawn_blocking(move || DecodedImage::from_bytes(&bytes, decode_source))
        .await
        .map_err(|e| SourceError::Decode(format!("decode task failed for {source}: {e}")))?
        .map_err(|e| SourceError::Decode(e.to_string()))
}
