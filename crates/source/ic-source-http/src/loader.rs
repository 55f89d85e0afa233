//! URL-based image loading.

use async_trait::async_trait;
use ic_error::{IcError, Result, SourceError};
use ic_traits::ImageSource;
use ic_types::{DecodedImage, Descriptor};
use reqwest::Client;
use std::time::Duration;
use tracing::trace;

/// Default timeout for one image fetch in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 100;

/// Image source that fetches from HTTP(S) URLs.
///
/// One shared `reqwest` client handles all fetches; connection pooling comes
/// for free across the images of a batch.
#[derive(Debug, Clone)]
pub struct UrlSource {
    client: Client,
}

impl UrlSource {
    /// Create a new URL source with the default fetch timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS))
    }

    /// Create a new URL source with a custom per-request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| IcError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ImageSource for UrlSource {
    async fn decode(&self, descriptor: &Descriptor) -> std::result::Result<DecodedImage, SourceError> {
        let url = descriptor.uri();
        trace!(url = %url, "Fetching image");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::Request(e.to_string()))?;

        let source = url.to_string();
        let decode_source = source.clone();
        tokio::task::spawn_blocking(move || DecodedImage::from_bytes(&bytes, decode_source))
            .await
            .map_err(|e| SourceError::Decode(format!("decode task failed for {source}: {e}")))?
            .map_err(|e| SourceError::Decode(e.to_string()))
    }
}
