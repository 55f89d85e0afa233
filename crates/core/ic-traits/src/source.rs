//! Image source trait and the loader wrapper around it.

use async_trait::async_trait;
use ic_error::SourceError;
use ic_types::{DecodedImage, Descriptor, LoadFailure, LoadOutcome};
use std::sync::Arc;
use tracing::{debug, warn};

/// Trait for resolving a descriptor into a decoded image.
///
/// Implementations report every failure through [`SourceError`]; nothing may
/// panic across this boundary. The conveyor wraps each call in an
/// [`ImageLoader`], which turns errors into per-item failure markers.
///
/// # Implementations
///
/// - `ic-source-fs`: reads a local file and decodes it
/// - `ic-source-http`: fetches a URL and decodes the body
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetches and decodes one image.
    async fn decode(&self, descriptor: &Descriptor) -> Result<DecodedImage, SourceError>;
}

/// Observer invoked synchronously after every successful load.
///
/// Side-effect only; it cannot alter the decoded image or the outcome.
pub type AfterLoad = Arc<dyn Fn(&DecodedImage) + Send + Sync>;

/// Pairs an [`ImageSource`] with an optional post-load observer.
///
/// `load` is the operation the conveyor dispatches per descriptor: it never
/// fails, converting source errors into [`LoadOutcome::Failed`] markers that
/// keep their slot in the batch.
#[derive(Clone)]
pub struct ImageLoader {
    source: Arc<dyn ImageSource>,
    after_load: Option<AfterLoad>,
}

impl ImageLoader {
    /// Create a loader around the given source.
    pub fn new(source: Arc<dyn ImageSource>) -> Self {
        Self {
            source,
            after_load: None,
        }
    }

    /// Set an observer to run after every successful load.
    pub fn with_after_load(mut self, hook: AfterLoad) -> Self {
        self.after_load = Some(hook);
        self
    }

    /// Load one descriptor, converting any failure into a marker.
    pub async fn load(&self, descriptor: &Descriptor) -> LoadOutcome {
        match self.source.decode(descriptor).await {
            Ok(image) => {
                if let Some(hook) = &self.after_load {
                    hook(&image);
                }
                debug!(
                    source = %descriptor.uri(),
                    width = image.width(),
                    height = image.height(),
                    "Image loaded"
                );
                LoadOutcome::Loaded(image)
            }
            Err(error) => {
                warn!(
                    source = %descriptor.uri(),
                    error = %error,
                    "Image load failed"
                );
                LoadOutcome::Failed(LoadFailure {
                    descriptor: descriptor.clone(),
                    error,
                })
            }
        }
    }
}

impl std::fmt::Debug for ImageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageLoader")
            .field("after_load", &self.after_load.is_some())
            .finish()
    }
}
