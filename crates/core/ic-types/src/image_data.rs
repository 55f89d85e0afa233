//! Decoded image type for zero-copy pixel data handling.

use image::{DynamicImage, GenericImageView};
use std::sync::Arc;

/// A decoded image wrapped with metadata.
///
/// The pixel buffer is stored in an `Arc`, so cloning a [`DecodedImage`] is
/// cheap and never copies the underlying data. This lets a batch of results
/// move between the fill task and the consumer without reallocation.
#[derive(Clone)]
pub struct DecodedImage {
    /// The underlying pixel buffer
    inner: Arc<DynamicImage>,

    /// Metadata about this image
    metadata: ImageMetadata,
}

/// Metadata associated with a decoded image.
#[derive(Clone, Debug)]
pub struct ImageMetadata {
    /// URI the image was loaded from
    pub source: String,

    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,

    /// Size of the raw pixel buffer in bytes
    pub size_bytes: usize,
}

impl DecodedImage {
    /// Creates a new decoded image with source tracking.
    pub fn new(image: DynamicImage, source: impl Into<String>) -> Self {
        let (width, height) = image.dimensions();
        let size_bytes = image.as_bytes().len();

        Self {
            inner: Arc::new(image),
            metadata: ImageMetadata {
                source: source.into(),
                width,
                height,
                size_bytes,
            },
        }
    }

    /// Decodes an image from raw bytes.
    ///
    /// The format is guessed from the content. This is a blocking,
    /// CPU-bound call; async callers run it on a blocking thread.
    pub fn from_bytes(bytes: &[u8], source: impl Into<String>) -> image::ImageResult<Self> {
        let image = image::load_from_memory(bytes)?;
        Ok(Self::new(image, source))
    }

    /// Returns a reference to the underlying pixel buffer.
    #[inline]
    pub fn image(&self) -> &DynamicImage {
        &self.inner
    }

    /// Returns a clone of the `Arc<DynamicImage>`.
    #[inline]
    pub fn arc(&self) -> Arc<DynamicImage> {
        Arc::clone(&self.inner)
    }

    /// Returns metadata about this image.
    #[inline]
    pub fn metadata(&self) -> &ImageMetadata {
        &self.metadata
    }

    /// Returns the source URI this image was loaded from.
    #[inline]
    pub fn source(&self) -> &str {
        &self.metadata.source
    }

    /// Returns the width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.metadata.width
    }

    /// Returns the height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.metadata.height
    }

    /// Returns the size of the raw pixel buffer in bytes.
    #[inline]
    pub fn size_bytes(&self) -> usize {
        self.metadata.size_bytes
    }
}

impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedImage")
            .field("metadata", &self.metadata)
            .finish()
    }
}
