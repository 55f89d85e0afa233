//! Per-item load results.

use crate::{DecodedImage, Descriptor};
use ic_error::SourceError;

/// Result of loading one descriptor.
///
/// A failed load never aborts the batch it belongs to; it occupies its slot
/// in the result sequence as an explicit marker the consumer must handle.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The image was fetched and decoded
    Loaded(DecodedImage),

    /// The image could not be loaded
    Failed(LoadFailure),
}

/// Marker describing a failed load.
#[derive(Debug)]
pub struct LoadFailure {
    /// The descriptor that failed
    pub descriptor: Descriptor,

    /// Why it failed
    pub error: SourceError,
}

impl LoadOutcome {
    /// Returns true if the image was loaded successfully.
    #[inline]
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded(_))
    }

    /// Returns the decoded image, if loading succeeded.
    pub fn image(&self) -> Option<&DecodedImage> {
        match self {
            LoadOutcome::Loaded(image) => Some(image),
            LoadOutcome::Failed(_) => None,
        }
    }

    /// Returns the failure marker, if loading failed.
    pub fn failure(&self) -> Option<&LoadFailure> {
        match self {
            LoadOutcome::Loaded(_) => None,
            LoadOutcome::Failed(failure) => Some(failure),
        }
    }

    /// Returns the URI this outcome refers to.
    pub fn source_uri(&self) -> &str {
        match self {
            LoadOutcome::Loaded(image) => image.source(),
            LoadOutcome::Failed(failure) => failure.descriptor.uri(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::DynamicImage;

    #[test]
    fn test_loaded_outcome() {
        let image = DecodedImage::new(DynamicImage::new_rgb8(1, 1), "a.png");
        let outcome = LoadOutcome::Loaded(image);

        assert!(outcome.is_loaded());
        assert!(outcome.image().is_some());
        assert!(outcome.failure().is_none());
        assert_eq!(outcome.source_uri(), "a.png");
    }

    #[test]
    fn test_failed_outcome() {
        let outcome = LoadOutcome::Failed(LoadFailure {
            descriptor: Descriptor::path("missing.png"),
            error: SourceError::NotFound("missing.png".to_string()),
        });

        assert!(!outcome.is_loaded());
        assert!(outcome.image().is_none());
        assert_eq!(outcome.source_uri(), "missing.png");
    }
}
