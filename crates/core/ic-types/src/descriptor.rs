//! Descriptor type identifying one image source.

use serde::{Deserialize, Serialize};

/// Identifier of a single image to load.
///
/// The conveyor only ever reads the URI; how it is resolved into pixels is
/// the job of whichever image source the caller plugged in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    /// Path or URL of the image
    pub uri: String,

    /// Which kind of source the URI refers to
    pub kind: SourceKind,
}

/// Kind of source a descriptor points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Local filesystem path
    Path,

    /// HTTP(S) URL
    Url,
}

impl Descriptor {
    /// Creates a descriptor for a local filesystem path.
    pub fn path(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            kind: SourceKind::Path,
        }
    }

    /// Creates a descriptor for an HTTP(S) URL.
    pub fn url(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            kind: SourceKind::Url,
        }
    }

    /// Creates a descriptor, inferring the kind from the URI scheme.
    pub fn infer(uri: impl Into<String>) -> Self {
        let uri = uri.into();
        let kind = if uri.starts_with("http://") || uri.starts_with("https://") {
            SourceKind::Url
        } else {
            SourceKind::Path
        };
        Self { uri, kind }
    }

    /// Returns the URI of this descriptor.
    #[inline]
    pub fn uri(&self) -> &str {
        &self.uri
    }
}

impl std::fmt::Display for Descriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.uri)
    }
}
