//! Core data types for imgconvey.
//!
//! - [`Descriptor`] identifies one image to load (path or URL)
//! - [`DecodedImage`] wraps a decoded pixel buffer with metadata
//! - [`LoadOutcome`] is the per-item result: an image or a failure marker
//! - [`ConveyorConfig`] carries batch size, iteration cap and worker count

mod config;
mod descriptor;
mod image_data;
mod outcome;

pub use config::{ConveyorConfig, DEFAULT_BATCH_SIZE, DEFAULT_WORKER_COUNT};
pub use descriptor::{Descriptor, SourceKind};
pub use image_data::{DecodedImage, ImageMetadata};
pub use outcome::{LoadFailure, LoadOutcome};
