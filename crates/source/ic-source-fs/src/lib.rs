//! Filesystem-backed image source.
//!
//! Reads image files from local paths and decodes them. Decoding is CPU-bound
//! and runs on the blocking thread pool so fill tasks stay responsive.

mod loader;

pub use loader::PathSource;
