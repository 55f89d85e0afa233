//! Error types and classification for imgconvey.
//!
//! This crate provides:
//! - [`IcError`] - Top-level error enum for the whole pipeline
//! - Domain-specific errors ([`SourceError`], [`ConveyorError`])
//! - [`FailureScope`] distinguishing per-item failures from batch-level ones
//! - A [`Result`] alias used across the workspace

use thiserror::Error;

/// Top-level error type for imgconvey.
#[derive(Error, Debug)]
pub enum IcError {
    /// Image source errors (file access, HTTP fetch, decode)
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Conveyor errors (buffer lifecycle, dispatch)
    #[error("Conveyor error: {0}")]
    Conveyor(#[from] ConveyorError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors (wrapped anyhow)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors produced while resolving one descriptor to a decoded image.
///
/// These never escape the loading boundary as faults: the loader converts
/// them into per-item failure markers inside the batch results.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Image file not found
    #[error("File not found: {0}")]
    NotFound(String),

    /// Access denied reading the image file
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// I/O error while reading bytes
    #[error("I/O error: {0}")]
    Io(String),

    /// Bytes could not be decoded into an image
    #[error("Decode failed: {0}")]
    Decode(String),

    /// HTTP fetch returned a non-success status
    #[error("HTTP status {status} fetching {url}")]
    Http { status: u16, url: String },

    /// HTTP request failed before a response arrived (connect, timeout)
    #[error("Request failed: {0}")]
    Request(String),
}

/// Errors raised by the conveyor itself rather than by a single image.
#[derive(Error, Debug)]
pub enum ConveyorError {
    /// The worker fan-out for a whole batch failed; the batch is lost
    #[error("Batch dispatch failed: {0}")]
    DispatchFailed(String),

    /// A second background fill was requested while one is in flight
    #[error("A buffer fill is already in flight")]
    FillInFlight,

    /// The conveyor was closed; no further batches can be requested
    #[error("Conveyor is closed")]
    Closed,
}

/// Scope of a failure, used to decide how the pipeline reacts.
///
/// Item-scoped failures become markers inside a batch and never halt
/// iteration. Batch-scoped failures drop the whole batch (no retry) and
/// advance the cursor past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureScope {
    /// One descriptor failed; the rest of the batch is unaffected
    Item,

    /// The batch as a whole failed and its results are discarded
    Batch,
}

/// Classifies an error by the blast radius it has on iteration.
pub fn failure_scope(error: &IcError) -> FailureScope {
    match error {
        IcError::Source(_) => FailureScope::Item,
        IcError::Conveyor(_) => FailureScope::Batch,
        IcError::Config(_) => FailureScope::Batch,
        IcError::Other(_) => FailureScope::Batch,
    }
}

/// Result type alias using IcError.
pub type Result<T> = std::result::Result<T, IcError>;
