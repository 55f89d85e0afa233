//! HTTP-backed image source.
//!
//! Fetches image bytes over HTTP(S) and decodes them. A non-success status
//! is a per-item failure, not a fault; so is a connect error or timeout.

mod loader;

pub use loader::{UrlSource, DEFAULT_FETCH_TIMEOUT_SECS};
