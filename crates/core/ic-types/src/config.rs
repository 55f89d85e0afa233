//! Conveyor configuration.

use serde::{Deserialize, Serialize};

/// Default number of images per batch.
pub const DEFAULT_BATCH_SIZE: usize = 1;

/// Default number of decode workers (1 = sequential).
pub const DEFAULT_WORKER_COUNT: usize = 1;

/// Configuration for an image conveyor.
///
/// The descriptor list and the image source are fixed at construction; the
/// worker count and iteration cap may additionally be changed afterwards
/// through the conveyor's setters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConveyorConfig {
    /// Number of images per batch (final batch may be shorter).
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Total images to iterate.
    ///
    /// `None` means one pass over the descriptor list. A cap larger than the
    /// list length wraps around and revisits earlier descriptors.
    #[serde(default)]
    pub iteration_cap: Option<usize>,

    /// Number of decode workers per batch (default: 1 = sequential).
    #[serde(default = "default_worker_count")]
    pub workers: usize,
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_worker_count() -> usize {
    DEFAULT_WORKER_COUNT
}

impl Default for ConveyorConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            iteration_cap: None,
            workers: default_worker_count(),
        }
    }
}

impl ConveyorConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of images per batch.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Set the total number of images to iterate.
    pub fn with_iteration_cap(mut self, cap: usize) -> Self {
        self.iteration_cap = Some(cap);
        self
    }

    /// Set the number of decode workers per batch.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.batch_size == 0 {
            return Err("batch_size must be at least 1".to_string());
        }
        if self.workers == 0 {
            return Err("workers must be at least 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ConveyorConfig::new();
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(config.workers, DEFAULT_WORKER_COUNT);
        assert!(config.iteration_cap.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = ConveyorConfig::new()
            .with_batch_size(16)
            .with_iteration_cap(100)
            .with_workers(4);

        assert_eq!(config.batch_size, 16);
        assert_eq!(config.iteration_cap, Some(100));
        assert_eq!(config.workers, 4);
    }

    #[test]
    fn test_config_validation() {
        assert!(ConveyorConfig::new().validate().is_ok());
        assert!(ConveyorConfig::new().with_batch_size(0).validate().is_err());
        assert!(ConveyorConfig::new().with_workers(0).validate().is_err());

        // A zero cap is legal: iteration is exhausted immediately
        assert!(ConveyorConfig::new().with_iteration_cap(0).validate().is_ok());
    }

    #[test]
    fn test_config_serde_defaults() {
        let parsed: ConveyorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(parsed.workers, DEFAULT_WORKER_COUNT);
        assert!(parsed.iteration_cap.is_none());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = ConveyorConfig::new().with_batch_size(8).with_workers(2);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: ConveyorConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.batch_size, config.batch_size);
        assert_eq!(parsed.workers, config.workers);
        assert_eq!(parsed.iteration_cap, config.iteration_cap);
    }
}
