//! Statistics for conveyor runs.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics collected while a conveyor runs.
///
/// Counters are atomic so the background fill task and the consumer thread
/// can both update them without locking.
#[derive(Debug)]
pub struct ConveyorStats {
    /// When the conveyor was constructed
    started_at: DateTime<Utc>,

    /// When the first fill completed
    first_fill_at: Mutex<Option<DateTime<Utc>>>,

    /// When the most recent fill completed
    last_fill_at: Mutex<Option<DateTime<Utc>>>,

    /// Images decoded successfully
    images_loaded: AtomicU64,

    /// Images that produced a failure marker
    images_failed: AtomicU64,

    /// Batches filled and delivered (or deliverable)
    batches_filled: AtomicU64,

    /// Batches dropped by dispatch failures
    batches_lost: AtomicU64,

    /// Total bytes of decoded pixel data
    bytes_decoded: AtomicU64,
}

impl ConveyorStats {
    /// Create a stats tracker with the current time as start time.
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            first_fill_at: Mutex::new(None),
            last_fill_at: Mutex::new(None),
            images_loaded: AtomicU64::new(0),
            images_failed: AtomicU64::new(0),
            batches_filled: AtomicU64::new(0),
            batches_lost: AtomicU64::new(0),
            bytes_decoded: AtomicU64::new(0),
        }
    }

    /// Record one completed fill.
    pub fn record_fill(&self, loaded: u64, failed: u64, bytes: u64) {
        let now = Utc::now();
        {
            let mut first = self.first_fill_at.lock();
            if first.is_none() {
                *first = Some(now);
            }
        }
        *self.last_fill_at.lock() = Some(now);

        self.batches_filled.fetch_add(1, Ordering::Relaxed);
        self.images_loaded.fetch_add(loaded, Ordering::Relaxed);
        self.images_failed.fetch_add(failed, Ordering::Relaxed);
        self.bytes_decoded.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Record a batch lost to a dispatch failure.
    pub fn record_batch_lost(&self) {
        self.batches_lost.fetch_add(1, Ordering::Relaxed);
    }

    /// Images decoded successfully.
    pub fn images_loaded(&self) -> u64 {
        self.images_loaded.load(Ordering::Relaxed)
    }

    /// Images that produced a failure marker.
    pub fn images_failed(&self) -> u64 {
        self.images_failed.load(Ordering::Relaxed)
    }

    /// Batches filled.
    pub fn batches_filled(&self) -> u64 {
        self.batches_filled.load(Ordering::Relaxed)
    }

    /// Batches dropped by dispatch failures.
    pub fn batches_lost(&self) -> u64 {
        self.batches_lost.load(Ordering::Relaxed)
    }

    /// Total bytes of decoded pixel data.
    pub fn bytes_decoded(&self) -> u64 {
        self.bytes_decoded.load(Ordering::Relaxed)
    }

    /// Wall-clock time since construction.
    pub fn duration(&self) -> Duration {
        Utc::now() - self.started_at
    }

    /// Time between the first and the most recent completed fill.
    pub fn active_duration(&self) -> Option<Duration> {
        let first = *self.first_fill_at.lock();
        let last = *self.last_fill_at.lock();
        match (first, last) {
            (Some(f), Some(l)) => Some(l - f),
            _ => None,
        }
    }

    /// Decoded-image throughput over the active duration.
    pub fn images_per_second(&self) -> Option<f64> {
        self.active_duration().map(|d| {
            let secs = d.num_milliseconds() as f64 / 1000.0;
            if secs > 0.0 {
                self.images_loaded() as f64 / secs
            } else {
                0.0
            }
        })
    }

    /// Create a serializable snapshot of the current statistics.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            started_at: self.started_at,
            first_fill_at: *self.first_fill_at.lock(),
            last_fill_at: *self.last_fill_at.lock(),
            images_loaded: self.images_loaded(),
            images_failed: self.images_failed(),
            batches_filled: self.batches_filled(),
            batches_lost: self.batches_lost(),
            bytes_decoded: self.bytes_decoded(),
        }
    }
}

impl Default for ConveyorStats {
    fn default() -> Self {
        Self::new()
    }
}

/// A serializable snapshot of conveyor statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub started_at: DateTime<Utc>,
    pub first_fill_at: Option<DateTime<Utc>>,
    pub last_fill_at: Option<DateTime<Utc>>,
    pub images_loaded: u64,
    pub images_failed: u64,
    pub batches_filled: u64,
    pub batches_lost: u64,
    pub bytes_decoded: u64,
}

impl StatsSnapshot {
    /// Time between the first and the most recent completed fill.
    pub fn active_duration(&self) -> Option<Duration> {
        match (self.first_fill_at, self.last_fill_at) {
            (Some(first), Some(last)) => Some(last - first),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new_is_zeroed() {
        let stats = ConveyorStats::new();
        assert_eq!(stats.images_loaded(), 0);
        assert_eq!(stats.batches_filled(), 0);
        assert!(stats.active_duration().is_none());
    }

    #[test]
    fn test_record_fill_accumulates() {
        let stats = ConveyorStats::new();
        stats.record_fill(3, 1, 4096);
        stats.record_fill(4, 0, 8192);

        assert_eq!(stats.images_loaded(), 7);
        assert_eq!(stats.images_failed(), 1);
        assert_eq!(stats.batches_filled(), 2);
        assert_eq!(stats.bytes_decoded(), 12288);
        assert!(stats.active_duration().is_some());
    }

    #[test]
    fn test_record_batch_lost() {
        let stats = ConveyorStats::new();
        stats.record_batch_lost();
        stats.record_batch_lost();
        assert_eq!(stats.batches_lost(), 2);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let stats = ConveyorStats::new();
        stats.record_fill(2, 0, 1024);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.images_loaded, 2);
        assert_eq!(snapshot.batches_filled, 1);

        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: StatsSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.images_loaded, 2);
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let stats = Arc::new(ConveyorStats::new());
        let mut handles = vec![];

        for _ in 0..8 {
            let stats = Arc::clone(&stats);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    stats.record_fill(2, 1, 64);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(stats.images_loaded(), 1600);
        assert_eq!(stats.images_failed(), 800);
        assert_eq!(stats.batches_filled(), 800);
    }
}
