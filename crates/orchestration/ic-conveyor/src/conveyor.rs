//! The consumer-facing conveyor.

use crate::dispatch::BatchDispatcher;
use crate::planner::BatchPlanner;
use crate::slot::BufferSlot;
use crate::stats::ConveyorStats;
use crate::swap::{BufferSwap, FillOutcome};
use ic_error::{ConveyorError, IcError, Result};
use ic_traits::ImageLoader;
use ic_types::{ConveyorConfig, Descriptor};
use std::sync::Arc;
use tracing::{error, info, trace};

/// Double-buffered image-batch prefetcher.
///
/// Construction immediately starts loading the first batch in the
/// background; each `next_batch` call joins the in-flight fill, hands its
/// results to the caller and starts filling the batch after it. The caller
/// therefore consumes batch N while batch N+1 is being loaded.
///
/// Must be constructed and driven inside a tokio runtime.
///
/// # Example
///
/// ```ignore
/// use ic_conveyor::ImageConveyor;
/// use ic_source_fs::PathSource;
/// use ic_traits::ImageLoader;
/// use ic_types::{ConveyorConfig, Descriptor};
/// use std::sync::Arc;
///
/// let loader = ImageLoader::new(Arc::new(PathSource::new()));
/// let descriptors = vec![Descriptor::path("a.png"), Descriptor::path("b.png")];
/// let config = ConveyorConfig::new().with_batch_size(2);
///
/// let mut conveyor = ImageConveyor::new(loader, descriptors, config)?;
/// while let Some(slot) = conveyor.next_batch().await? {
///     for outcome in &slot {
///         // outcome is a decoded image or a failure marker
///     }
/// }
/// conveyor.close();
/// ```
pub struct ImageConveyor {
    loader: ImageLoader,
    planner: BatchPlanner,
    cap: usize,
    workers: usize,
    cursor: usize,
    swap: BufferSwap,
    stats: Arc<ConveyorStats>,
    closed: bool,
}

impl ImageConveyor {
    /// Create a conveyor and start prefetching the first batch.
    ///
    /// The descriptor list, batch size and image source are fixed for the
    /// conveyor's lifetime; the worker count and iteration cap can still be
    /// adjusted through [`set_workers`](Self::set_workers) and
    /// [`set_iteration_cap`](Self::set_iteration_cap).
    pub fn new(
        loader: ImageLoader,
        descriptors: Vec<Descriptor>,
        config: ConveyorConfig,
    ) -> Result<Self> {
        config.validate().map_err(IcError::Config)?;

        let cap = config.iteration_cap.unwrap_or(descriptors.len());
        let planner = BatchPlanner::new(descriptors, config.batch_size);

        info!(
            descriptors = planner.descriptor_count(),
            batch_size = planner.batch_size(),
            cap,
            workers = config.workers,
            "Starting conveyor"
        );

        let mut conveyor = Self {
            loader,
            planner,
            cap,
            workers: config.workers,
            cursor: 0,
            swap: BufferSwap::idle(),
            stats: Arc::new(ConveyorStats::new()),
            closed: false,
        };

        // First batch starts loading before any consumer request.
        conveyor.trigger_fill()?;
        Ok(conveyor)
    }

    /// Change the worker count for subsequently planned fills.
    ///
    /// The fill already in flight keeps the count it was planned with.
    pub fn set_workers(&mut self, workers: usize) {
        self.workers = workers.max(1);
    }

    /// Change the iteration cap for subsequently planned fills.
    pub fn set_iteration_cap(&mut self, cap: usize) {
        self.cap = cap;
    }

    /// Shared statistics handle.
    pub fn stats(&self) -> Arc<ConveyorStats> {
        Arc::clone(&self.stats)
    }

    /// True once the conveyor has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Block until the in-flight fill completes, return its slot and start
    /// filling the next batch.
    ///
    /// Returns `Ok(None)` once the iteration cap is reached. A slot with
    /// [`BufferSlot::is_lost`] set marks a batch dropped by a dispatch
    /// failure; iteration continues past it.
    pub async fn next_batch(&mut self) -> Result<Option<BufferSlot>> {
        if self.closed {
            return Err(ConveyorError::Closed.into());
        }

        let handle = self.swap.take().ok_or(ConveyorError::Closed)?;

        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(join_error) => {
                // A fill task that dies takes its batch with it; skip past
                // it rather than stalling the pipeline.
                error!(error = %join_error, "Fill task failed, dropping batch");
                self.stats.record_batch_lost();
                FillOutcome::Filled {
                    slot: BufferSlot::lost_batch(),
                    advance: self.planner.batch_size(),
                }
            }
        };

        match outcome {
            FillOutcome::Exhausted => {
                trace!(cursor = self.cursor, "Iteration exhausted");
                self.trigger_fill()?;
                Ok(None)
            }
            FillOutcome::Filled { slot, advance } => {
                self.cursor += advance;
                self.trigger_fill()?;
                Ok(Some(slot))
            }
        }
    }

    /// Release both buffers and stop prefetching.
    ///
    /// Any in-flight fill is detached (it runs to completion, its result is
    /// discarded). Idempotent; `next_batch` after close returns
    /// [`ConveyorError::Closed`].
    pub fn close(&mut self) {
        self.swap.close();
        self.closed = true;
    }

    /// Plan the batch at the current cursor and spawn its background fill.
    fn trigger_fill(&mut self) -> Result<()> {
        let batch = self.planner.plan(self.cursor, self.cap);
        let batch_size = self.planner.batch_size();
        let dispatcher = BatchDispatcher::new(self.workers);
        let loader = self.loader.clone();
        let stats = Arc::clone(&self.stats);

        let handle = tokio::spawn(fill_batch(batch, batch_size, dispatcher, loader, stats));
        self.swap.begin(handle)?;
        Ok(())
    }
}

impl Drop for ImageConveyor {
    fn drop(&mut self) {
        self.close();
    }
}

/// Resolve one planned batch into a filled slot.
async fn fill_batch(
    batch: Vec<Descriptor>,
    batch_size: usize,
    dispatcher: BatchDispatcher,
    loader: ImageLoader,
    stats: Arc<ConveyorStats>,
) -> FillOutcome {
    if batch.is_empty() {
        return FillOutcome::Exhausted;
    }

    // A lone descriptor skips the dispatch machinery and advances by one.
    if batch.len() == 1 {
        let outcome = loader.load(&batch[0]).await;
        let slot = BufferSlot::filled(vec![outcome]);
        record_slot(&stats, &slot);
        return FillOutcome::Filled { slot, advance: 1 };
    }

    match dispatcher.run(batch, &loader).await {
        Ok(results) => {
            let slot = BufferSlot::filled(results);
            record_slot(&stats, &slot);
            FillOutcome::Filled {
                slot,
                advance: batch_size,
            }
        }
        Err(dispatch_error) => {
            error!(error = %dispatch_error, "Batch dispatch failed, dropping batch");
            stats.record_batch_lost();
            FillOutcome::Filled {
                slot: BufferSlot::lost_batch(),
                advance: batch_size,
            }
        }
    }
}

fn record_slot(stats: &ConveyorStats, slot: &BufferSlot) {
    stats.record_fill(
        slot.loaded_count() as u64,
        slot.failed_count() as u64,
        slot.decoded_bytes() as u64,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ic_error::SourceError;
    use ic_traits::ImageSource;
    use ic_types::DecodedImage;
    use image::DynamicImage;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockSource {
        calls: AtomicUsize,
    }

    impl MockSource {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ImageSource for MockSource {
        async fn decode(
            &self,
            descriptor: &Descriptor,
        ) -> std::result::Result<DecodedImage, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(DecodedImage::new(
                DynamicImage::new_rgb8(1, 1),
                descriptor.uri(),
            ))
        }
    }

    fn descriptors(n: usize) -> Vec<Descriptor> {
        (0..n).map(|i| Descriptor::path(format!("img-{i}.png"))).collect()
    }

    fn loader() -> ImageLoader {
        ImageLoader::new(Arc::new(MockSource::new()))
    }

    #[tokio::test]
    async fn test_rejects_invalid_config() {
        let config = ConveyorConfig::new().with_batch_size(0);
        let result = ImageConveyor::new(loader(), descriptors(3), config);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_batches_in_cursor_order() {
        let config = ConveyorConfig::new().with_batch_size(2);
        let mut conveyor = ImageConveyor::new(loader(), descriptors(6), config).unwrap();

        let mut seen = Vec::new();
        while let Some(slot) = conveyor.next_batch().await.unwrap() {
            seen.extend(slot.iter().map(|r| r.source_uri().to_string()));
        }

        let expected: Vec<String> = (0..6).map(|i| format!("img-{i}.png")).collect();
        assert_eq!(seen, expected);
    }

    #[tokio::test]
    async fn test_exhaustion_is_sticky() {
        let config = ConveyorConfig::new().with_batch_size(4);
        let mut conveyor = ImageConveyor::new(loader(), descriptors(4), config).unwrap();

        assert!(conveyor.next_batch().await.unwrap().is_some());
        assert!(conveyor.next_batch().await.unwrap().is_none());
        assert!(conveyor.next_batch().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cap_zero_is_immediately_exhausted() {
        let config = ConveyorConfig::new().with_batch_size(2).with_iteration_cap(0);
        let mut conveyor = ImageConveyor::new(loader(), descriptors(4), config).unwrap();

        assert!(conveyor.next_batch().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_wraparound_revisits_descriptors() {
        let config = ConveyorConfig::new().with_batch_size(2).with_iteration_cap(5);
        let mut conveyor = ImageConveyor::new(loader(), descriptors(3), config).unwrap();

        let mut seen = Vec::new();
        while let Some(slot) = conveyor.next_batch().await.unwrap() {
            seen.extend(slot.iter().map(|r| r.source_uri().to_string()));
        }

        assert_eq!(
            seen,
            ["img-0.png", "img-1.png", "img-2.png", "img-0.png", "img-1.png"]
        );
    }

    #[tokio::test]
    async fn test_next_after_close_is_an_error() {
        let config = ConveyorConfig::new().with_batch_size(2);
        let mut conveyor = ImageConveyor::new(loader(), descriptors(4), config).unwrap();

        conveyor.close();
        let error = conveyor.next_batch().await.unwrap_err();
        assert!(matches!(
            error,
            IcError::Conveyor(ConveyorError::Closed)
        ));
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let config = ConveyorConfig::new().with_batch_size(2);
        let mut conveyor = ImageConveyor::new(loader(), descriptors(4), config).unwrap();

        conveyor.close();
        conveyor.close();
        assert!(conveyor.is_closed());
    }

    #[tokio::test]
    async fn test_stats_track_fills() {
        let config = ConveyorConfig::new().with_batch_size(2);
        let mut conveyor = ImageConveyor::new(loader(), descriptors(4), config).unwrap();
        let stats = conveyor.stats();

        while conveyor.next_batch().await.unwrap().is_some() {}

        assert_eq!(stats.images_loaded(), 4);
        assert_eq!(stats.images_failed(), 0);
        assert_eq!(stats.batches_filled(), 2);
        assert_eq!(stats.batches_lost(), 0);
    }

    #[tokio::test]
    async fn test_set_iteration_cap_extends_a_pass() {
        let config = ConveyorConfig::new().with_batch_size(2).with_iteration_cap(2);
        let mut conveyor = ImageConveyor::new(loader(), descriptors(4), config).unwrap();

        // Raise the cap before the second fill is planned. The fill already
        // in flight keeps the values it was planned with.
        conveyor.set_iteration_cap(4);

        assert_eq!(conveyor.next_batch().await.unwrap().unwrap().len(), 2);
        assert_eq!(conveyor.next_batch().await.unwrap().unwrap().len(), 2);
        assert!(conveyor.next_batch().await.unwrap().is_none());
    }
}
