//! Batch dispatch across a per-batch worker pool.

use ic_error::ConveyorError;
use ic_traits::ImageLoader;
use ic_types::{Descriptor, LoadOutcome};
use std::sync::Arc;
use tracing::{debug, trace};

/// Executes one batch of loads, sequentially or fanned out over workers.
///
/// The worker pool is created fresh for each batch and torn down after its
/// results are collected; no pool state survives between batches. Results
/// always come back in the batch's original descriptor order, however the
/// workers interleave.
#[derive(Debug, Clone, Copy)]
pub struct BatchDispatcher {
    workers: usize,
}

impl BatchDispatcher {
    /// Create a dispatcher with the given worker count (1 = sequential).
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// The configured worker count.
    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Load every descriptor in the batch, preserving order.
    ///
    /// A single failing descriptor is not an error here: it becomes a marker
    /// in its slot of the result sequence. An `Err` means the fan-out itself
    /// collapsed (a worker panicked); no results are recovered and the whole
    /// batch is lost.
    pub async fn run(
        &self,
        batch: Vec<Descriptor>,
        loader: &ImageLoader,
    ) -> Result<Vec<LoadOutcome>, ConveyorError> {
        if self.workers <= 1 || batch.len() <= 1 {
            let mut results = Vec::with_capacity(batch.len());
            for descriptor in &batch {
                results.push(loader.load(descriptor).await);
            }
            return Ok(results);
        }

        let total = batch.len();
        let workers = self.workers.min(total);
        let shared: Arc<[Descriptor]> = batch.into();

        trace!(workers, total, "Fanning batch out to workers");

        let mut handles = Vec::with_capacity(workers);
        for worker in 0..workers {
            let shared = Arc::clone(&shared);
            let loader = loader.clone();
            handles.push(tokio::spawn(async move {
                // Strided assignment: worker w takes indices w, w+n, w+2n, ...
                let mut part = Vec::new();
                let mut index = worker;
                while index < shared.len() {
                    part.push((index, loader.load(&shared[index]).await));
                    index += workers;
                }
                part
            }));
        }

        let mut indexed = Vec::with_capacity(total);
        for result in futures::future::join_all(handles).await {
            match result {
                Ok(part) => indexed.extend(part),
                Err(error) => {
                    return Err(ConveyorError::DispatchFailed(error.to_string()));
                }
            }
        }

        indexed.sort_by_key(|(index, _)| *index);
        debug!(total, workers, "Batch collected from worker pool");

        Ok(indexed.into_iter().map(|(_, outcome)| outcome).collect())
    }
}
