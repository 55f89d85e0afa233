//! Batch planning over the circular descriptor sequence.

use ic_types::Descriptor;
use std::sync::Arc;

/// Plans which descriptors belong to the next batch.
///
/// Planning is a pure function of the cursor and the iteration cap: no side
/// effects, so a plan can be computed at fill-spawn time and shipped into the
/// background task. Selection wraps circularly through the descriptor list,
/// so a cap larger than the list length revisits earlier descriptors.
#[derive(Debug, Clone)]
pub struct BatchPlanner {
    descriptors: Arc<[Descriptor]>,
    batch_size: usize,
}

impl BatchPlanner {
    /// Create a planner over the given descriptor list.
    pub fn new(descriptors: Vec<Descriptor>, batch_size: usize) -> Self {
        Self {
            descriptors: descriptors.into(),
            batch_size,
        }
    }

    /// The configured batch size.
    #[inline]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of distinct descriptors.
    #[inline]
    pub fn descriptor_count(&self) -> usize {
        self.descriptors.len()
    }

    /// Compute the batch starting at `cursor`, bounded by `cap`.
    ///
    /// Returns an empty batch when iteration is exhausted (`cursor >= cap`),
    /// otherwise `min(batch_size, cap - cursor)` descriptors selected at
    /// indices `(cursor + k) % len`.
    pub fn plan(&self, cursor: usize, cap: usize) -> Vec<Descriptor> {
        if self.descriptors.is_empty() || cursor >= cap {
            return Vec::new();
        }

        let remaining = cap - cursor;
        let count = remaining.min(self.batch_size);

        (0..count)
            .map(|k| self.descriptors[(cursor + k) % self.descriptors.len()].clone())
            .collect()
    }
}
