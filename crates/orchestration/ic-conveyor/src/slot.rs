//! Buffer slots holding one batch's decoded results.

use ic_types::LoadOutcome;

/// The decoded results of one batch, in descriptor order.
///
/// A slot is created by the background fill and handed to the consumer by
/// value at promotion, so a slot the consumer holds can never be written to
/// by a later fill.
///
/// A slot with `is_lost() == true` marks a batch whose dispatch failed as a
/// whole: it carries no results, the cursor has already moved past it, and
/// nothing will be retried.
#[derive(Debug)]
pub struct BufferSlot {
    results: Vec<LoadOutcome>,
    lost: bool,
}

impl BufferSlot {
    /// Create a slot from a batch's results.
    pub(crate) fn filled(results: Vec<LoadOutcome>) -> Self {
        Self {
            results,
            lost: false,
        }
    }

    /// Create the marker for a batch lost to a dispatch failure.
    pub(crate) fn lost_batch() -> Self {
        Self {
            results: Vec::new(),
            lost: true,
        }
    }

    /// True if this batch was dropped by a dispatch failure.
    #[inline]
    pub fn is_lost(&self) -> bool {
        self.lost
    }

    /// Number of results in this slot.
    #[inline]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// True if the slot holds no results.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// The result at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&LoadOutcome> {
        self.results.get(index)
    }

    /// Iterate over the results in descriptor order.
    pub fn iter(&self) -> std::slice::Iter<'_, LoadOutcome> {
        self.results.iter()
    }

    /// Consume the slot, yielding the results.
    pub fn into_results(self) -> Vec<LoadOutcome> {
        self.results
    }

    /// Number of successfully decoded images.
    pub fn loaded_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_loaded()).count()
    }

    /// Number of failure markers.
    pub fn failed_count(&self) -> usize {
        self.results.len() - self.loaded_count()
    }

    /// Total bytes of decoded pixel data in this slot.
    pub fn decoded_bytes(&self) -> usize {
        self.results
            .iter()
            .filter_map(|r| r.image())
            .map(|i| i.size_bytes())
            .sum()
    }
}

impl IntoIterator for BufferSlot {
    type Item = LoadOutcome;
    type IntoIter = std::vec::IntoIter<LoadOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a> IntoIterator for &'a BufferSlot {
    type Item = &'a LoadOutcome;
    type IntoIter = std::slice::Iter<'a, LoadOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
