//! Double-buffer fill state machine.

use crate::slot::BufferSlot;
use ic_error::ConveyorError;
use tokio::task::JoinHandle;
use tracing::trace;

/// What a background fill produced.
#[derive(Debug)]
pub(crate) enum FillOutcome {
    /// The planner had nothing left to schedule; iteration is over.
    Exhausted,

    /// A slot was filled (possibly lost) and the cursor advances by `advance`.
    Filled { slot: BufferSlot, advance: usize },
}

/// Tracks the single outstanding background fill.
///
/// States: `Idle` (no fill pending) and `Filling` (one fill in flight).
/// `begin` refuses a second concurrent fill — the swap protocol always joins
/// the current fill before starting the next, and this keeps that invariant
/// checkable rather than implicit.
#[derive(Debug)]
pub(crate) struct BufferSwap {
    in_flight: Option<JoinHandle<FillOutcome>>,
}

impl BufferSwap {
    /// Create the state machine in `Idle`.
    pub(crate) fn idle() -> Self {
        Self { in_flight: None }
    }

    /// True while a fill is in flight.
    pub(crate) fn is_filling(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Transition `Idle -> Filling` with the given fill task.
    pub(crate) fn begin(&mut self, handle: JoinHandle<FillOutcome>) -> Result<(), ConveyorError> {
        if self.in_flight.is_some() {
            return Err(ConveyorError::FillInFlight);
        }
        self.in_flight = Some(handle);
        trace!("Background fill started");
        Ok(())
    }

    /// Transition `Filling -> Idle`, yielding the fill handle to join.
    pub(crate) fn take(&mut self) -> Option<JoinHandle<FillOutcome>> {
        self.in_flight.take()
    }

    /// Drop any pending fill.
    ///
    /// The fill task is detached, not cancelled: it runs to completion and
    /// its result is discarded. Idempotent.
    pub(crate) fn close(&mut self) {
        if self.in_flight.take().is_some() {
            trace!("Pending fill detached on close");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_handle() -> JoinHandle<FillOutcome> {
        tokio::spawn(async { FillOutcome::Exhausted })
    }

    #[tokio::test]
    async fn test_idle_to_filling_to_idle() {
        let mut swap = BufferSwap::idle();
        assert!(!swap.is_filling());

        swap.begin(fill_handle()).unwrap();
        assert!(swap.is_filling());

        let handle = swap.take().expect("fill pending");
        assert!(!swap.is_filling());
        assert!(matches!(handle.await.unwrap(), FillOutcome::Exhausted));
    }

    #[tokio::test]
    async fn test_second_fill_is_refused() {
        let mut swap = BufferSwap::idle();
        swap.begin(fill_handle()).unwrap();

        let result = swap.begin(fill_handle());
        assert!(matches!(result, Err(ConveyorError::FillInFlight)));

        // The original fill is still the one in flight.
        assert!(swap.is_filling());
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let mut swap = BufferSwap::idle();
        swap.begin(fill_handle()).unwrap();

        swap.close();
        assert!(!swap.is_filling());
        swap.close();
        assert!(!swap.is_filling());
        assert!(swap.take().is_none());
    }
}
