//! ic-conveyor - Double-buffered image-batch prefetcher for imgconvey.
//!
//! The conveyor loads images in fixed-size batches, overlapping the load and
//! decode of the next batch with consumption of the current one:
//!
//! - [`BatchPlanner`] computes which descriptors the next batch holds,
//!   wrapping circularly through the descriptor list up to an iteration cap
//! - [`BatchDispatcher`] resolves a batch sequentially or across a per-batch
//!   worker pool, preserving descriptor order
//! - [`ImageConveyor`] runs the double-buffer swap protocol: exactly one
//!   background fill in flight, joined before its slot is promoted to the
//!   consumer
//! - [`BufferSlot`] is what the consumer receives: one batch's results, each
//!   a decoded image or an explicit failure marker
//!
//! Decode itself is pluggable via `ic_traits::ImageSource`; this crate never
//! touches the filesystem or the network.

mod conveyor;
mod dispatch;
mod planner;
mod slot;
mod stats;
mod swap;

pub use conveyor::ImageConveyor;
pub use dispatch::BatchDispatcher;
pub use planner::BatchPlanner;
pub use slot::BufferSlot;
pub use stats::{ConveyorStats, StatsSnapshot};
