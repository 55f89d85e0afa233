//! Capability traits for imgconvey.
//!
//! The conveyor is polymorphic over how a descriptor becomes pixels: it only
//! requires an [`ImageSource`]. Path-based and URL-based sources live in
//! their own crates; anything implementing the trait plugs in the same way.

mod source;

pub use source::{AfterLoad, ImageLoader, ImageSource};
