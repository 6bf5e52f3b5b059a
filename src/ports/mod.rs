//! Ports - Trait definitions for the external collaborators.

pub mod media;
pub mod relay;

pub use media::{MediaProbe, SegmentTranscoder};
pub use relay::SegmentRelay;
