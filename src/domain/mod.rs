//! Domain layer - Pure business logic.

pub mod media;
pub mod report;
pub mod segments;
