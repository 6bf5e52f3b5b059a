use crate::domain::segments::SegmentRange;
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaProbe: Send + Sync {
    /// Total duration of the media at `path`, in seconds.
    async fn duration(&self, path: &Path) -> Result<f64>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SegmentTranscoder: Send + Sync {
    /// Encode `range` of `source` as a standalone file at `destination`.
    ///
    /// Must not leave intermediate files behind, whatever the outcome.
    async fn transcode(
        &self,
        source: &Path,
        range: &SegmentRange,
        destination: &Path,
    ) -> Result<()>;
}
