use crate::domain::report::RelayResponse;
use crate::error::RelayError;
use async_trait::async_trait;
use std::path::Path;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SegmentRelay: Send + Sync {
    /// Send the segment file at `path` downstream under `file_name`.
    async fn relay(&self, path: &Path, file_name: &str) -> Result<RelayResponse, RelayError>;
}
