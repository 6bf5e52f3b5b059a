//! Error taxonomy for the upload pipeline.

use thiserror::Error;

pub const NO_VIDEO_FILE: &str = "No video file provided";
pub const NO_SELECTED_FILE: &str = "No selected file";
pub const INVALID_FILENAME: &str = "Invalid filename";

/// Fatal errors for one upload request.
///
/// Per-segment relay failures never show up here; they are recorded in the
/// report instead (see [`crate::domain::report::RelayOutcome`]).
#[derive(Error, Debug)]
pub enum CutError {
    /// Missing or unusable upload field. Nothing was processed.
    #[error("{0}")]
    ClientInput(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Media could not be opened, probed or encoded.
    #[error("Media processing error: {0}")]
    Media(String),

    #[error("Staging error: {0}")]
    Staging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CutError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, CutError::ClientInput(_))
    }
}

pub type Result<T> = std::result::Result<T, CutError>;

/// Failure of a single relay exchange. Recorded per segment, never fatal.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed response body: {0}")]
    MalformedBody(#[from] serde_json::Error),
}
