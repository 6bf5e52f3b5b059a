use std::path::{Path, PathBuf};

/// Multipart field carrying the video, both inbound and when relaying.
pub const VIDEO_FIELD: &str = "video";
/// Declared type of every relayed segment.
pub const SEGMENT_MIME_TYPE: &str = "video/mp4";

/// The staged input file after probing.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedMedia {
    pub file_name: String,
    pub path: PathBuf,
    /// Total duration in seconds
    pub duration: f64,
}

/// One transient encoded segment, alive only between transcode and relay.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentArtifact {
    /// 0-based, matches emission order
    pub index: usize,
    pub path: PathBuf,
    /// Name the segment is relayed under
    pub file_name: String,
    pub source_file_name: String,
}

impl SegmentArtifact {
    /// Artifact for segment `index` of `media`, placed in `dir`.
    pub fn for_segment(media: &UploadedMedia, index: usize, dir: &Path) -> Self {
        let file_name = format!("segment_{}_{}", index, media.file_name);
        Self {
            index,
            path: dir.join(&file_name),
            file_name,
            source_file_name: media.file_name.clone(),
        }
    }
}
