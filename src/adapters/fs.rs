//! Scratch-directory staging for uploads and their segment files.

use crate::error::{CutError, Result, INVALID_FILENAME};
use axum::{body::Bytes, BoxError};
use futures::{Stream, TryStreamExt};
use regex::Regex;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tempfile::TempDir;
use tokio::{fs::File, io::BufWriter, task};
use tokio_util::io::StreamReader;

/// Stages uploads under `root`, one private subdirectory per upload.
#[derive(Clone, Debug)]
pub struct Staging {
    root: PathBuf,
}

impl Staging {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Stream `body` to `<root>/upload-XXXXXX/<file_name>`.
    ///
    /// The root is created on first use. On failure nothing is left behind.
    pub async fn stage<S, E>(&self, file_name: &str, body: S) -> Result<StagedUpload>
    where
        S: Stream<Item = std::result::Result<Bytes, E>>,
        E: Into<BoxError>,
    {
        let file_name = sanitize_file_name(file_name)?;

        tokio::fs::create_dir_all(&self.root).await?;
        let root = self.root.clone();
        let dir = task::spawn_blocking(move || {
            tempfile::Builder::new().prefix("upload-").tempdir_in(root)
        })
        .await
        .map_err(|e| CutError::Staging(format!("staging task failed: {}", e)))??;

        let path = dir.path().join(&file_name);
        tracing::debug!(path = ?path, "Staging upload");
        stream_to_file(&path, body).await?;

        Ok(StagedUpload {
            dir,
            path,
            file_name,
        })
    }
}

/// A staged upload. Owns its subdirectory, which is removed on
/// [`StagedUpload::close`] or drop.
#[derive(Debug)]
pub struct StagedUpload {
    dir: TempDir,
    path: PathBuf,
    file_name: String,
}

impl StagedUpload {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Sanitized name, as written on disk.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Remove the staged input and anything else left in its directory.
    ///
    /// The removal runs on the blocking pool. If the caller is cancelled
    /// first, the `TempDir` is still dropped (and removed) by that task.
    pub async fn close(self) {
        let StagedUpload { dir, .. } = self;
        let path = dir.path().to_path_buf();
        match task::spawn_blocking(move || dir.close()).await {
            Ok(Ok(())) => tracing::debug!(dir = ?path, "Removed staging directory"),
            Ok(Err(e)) => {
                tracing::warn!(dir = ?path, error = %e, "Failed to remove staging directory")
            }
            Err(e) => tracing::warn!(dir = ?path, error = %e, "Staging cleanup task failed"),
        }
    }
}

/// Delete `path`, logging (not returning) any failure. A missing file is fine.
pub async fn discard(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = ?path, error = %e, "Failed to remove file"),
    }
}

/// Reject names that could escape the staging directory, then replace every
/// character outside `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_file_name(raw: &str) -> Result<String> {
    let escapes = raw.contains(['/', '\\', '\0']) || raw == "." || raw == "..";
    if raw.is_empty() || escapes {
        tracing::warn!(file_name = raw, "Rejecting upload filename");
        return Err(CutError::ClientInput(INVALID_FILENAME.to_string()));
    }

    static DISALLOWED: OnceLock<Regex> = OnceLock::new();
    let disallowed = DISALLOWED.get_or_init(|| {
        Regex::new(r"[^A-Za-z0-9._-]").expect("character class is valid")
    });

    Ok(disallowed.replace_all(raw, "_").into_owned())
}

// Save a `Stream` to a file
async fn stream_to_file<S, E>(path: &Path, stream: S) -> Result<()>
where
    S: Stream<Item = std::result::Result<Bytes, E>>,
    E: Into<BoxError>,
{
    async {
        let body_with_io_error = stream.map_err(|err| io::Error::new(io::ErrorKind::Other, err));
        let body_reader = StreamReader::new(body_with_io_error);
        futures::pin_mut!(body_reader);

        let mut file = BufWriter::new(File::create(path).await?);
        tokio::io::copy(&mut body_reader, &mut file).await?;
        tokio::io::AsyncWriteExt::flush(&mut file).await?;

        Ok::<_, io::Error>(())
    }
    .await
    .map_err(|err| CutError::Staging(err.to_string()))
}
