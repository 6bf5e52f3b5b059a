//! Shared test harness for the HTTP integration tests.
//!
//! Serves the real router on a random port with fake media adapters, and a
//! throwaway downstream endpoint that records every relayed part.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};
use serde_json::json;
use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use videocut::adapters::http::router;
use videocut::adapters::relay::HttpRelay;
use videocut::domain::report::RelayResponse;
use videocut::domain::segments::SegmentRange;
use videocut::ports::{MediaProbe, SegmentRelay, SegmentTranscoder};
use videocut::{AppConfig, CutError, OrchestratorService, RelayError};

/// Reports a fixed duration for any file.
pub struct FakeProbe(pub f64);

#[async_trait]
impl MediaProbe for FakeProbe {
    async fn duration(&self, _path: &Path) -> Result<f64, CutError> {
        Ok(self.0)
    }
}

/// Writes `"<start>-<end>"` as the segment content. Fails for every range
/// starting at or after `fail_from`.
pub struct FakeTranscoder {
    pub fail_from: Option<f64>,
}

#[async_trait]
impl SegmentTranscoder for FakeTranscoder {
    async fn transcode(
        &self,
        _source: &Path,
        range: &SegmentRange,
        destination: &Path,
    ) -> Result<(), CutError> {
        if self.fail_from.is_some_and(|from| range.start >= from) {
            return Err(CutError::Media("Invalid data found when processing input".into()));
        }
        tokio::fs::write(destination, format!("{}-{}", range.start, range.end)).await?;
        Ok(())
    }
}

/// Relays through HTTP, except for one segment whose connection "drops".
pub struct FlakyRelay {
    pub inner: HttpRelay,
    pub failing_segment: usize,
}

#[async_trait]
impl SegmentRelay for FlakyRelay {
    async fn relay(&self, path: &Path, file_name: &str) -> Result<RelayResponse, RelayError> {
        if file_name.starts_with(&format!("segment_{}_", self.failing_segment)) {
            return Err(RelayError::Io(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            )));
        }
        self.inner.relay(path, file_name).await
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Received {
    pub field: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: String,
}

/// Downstream endpoint answering `{"message": "success"}` to every segment.
pub struct Downstream {
    pub url: String,
    pub inbox: Arc<Mutex<Vec<Received>>>,
}

impl Downstream {
    pub async fn start() -> Self {
        let inbox: Arc<Mutex<Vec<Received>>> = Arc::default();
        let app = Router::new()
            .route("/overall", post(receive))
            .with_state(inbox.clone());

        let addr = spawn(app).await;
        Self {
            url: format!("http://{addr}/overall"),
            inbox,
        }
    }

    pub fn received(&self) -> Vec<Received> {
        self.inbox.lock().unwrap().clone()
    }
}

async fn receive(
    State(inbox): State<Arc<Mutex<Vec<Received>>>>,
    mut multipart: Multipart,
) -> Json<serde_json::Value> {
    while let Some(field) = multipart.next_field().await.unwrap() {
        let received = Received {
            field: field.name().unwrap_or_default().to_owned(),
            file_name: field.file_name().map(str::to_owned),
            content_type: field.content_type().map(str::to_owned),
            data: field.text().await.unwrap(),
        };
        inbox.lock().unwrap().push(received);
    }
    Json(json!({"message": "success"}))
}

async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind random port");
    let addr = listener.local_addr().expect("failed to get local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    addr
}

/// The upload service under test, with its scratch directory.
pub struct TestServer {
    pub base_url: String,
    pub scratch: TempDir,
}

impl TestServer {
    pub async fn start<P, T, R>(probe: P, transcoder: T, relay: R) -> Self
    where
        P: MediaProbe + 'static,
        T: SegmentTranscoder + 'static,
        R: SegmentRelay + 'static,
    {
        let scratch = tempfile::tempdir().expect("failed to create scratch dir");
        let config = AppConfig::with_scratch_dir(scratch.path(), "unused");
        let service = Arc::new(OrchestratorService::new(&config, probe, transcoder, relay));

        let addr = spawn(router(service)).await;
        Self {
            base_url: format!("http://{addr}"),
            scratch,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Entries left in the scratch directory.
    pub fn leftovers(&self) -> usize {
        std::fs::read_dir(self.scratch.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

/// Multipart form carrying `content` as the `video` file field.
pub fn video_form(file_name: &str, content: &'static [u8]) -> reqwest::multipart::Form {
    let part = reqwest::multipart::Part::bytes(content)
        .file_name(file_name.to_owned())
        .mime_str("video/mp4")
        .expect("valid mime");
    reqwest::multipart::Form::new().part("video", part)
}
