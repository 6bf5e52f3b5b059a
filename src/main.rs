//! Videocut server binary.
//!
//! Wires the FFmpeg adapters and the HTTP relay into the orchestrator and
//! serves the upload endpoint.

use std::sync::Arc;
use videocut::adapters::ffmpeg::{FfmpegProbe, FfmpegTranscoder};
use videocut::adapters::http;
use videocut::adapters::relay::HttpRelay;
use videocut::{AppConfig, OrchestratorService};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env();

    let service = Arc::new(OrchestratorService::new(
        &config,
        FfmpegProbe::new(),
        FfmpegTranscoder::new(config.encoder.clone()),
        HttpRelay::new(&config.relay_url),
    ));

    tracing::info!(
        scratch_dir = ?config.scratch_dir,
        relay_url = %config.relay_url,
        segment_seconds = config.segment_seconds,
        "Configuration loaded"
    );

    let app = http::router(service);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", config.addr, config.port))
        .await
        .expect("Failed to bind TCP listener");
    tracing::info!("Listening at {}:{}", config.addr, config.port);
    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}
