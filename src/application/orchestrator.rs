use crate::adapters::fs::{discard, StagedUpload, Staging};
use crate::config::AppConfig;
use crate::domain::media::{SegmentArtifact, UploadedMedia};
use crate::domain::report::{AggregatedReport, RelayOutcome};
use crate::domain::segments::segment_ranges;
use crate::error::{CutError, Result, NO_SELECTED_FILE};
use crate::ports::{MediaProbe, SegmentRelay, SegmentTranscoder};
use axum::{body::Bytes, BoxError};
use futures::Stream;

/// Drives one upload through stage → probe → cut → relay → clean up.
///
/// Segments are handled strictly one after another; a relay failure is
/// recorded and the loop moves on, any other failure ends the request.
pub struct OrchestratorService<P, T, R> {
    staging: Staging,
    segment_seconds: f64,
    probe: P,
    transcoder: T,
    relay: R,
}

impl<P, T, R> OrchestratorService<P, T, R>
where
    P: MediaProbe,
    T: SegmentTranscoder,
    R: SegmentRelay,
{
    pub fn new(config: &AppConfig, probe: P, transcoder: T, relay: R) -> Self {
        Self {
            staging: Staging::new(&config.scratch_dir),
            segment_seconds: config.segment_seconds,
            probe,
            transcoder,
            relay,
        }
    }

    /// Process the uploaded `body` named `file_name` and report per segment.
    ///
    /// Whatever happens, the staged input and every segment file are removed
    /// before this returns.
    pub async fn handle_upload<S, E>(&self, file_name: &str, body: S) -> Result<AggregatedReport>
    where
        S: Stream<Item = std::result::Result<Bytes, E>> + Send,
        E: Into<BoxError>,
    {
        if file_name.is_empty() {
            return Err(CutError::ClientInput(NO_SELECTED_FILE.to_string()));
        }

        let staged = self.staging.stage(file_name, body).await?;
        let outcome = self.cut_and_relay(&staged).await;
        staged.close().await;

        match &outcome {
            Ok(report) => tracing::info!(
                file_name,
                segments = report.results.len(),
                delivered = report.results.iter().filter(|r| r.is_delivered()).count(),
                "Upload processed"
            ),
            Err(e) => tracing::error!(file_name, error = %e, "Upload aborted"),
        }
        outcome
    }

    async fn cut_and_relay(&self, staged: &StagedUpload) -> Result<AggregatedReport> {
        let media = UploadedMedia {
            file_name: staged.file_name().to_owned(),
            path: staged.path().to_path_buf(),
            duration: self.probe.duration(staged.path()).await?,
        };
        let ranges = segment_ranges(media.duration, self.segment_seconds)?;

        tracing::info!(
            file_name = %media.file_name,
            duration = media.duration,
            segments = ranges.len(),
            "Cutting upload"
        );

        let mut results = Vec::with_capacity(ranges.len());
        for (index, range) in ranges.iter().enumerate() {
            let artifact = SegmentArtifact::for_segment(&media, index, staged.dir());

            self.transcoder
                .transcode(&media.path, range, &artifact.path)
                .await?;

            let outcome = match self.relay.relay(&artifact.path, &artifact.file_name).await {
                Ok(response) => {
                    tracing::debug!(
                        segment = index,
                        status_code = response.status_code,
                        "Segment relayed"
                    );
                    RelayOutcome::delivered(index, response)
                }
                Err(e) => {
                    tracing::warn!(segment = index, error = %e, "Segment relay failed");
                    RelayOutcome::failed(index, e)
                }
            };

            discard(&artifact.path).await;
            results.push(outcome);
        }

        Ok(AggregatedReport::processed(results))
    }
}
