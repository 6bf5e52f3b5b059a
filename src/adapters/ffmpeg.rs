use super::fs::discard;
use crate::config::EncoderSettings;
use crate::domain::segments::SegmentRange;
use crate::error::{CutError, Result};
use crate::ports::{MediaProbe, SegmentTranscoder};
use async_trait::async_trait;
use ffmpeg_next as ffmpeg;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tokio::task;

/// Container durations are expressed in microseconds (`AV_TIME_BASE`).
const AV_TIME_BASE: f64 = 1_000_000.0;

/// Reads durations through the FFmpeg libraries.
#[derive(Clone, Copy, Debug, Default)]
pub struct FfmpegProbe;

impl FfmpegProbe {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MediaProbe for FfmpegProbe {
    async fn duration(&self, path: &Path) -> Result<f64> {
        let path = path.to_path_buf();
        task::spawn_blocking(move || probe_duration(&path))
            .await
            .map_err(|e| CutError::Media(format!("probe task failed: {}", e)))?
    }
}

/// The input context is dropped (and the file closed) before returning.
fn probe_duration(path: &Path) -> Result<f64> {
    ffmpeg::init().map_err(|e| CutError::Media(e.to_string()))?;

    let context = ffmpeg::format::input(path)
        .map_err(|e| CutError::Media(format!("cannot open {}: {}", path.display(), e)))?;

    let container = context.duration();
    if container > 0 {
        return Ok(container as f64 / AV_TIME_BASE);
    }

    context
        .streams()
        .best(ffmpeg::media::Type::Video)
        .and_then(|stream| {
            let time_base = stream.time_base();
            let ticks = stream.duration();
            (ticks > 0 && time_base.denominator() != 0).then(|| {
                ticks as f64 * f64::from(time_base.numerator()) / f64::from(time_base.denominator())
            })
        })
        .ok_or_else(|| CutError::Media(format!("{} has no usable duration", path.display())))
}

/// Cuts segments by running the `ffmpeg` executable.
#[derive(Clone, Debug)]
pub struct FfmpegTranscoder {
    settings: EncoderSettings,
}

impl FfmpegTranscoder {
    pub fn new(settings: EncoderSettings) -> Self {
        Self { settings }
    }

    async fn encode(&self, source: &Path, range: &SegmentRange, output: &Path) -> Result<()> {
        let run = Command::new(&self.settings.ffmpeg_bin)
            .args(encode_args(&self.settings, source, range, output))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                CutError::Media(format!("failed to run {}: {}", self.settings.ffmpeg_bin, e))
            })?;

        if !run.status.success() {
            return Err(CutError::Media(format!(
                "ffmpeg exited with {}: {}",
                run.status,
                stderr_tail(&run.stderr)
            )));
        }
        if !tokio::fs::try_exists(output).await? {
            return Err(CutError::Media(String::from(
                "ffmpeg did not produce an output file",
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl SegmentTranscoder for FfmpegTranscoder {
    async fn transcode(
        &self,
        source: &Path,
        range: &SegmentRange,
        destination: &Path,
    ) -> Result<()> {
        let partial = partial_path(destination);

        let outcome = async {
            self.encode(source, range, &partial).await?;
            tokio::fs::rename(&partial, destination).await?;
            Ok::<_, CutError>(())
        }
        .await;

        // gone already after a successful rename
        discard(&partial).await;

        match &outcome {
            Ok(()) => tracing::debug!(
                start = range.start,
                end = range.end,
                destination = ?destination,
                "Transcoded segment"
            ),
            Err(e) => tracing::error!(
                start = range.start,
                end = range.end,
                error = %e,
                "Transcode failed"
            ),
        }
        outcome
    }
}

fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination.as_os_str().to_owned();
    name.push(".partial");
    PathBuf::from(name)
}

fn encode_args(
    settings: &EncoderSettings,
    source: &Path,
    range: &SegmentRange,
    output: &Path,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-y".into(),
        "-hide_banner".into(),
        "-loglevel".into(),
        "error".into(),
        "-ss".into(),
        format!("{:.6}", range.start).into(),
        "-i".into(),
        source.into(),
        "-t".into(),
        format!("{:.6}", range.duration()).into(),
    ];
    // first video stream, first audio stream if any; never subtitles or data
    args.extend(
        [
            "-map",
            "0:v:0",
            "-map",
            "0:a:0?",
            "-sn",
            "-dn",
            "-c:v",
            settings.video_codec.as_str(),
            "-preset",
            settings.preset.as_str(),
            "-c:a",
            settings.audio_codec.as_str(),
            "-f",
            "mp4",
        ]
        .into_iter()
        .map(OsString::from),
    );
    args.push(output.into());
    args
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(5);
    lines[start..].join("; ")
}
