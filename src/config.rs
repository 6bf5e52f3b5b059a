//! Process-wide configuration, loaded once at startup.

use std::env;
use std::path::PathBuf;

pub const DEFAULT_RELAY_URL: &str = "http://videocut.dimond.top/overall";
pub const DEFAULT_SEGMENT_SECONDS: f64 = 3.0;

/// Configuration shared (read-only) by every request.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// HTTP server bind address
    pub addr: String,
    /// HTTP server port
    pub port: String,
    /// Root directory for staged uploads and segment files
    pub scratch_dir: PathBuf,
    /// Downstream endpoint receiving every segment
    pub relay_url: String,
    /// Window length in seconds
    pub segment_seconds: f64,
    pub encoder: EncoderSettings,
}

/// Fixed codec pair and speed preset used for every segment.
#[derive(Clone, Debug, PartialEq)]
pub struct EncoderSettings {
    pub ffmpeg_bin: String,
    pub video_codec: String,
    pub audio_codec: String,
    pub preset: String,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            ffmpeg_bin: String::from("ffmpeg"),
            video_codec: String::from("libx264"),
            audio_codec: String::from("aac"),
            preset: String::from("ultrafast"),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let defaults = EncoderSettings::default();

        Self {
            addr: env::var("ADDR").unwrap_or_else(|_| String::from("0.0.0.0")),
            port: env::var("PORT").unwrap_or_else(|_| String::from("5000")),
            scratch_dir: env::var("SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_scratch_dir()),
            relay_url: env::var("RELAY_URL").unwrap_or_else(|_| String::from(DEFAULT_RELAY_URL)),
            segment_seconds: parse_segment_seconds(env::var("SEGMENT_SECONDS").ok().as_deref()),
            encoder: EncoderSettings {
                ffmpeg_bin: env::var("FFMPEG_BIN").unwrap_or(defaults.ffmpeg_bin),
                video_codec: env::var("VIDEO_CODEC").unwrap_or(defaults.video_codec),
                audio_codec: env::var("AUDIO_CODEC").unwrap_or(defaults.audio_codec),
                preset: env::var("ENCODE_PRESET").unwrap_or(defaults.preset),
            },
        }
    }

    /// Configuration rooted at `scratch_dir`, everything else defaulted.
    pub fn with_scratch_dir(scratch_dir: impl Into<PathBuf>, relay_url: impl Into<String>) -> Self {
        Self {
            addr: String::from("127.0.0.1"),
            port: String::from("0"),
            scratch_dir: scratch_dir.into(),
            relay_url: relay_url.into(),
            segment_seconds: DEFAULT_SEGMENT_SECONDS,
            encoder: EncoderSettings::default(),
        }
    }
}

/// `tmp/` next to the installed executable.
fn default_scratch_dir() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("tmp")))
        .unwrap_or_else(|| PathBuf::from("tmp"))
}

fn parse_segment_seconds(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return DEFAULT_SEGMENT_SECONDS;
    };

    match raw.trim().parse::<f64>() {
        Ok(seconds) if seconds.is_finite() && seconds > 0.0 => seconds,
        _ => {
            tracing::warn!(
                value = raw,
                default = DEFAULT_SEGMENT_SECONDS,
                "Ignoring invalid SEGMENT_SECONDS"
            );
            DEFAULT_SEGMENT_SECONDS
        }
    }
}
