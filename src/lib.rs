//! Videocut - cut uploaded videos into fixed windows and relay each one.
//!
//! Hexagonal Architecture:
//! - domain/: Pure business logic (segment windows, artifacts, reports)
//! - ports/: Trait definitions (media probe, transcoder, relay)
//! - adapters/: Concrete implementations (staging, ffmpeg, HTTP in and out)
//! - application/: The upload orchestrator
//! - config: Environment configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;

// Re-exports for convenience
pub use application::orchestrator::OrchestratorService;
pub use config::AppConfig;
pub use error::{CutError, RelayError};
