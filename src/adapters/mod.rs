//! Adapters - Concrete implementations of ports.

pub mod ffmpeg;
pub mod fs;
pub mod http;
pub mod relay;
