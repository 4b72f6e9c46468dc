use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VideoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to launch {tool}: {source}")]
    ToolUnavailable {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot open video {path}: {reason}")]
    OpenFailed { path: PathBuf, reason: String },
    #[error("ffprobe output parse error: {0}")]
    Probe(#[from] serde_json::Error),
    #[error("JPEG encode error: {0}")]
    Encode(#[from] image::ImageError),
    #[error("frame buffer does not match {width}x{height} RGB")]
    InvalidFrame { width: u32, height: u32 },
    #[error("frame interval must be at least 1 second")]
    InvalidInterval,
    #[error("ffmpeg exited with {0}")]
    Decoder(String),
}
