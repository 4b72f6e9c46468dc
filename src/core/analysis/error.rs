use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("frames directory not found at {0}")]
    FramesDirMissing(PathBuf),
    #[error("invalid window: size {window_size}, stride {stride} (both must be at least 1)")]
    InvalidWindow { window_size: usize, stride: usize },
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
