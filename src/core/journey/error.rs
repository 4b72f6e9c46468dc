use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JourneyError {
    #[error("analysis directory not found at {0}")]
    AnalysisDirMissing(PathBuf),
    #[error("journey file not found at {0}, run the synthesize stage first")]
    JourneyMissing(PathBuf),
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl JourneyError {
    pub(crate) fn io(path: &std::path::Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| JourneyError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
