pub mod error;
pub mod summary;
pub mod synthesizer;

pub use error::JourneyError;
pub use summary::SummaryGenerator;
pub use synthesizer::JourneySynthesizer;

use std::fs;
use std::path::Path;

/// 写 markdown 输出，必要时创建父目录
pub(crate) fn write_output(path: &Path, content: &str) -> Result<(), JourneyError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(JourneyError::io(parent))?;
    }
    fs::write(path, content).map_err(JourneyError::io(path))
}
