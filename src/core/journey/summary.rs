//! 摘要生成 - 把详细旅程压缩成带编号的关键步骤列表

use super::error::JourneyError;
use super::write_output;
use crate::core::model::prompts::SUMMARY_PROMPT;
use crate::core::model::ModelClient;
use log::{error, info};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub struct SummaryGenerator<'a> {
    model: &'a dyn ModelClient,
}

impl<'a> SummaryGenerator<'a> {
    pub fn new(model: &'a dyn ModelClient) -> Self {
        Self { model }
    }

    pub fn summarize(&self, journey: &Path, output: &Path) -> Result<Option<PathBuf>, JourneyError> {
        info!("📝 Creating summary from {:?}", journey);

        let detailed = match fs::read_to_string(journey) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(JourneyError::JourneyMissing(journey.to_path_buf()));
            }
            Err(e) => return Err(JourneyError::io(journey)(e)),
        };

        let summary = match self.model.synthesize_text(SUMMARY_PROMPT, &detailed) {
            Ok(text) => text,
            Err(e) => {
                error!("❌ Summary synthesis failed: {}", e);
                return Ok(None);
            }
        };

        write_output(output, &summary)?;
        info!("✅ Summary saved to {:?}", output);
        Ok(Some(output.to_path_buf()))
    }
}
