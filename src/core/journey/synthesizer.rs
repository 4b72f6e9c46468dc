//! 旅程合成 - 把所有分析文本按文件名顺序拼接，交给文本模型生成叙述

use super::error::JourneyError;
use super::write_output;
use crate::core::analysis::journey_title;
use crate::core::discovery::{has_extension, list_dir_entries, EntryKind};
use crate::core::model::prompts::SYNTHESIS_PROMPT;
use crate::core::model::ModelClient;
use log::{error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

pub struct JourneySynthesizer<'a> {
    model: &'a dyn ModelClient,
    /// 设置后在文档开头加 `# User Journey: <title>`
    title: Option<String>,
}

impl<'a> JourneySynthesizer<'a> {
    pub fn new(model: &'a dyn ModelClient) -> Self {
        Self { model, title: None }
    }

    pub fn with_title(mut self, video_name: impl Into<String>) -> Self {
        self.title = Some(video_name.into());
        self
    }

    /// 分析目录下直接包含的 .txt 文件，按文件名排序（不进入 metadata/）
    pub fn list_analysis_files(analysis_dir: &Path) -> Result<Vec<PathBuf>, JourneyError> {
        if !analysis_dir.is_dir() {
            return Err(JourneyError::AnalysisDirMissing(analysis_dir.to_path_buf()));
        }
        let mut files: Vec<PathBuf> = list_dir_entries(analysis_dir, EntryKind::Files)
            .map_err(JourneyError::io(analysis_dir))?
            .into_iter()
            .filter(|p| has_extension(p, &["txt"]))
            .collect();
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    /// 每个文件一个 `## Frame: <name>` 小节
    pub fn concatenate(files: &[PathBuf]) -> Result<String, JourneyError> {
        let mut full_text = String::new();
        for file in files {
            let content = fs::read_to_string(file).map_err(JourneyError::io(file))?;
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            full_text.push_str(&format!("## Frame: {name}\n{content}\n\n"));
        }
        Ok(full_text)
    }

    /// 返回写出的路径；没有输入或模型失败时返回 None，且不碰已有输出
    pub fn synthesize(&self, analysis_dir: &Path, output: &Path) -> Result<Option<PathBuf>, JourneyError> {
        info!("🧵 Creating journey from analyses in {:?}", analysis_dir);

        let files = Self::list_analysis_files(analysis_dir)?;
        if files.is_empty() {
            warn!("⚠️ No analysis files found to process");
            return Ok(None);
        }

        let full_text = Self::concatenate(&files)?;
        info!("📚 Synthesizing {} analysis files ({} chars)", files.len(), full_text.len());

        let journey = match self.model.synthesize_text(SYNTHESIS_PROMPT, &full_text) {
            Ok(text) => text,
            Err(e) => {
                error!("❌ Journey synthesis failed: {}", e);
                return Ok(None);
            }
        };

        let document = match &self.title {
            Some(name) => format!("{}{}", journey_title(name), journey),
            None => journey,
        };
        write_output(output, &document)?;

        info!("✅ Journey saved to {:?}", output);
        Ok(Some(output.to_path_buf()))
    }
}
