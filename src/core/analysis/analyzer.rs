//! 帧分析器 - 逐单元调用视觉模型，结果落盘
//!
//! 单元之间严格串行、按起点升序。单个单元失败只记日志，不重试，
//! 之前已写出的结果保持不动。

use super::chunk::{plan_units, AnalysisUnit, Grouping};
use super::error::AnalysisError;
use crate::core::discovery::{has_extension, list_dir_entries, EntryKind};
use crate::core::model::prompts::{CHUNK_PROMPT, SINGLE_FRAME_PROMPT};
use crate::core::model::{EncodedImage, ModelClient, ModelError};
use log::{error, info, warn};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const FRAME_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// 分析结果写到哪里
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisSink {
    /// 每个单元一个 `<unit_id>.txt`
    PerUnitFiles(PathBuf),
    /// 以 `## Step:` 小节追加到同一个文档
    RunningDocument(PathBuf),
}

#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub grouping: Grouping,
    pub sink: AnalysisSink,
}

impl AnalyzerConfig {
    pub fn single_frame(analysis_dir: impl Into<PathBuf>) -> Self {
        Self {
            grouping: Grouping::SingleFrame,
            sink: AnalysisSink::PerUnitFiles(analysis_dir.into()),
        }
    }

    pub fn sliding_window(analysis_dir: impl Into<PathBuf>) -> Self {
        Self {
            grouping: Grouping::sliding_default(),
            sink: AnalysisSink::PerUnitFiles(analysis_dir.into()),
        }
    }

    pub fn running(journey_path: impl Into<PathBuf>) -> Self {
        Self {
            grouping: Grouping::sliding_default(),
            sink: AnalysisSink::RunningDocument(journey_path.into()),
        }
    }

    pub fn with_grouping(mut self, grouping: Grouping) -> Self {
        self.grouping = grouping;
        self
    }

    fn prompt(&self) -> &'static str {
        match self.grouping {
            Grouping::SingleFrame => SINGLE_FRAME_PROMPT,
            Grouping::SlidingWindow { .. } => CHUNK_PROMPT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisReport {
    pub units: usize,
    pub succeeded: usize,
    pub failed: usize,
}

#[derive(Debug, thiserror::Error)]
enum UnitError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("write to {path} failed: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub struct FrameAnalyzer<'a> {
    model: &'a dyn ModelClient,
    config: AnalyzerConfig,
}

impl<'a> FrameAnalyzer<'a> {
    pub fn new(model: &'a dyn ModelClient, config: AnalyzerConfig) -> Self {
        Self { model, config }
    }

    /// 列出帧文件（jpg/jpeg，按文件名排序）
    pub fn list_frames(frames_dir: &Path) -> Result<Vec<PathBuf>, AnalysisError> {
        if !frames_dir.is_dir() {
            return Err(AnalysisError::FramesDirMissing(frames_dir.to_path_buf()));
        }
        let mut frames: Vec<PathBuf> = list_dir_entries(frames_dir, EntryKind::Files)
            .map_err(|source| AnalysisError::Io {
                path: frames_dir.to_path_buf(),
                source,
            })?
            .into_iter()
            .filter(|p| has_extension(p, FRAME_EXTENSIONS))
            .collect();
        frames.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(frames)
    }

    pub fn analyze_dir(&self, frames_dir: &Path) -> Result<AnalysisReport, AnalysisError> {
        info!("🔍 Starting analysis for directory: {:?}", frames_dir);
        let frames = Self::list_frames(frames_dir)?;
        self.analyze_frames(&frames)
    }

    pub fn analyze_frames(&self, frames: &[PathBuf]) -> Result<AnalysisReport, AnalysisError> {
        let units = plan_units(frames, self.config.grouping)?;
        let mut report = AnalysisReport {
            units: units.len(),
            ..Default::default()
        };

        if frames.is_empty() {
            warn!("⚠️ No JPG frames found to analyze");
            return Ok(report);
        }
        if units.is_empty() {
            warn!(
                "⚠️ {} frames is fewer than one window ({:?}), nothing to analyze",
                frames.len(),
                self.config.grouping
            );
            return Ok(report);
        }

        if let AnalysisSink::PerUnitFiles(dir) = &self.config.sink {
            fs::create_dir_all(dir).map_err(|source| AnalysisError::Io {
                path: dir.clone(),
                source,
            })?;
        }

        for unit in &units {
            let id = unit.id();
            info!("🧩 Analyzing unit: {}", id);
            match self.analyze_unit(unit, &id) {
                Ok(path) => {
                    info!("✅ Saved analysis for {} to {:?}", id, path);
                    report.succeeded += 1;
                }
                Err(e) => {
                    error!("❌ Analysis failed for {}: {}", id, e);
                    report.failed += 1;
                }
            }
        }

        info!(
            "🏁 Analysis complete: {} units, {} succeeded, {} failed",
            report.units, report.succeeded, report.failed
        );
        Ok(report)
    }

    fn analyze_unit(&self, unit: &AnalysisUnit, id: &str) -> Result<PathBuf, UnitError> {
        let images = unit
            .frames
            .iter()
            .map(|p| EncodedImage::from_jpeg_file(p))
            .collect::<Result<Vec<_>, _>>()?;

        let description = self.model.describe_images(self.config.prompt(), &images)?;
        self.write_result(id, &description)
    }

    fn write_result(&self, id: &str, description: &str) -> Result<PathBuf, UnitError> {
        match &self.config.sink {
            AnalysisSink::PerUnitFiles(dir) => {
                let path = dir.join(format!("{id}.txt"));
                fs::write(&path, description).map_err(|source| UnitError::Write {
                    path: path.clone(),
                    source,
                })?;
                Ok(path)
            }
            AnalysisSink::RunningDocument(path) => {
                append_section(path, id, description).map_err(|source| UnitError::Write {
                    path: path.clone(),
                    source,
                })?;
                Ok(path.clone())
            }
        }
    }
}

fn append_section(path: &Path, id: &str, description: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    write!(file, "## Step: {id}\n\n{description}\n\n---\n\n")
}

/// 初始化追加模式的旅程文档（覆盖已有内容）
pub fn init_journey_document(path: &Path, video_name: &str) -> Result<(), AnalysisError> {
    info!("📄 Initializing journey file: {:?}", path);
    let io_err = |source| AnalysisError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, journey_title(video_name)).map_err(io_err)
}

pub fn journey_title(video_name: &str) -> String {
    format!("# User Journey: {video_name}\n\n")
}
