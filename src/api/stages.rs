//! 流水线各阶段入口
//!
//! 每个阶段独立运行，只通过工作区里的文件衔接：
//! extract → analyze → synthesize → summarize。
//! 返回 `Err` 的都是致命前置条件失败，调用方应以非零状态退出。

use crate::core::analysis::{
    init_journey_document, AnalysisError, AnalysisReport, AnalyzerConfig, FrameAnalyzer, Grouping,
};
use crate::core::discovery::{
    file_stem, list_dir_entries, select_frames_dir, select_video, EntryKind, VIDEO_EXTENSIONS,
};
use crate::core::journey::{JourneyError, JourneySynthesizer, SummaryGenerator};
use crate::core::layout::{LayoutError, WorkspaceLayout};
use crate::core::model::ModelClient;
use crate::core::video::{
    open_video, ExtractionConfig, ExtractionStats, FrameExtractor, FrameSource, VideoError,
};
use log::info;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StageError {
    #[error("no video files ({exts}) found in {dir}")]
    NoVideo { dir: PathBuf, exts: String },
    #[error("no frame directories found in {0}")]
    NoFramesDir(PathBuf),
    #[error("cannot list {path}: {source}")]
    List {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Video(#[from] VideoError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error(transparent)]
    Journey(#[from] JourneyError),
}

/// 分析模式：三种并存的变体
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnalyzeMode {
    /// 每帧一个文件
    #[default]
    Single,
    /// 重叠窗口，每窗口一个文件
    Window { window_size: usize, stride: usize },
    /// 窗口结果追加进旅程文档
    Running { window_size: usize, stride: usize },
}

fn list_or_fail(dir: PathBuf, kind: EntryKind) -> Result<Vec<PathBuf>, StageError> {
    list_dir_entries(&dir, kind).map_err(|source| StageError::List { path: dir, source })
}

/// 阶段一：抽帧，并记录视频名
pub fn extract_frames(
    layout: &WorkspaceLayout,
    config: ExtractionConfig,
) -> Result<ExtractionStats, StageError> {
    extract_frames_with(layout, config, open_video)
}

/// 同 [`extract_frames`]，视频如何解码由 `open` 决定（返回帧来源和帧率）
pub fn extract_frames_with<S, F>(
    layout: &WorkspaceLayout,
    config: ExtractionConfig,
    open: F,
) -> Result<ExtractionStats, StageError>
where
    S: FrameSource,
    F: FnOnce(&Path) -> Result<(S, f64), VideoError>,
{
    let videos_dir = layout.videos_dir();
    let candidates = list_or_fail(videos_dir.clone(), EntryKind::Files)?;
    let video = select_video(&candidates).ok_or_else(|| StageError::NoVideo {
        dir: videos_dir,
        exts: VIDEO_EXTENSIONS.join(", "),
    })?;

    let video_name = file_stem(video);
    let out_dir = layout.frames_dir_for(&video_name);
    let (source, fps) = open(video)?;
    let stats = FrameExtractor::with_config(config).extract(source, fps, &out_dir)?;

    layout.write_video_name(&video_name)?;
    Ok(stats)
}

/// 阶段二：分析帧
pub fn analyze_frames(
    layout: &WorkspaceLayout,
    model: &dyn ModelClient,
    mode: AnalyzeMode,
) -> Result<AnalysisReport, StageError> {
    let video_name = layout.read_video_name()?;

    let base = layout.frames_base_dir();
    let candidates = list_or_fail(base.clone(), EntryKind::Dirs)?;
    let frames_dir = select_frames_dir(&candidates, &video_name)
        .ok_or(StageError::NoFramesDir(base))?
        .clone();

    let config = match mode {
        AnalyzeMode::Single => AnalyzerConfig::single_frame(layout.analysis_dir()),
        AnalyzeMode::Window { window_size, stride } => {
            AnalyzerConfig::sliding_window(layout.analysis_dir())
                .with_grouping(Grouping::SlidingWindow { window_size, stride })
        }
        AnalyzeMode::Running { window_size, stride } => {
            AnalyzerConfig::running(layout.journey_path(&video_name))
                .with_grouping(Grouping::SlidingWindow { window_size, stride })
        }
    };
    config.grouping.validate()?;

    Ok(FrameAnalyzer::new(model, config).analyze_dir(&frames_dir)?)
}

/// 追加模式之前写入旅程标题
pub fn init_journey(layout: &WorkspaceLayout) -> Result<PathBuf, StageError> {
    let video_name = layout.read_video_name()?;
    let path = layout.journey_path(&video_name);
    init_journey_document(&path, &video_name)?;
    Ok(path)
}

/// 阶段三：合成旅程
pub fn synthesize_journey(
    layout: &WorkspaceLayout,
    model: &dyn ModelClient,
    with_title: bool,
) -> Result<Option<PathBuf>, StageError> {
    let video_name = layout.read_video_name()?;
    let mut synthesizer = JourneySynthesizer::new(model);
    if with_title {
        synthesizer = synthesizer.with_title(video_name.clone());
    }
    Ok(synthesizer.synthesize(&layout.analysis_dir(), &layout.journey_path(&video_name))?)
}

/// 阶段四：生成摘要
pub fn generate_summary(
    layout: &WorkspaceLayout,
    model: &dyn ModelClient,
) -> Result<Option<PathBuf>, StageError> {
    let video_name = layout.read_video_name()?;
    Ok(SummaryGenerator::new(model).summarize(
        &layout.journey_path(&video_name),
        &layout.summary_path(&video_name),
    )?)
}

/// 依次跑完四个阶段（单帧分析模式），遇到致命错误即停
pub fn run_pipeline(
    layout: &WorkspaceLayout,
    model: &dyn ModelClient,
    extraction: ExtractionConfig,
) -> Result<Option<PathBuf>, StageError> {
    let stats = extract_frames(layout, extraction)?;
    info!("🚚 Extract stage done: {} frames", stats.extracted_frames);

    let report = analyze_frames(layout, model, AnalyzeMode::Single)?;
    info!(
        "🚚 Analyze stage done: {}/{} units",
        report.succeeded, report.units
    );

    if synthesize_journey(layout, model, true)?.is_none() {
        return Ok(None);
    }
    generate_summary(layout, model)
}
