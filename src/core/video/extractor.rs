//! 帧提取器 - 定间隔采样 + JPEG 落盘

use super::error::VideoError;
use super::frame::frame_file_name;
use super::probe::probe_video;
use super::sampler::FrameSampler;
use super::source::{FfmpegFrameSource, FrameSource};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// 采样间隔（秒）
    pub interval_secs: u32,
    pub jpeg_quality: u8,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            interval_secs: 2,
            jpeg_quality: 90,
        }
    }
}

/// 提取统计
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionStats {
    pub processed_frames: u64,
    pub extracted_frames: u64,
    pub output_dir: PathBuf,
}

pub struct FrameExtractor {
    config: ExtractionConfig,
}

/// 探测视频并启动 ffmpeg 解码，返回帧来源和实际使用的帧率
pub fn open_video(video: &Path) -> Result<(FfmpegFrameSource, f64), VideoError> {
    if !video.is_file() {
        return Err(VideoError::OpenFailed {
            path: video.to_path_buf(),
            reason: "file not found".to_string(),
        });
    }

    let info = probe_video(video)?;
    let fps = info.effective_fps();
    info!(
        "🎬 Decoding {:?} ({}x{} @ {:.2} fps)",
        video.file_name().unwrap_or_default(),
        info.width,
        info.height,
        fps
    );

    let source = FfmpegFrameSource::spawn(video, &info)?;
    Ok((source, fps))
}

impl FrameExtractor {
    pub fn new() -> Self {
        Self::with_config(ExtractionConfig::default())
    }

    pub fn with_config(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// 从任意帧来源采样。同名文件直接覆盖
    pub fn extract<S: FrameSource>(
        &self,
        source: S,
        fps: f64,
        out_dir: &Path,
    ) -> Result<ExtractionStats, VideoError> {
        let mut sampler = FrameSampler::for_rate(fps, self.config.interval_secs)?;
        fs::create_dir_all(out_dir)?;
        debug!("Sampling one frame every {} decoded frames", sampler.step());

        let mut stats = ExtractionStats {
            output_dir: out_dir.to_path_buf(),
            ..Default::default()
        };

        for frame in source {
            let frame = frame?;
            stats.processed_frames += 1;

            if let Some(kept) = sampler.push(frame) {
                let path = out_dir.join(frame_file_name(stats.extracted_frames));
                let jpeg = kept.to_jpeg(self.config.jpeg_quality)?;
                fs::write(&path, jpeg)?;
                debug!("Saved frame #{} as {:?}", kept.frame_number, path);
                stats.extracted_frames += 1;
            }
        }

        info!(
            "✅ Extracted {} frames from {} decoded",
            stats.extracted_frames, stats.processed_frames
        );
        Ok(stats)
    }
}

impl Default for FrameExtractor {
    fn default() -> Self {
        Self::new()
    }
}
