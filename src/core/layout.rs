//! 工作区目录布局 - 各阶段之间唯一的契约
//!
//! ```text
//! videos/                                  输入视频
//! frames/<video_stem>/frame_%04d.jpg       抽出的帧
//! analysis_results/metadata/video_name.txt 视频名（单行）
//! analysis_results/*.txt                   每个分析单元的结果
//! journeys/<video_name>_journey.md         合成的用户旅程
//! journeys/<video_name>_summary.md         精简摘要
//! ```

use log::info;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("video_name.txt not found at {0}, run the extract stage first")]
    VideoNameMissing(PathBuf),
    #[error("video_name.txt at {0} is empty")]
    VideoNameEmpty(PathBuf),
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct WorkspaceLayout {
    root: PathBuf,
}

impl WorkspaceLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn videos_dir(&self) -> PathBuf {
        self.root.join("videos")
    }

    pub fn frames_base_dir(&self) -> PathBuf {
        self.root.join("frames")
    }

    pub fn frames_dir_for(&self, video_name: &str) -> PathBuf {
        self.frames_base_dir().join(video_name)
    }

    pub fn analysis_dir(&self) -> PathBuf {
        self.root.join("analysis_results")
    }

    pub fn video_name_file(&self) -> PathBuf {
        self.analysis_dir().join("metadata").join("video_name.txt")
    }

    pub fn journeys_dir(&self) -> PathBuf {
        self.root.join("journeys")
    }

    pub fn journey_path(&self, video_name: &str) -> PathBuf {
        self.journeys_dir().join(format!("{video_name}_journey.md"))
    }

    pub fn summary_path(&self, video_name: &str) -> PathBuf {
        self.journeys_dir().join(format!("{video_name}_summary.md"))
    }

    /// 记录视频名，下游阶段据此定位帧目录和输出文件
    pub fn write_video_name(&self, video_name: &str) -> Result<PathBuf, LayoutError> {
        let path = self.video_name_file();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| LayoutError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, format!("{video_name}\n")).map_err(|source| LayoutError::Io {
            path: path.clone(),
            source,
        })?;
        info!("📝 Recorded video name '{}' at {:?}", video_name, path);
        Ok(path)
    }

    pub fn read_video_name(&self) -> Result<String, LayoutError> {
        let path = self.video_name_file();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(LayoutError::VideoNameMissing(path));
            }
            Err(source) => return Err(LayoutError::Io { path, source }),
        };

        let name = raw.trim();
        if name.is_empty() {
            return Err(LayoutError::VideoNameEmpty(path));
        }
        Ok(name.to_string())
    }
}

impl Default for WorkspaceLayout {
    fn default() -> Self {
        Self::new(".")
    }
}
