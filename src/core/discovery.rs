//! 输入发现 - 从候选路径列表中选出要处理的视频 / 帧目录
//!
//! 选择逻辑都是纯函数，只有 `list_dir_entries` 会访问文件系统。

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Files,
    Dirs,
}

/// 列出目录下的文件或子目录，作为选择函数的候选输入
pub fn list_dir_entries(dir: &Path, kind: EntryKind) -> io::Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let keep = match kind {
            EntryKind::Files => file_type.is_file(),
            EntryKind::Dirs => file_type.is_dir(),
        };
        if keep {
            entries.push(entry.path());
        }
    }
    entries.sort();
    Ok(entries)
}

pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// 选出第一个视频文件（按路径字典序）
pub fn select_video(candidates: &[PathBuf]) -> Option<&PathBuf> {
    candidates
        .iter()
        .filter(|p| has_extension(p, VIDEO_EXTENSIONS))
        .min()
}

/// 优先选名字与 `video_name` 一致的帧目录，否则退回字典序第一个
pub fn select_frames_dir<'a>(candidates: &'a [PathBuf], video_name: &str) -> Option<&'a PathBuf> {
    candidates
        .iter()
        .find(|p| p.file_name().and_then(|n| n.to_str()) == Some(video_name))
        .or_else(|| candidates.iter().min())
}

/// 文件名去扩展名，用于帧目录名和分析单元命名
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(items: &[&str]) -> Vec<PathBuf> {
        items.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_select_video_filters_extensions() {
        let candidates = paths(&["videos/notes.txt", "videos/b.MOV", "videos/a.mkv", "videos/c"]);
        assert_eq!(select_video(&candidates), Some(&PathBuf::from("videos/a.mkv")));
    }

    #[test]
    fn test_select_video_none() {
        let candidates = paths(&["videos/readme.md", "videos/clip.webm"]);
        assert_eq!(select_video(&candidates), None);
        assert_eq!(select_video(&[]), None);
    }

    #[test]
    fn test_select_frames_dir_prefers_video_name() {
        let candidates = paths(&["frames/alpha", "frames/session_2", "frames/zeta"]);
        assert_eq!(
            select_frames_dir(&candidates, "session_2"),
            Some(&PathBuf::from("frames/session_2"))
        );
    }

    #[test]
    fn test_select_frames_dir_falls_back_to_first() {
        let candidates = paths(&["frames/zeta", "frames/alpha"]);
        assert_eq!(
            select_frames_dir(&candidates, "missing"),
            Some(&PathBuf::from("frames/alpha"))
        );
        assert_eq!(select_frames_dir(&[], "missing"), None);
    }

    #[test]
    fn test_list_dir_entries_splits_files_and_dirs() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("b.mp4"), b"x").unwrap();
        fs::write(dir.path().join("a.mp4"), b"x").unwrap();

        let files = list_dir_entries(dir.path(), EntryKind::Files).unwrap();
        assert_eq!(files, vec![dir.path().join("a.mp4"), dir.path().join("b.mp4")]);

        let dirs = list_dir_entries(dir.path(), EntryKind::Dirs).unwrap();
        assert_eq!(dirs, vec![dir.path().join("sub")]);
    }
}
