//! ffprobe 读取视频流信息

use super::error::VideoError;
use log::{debug, warn};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

pub const FALLBACK_FPS: f64 = 30.0;

#[derive(Debug, Clone, PartialEq)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    /// 无法确定时为 None
    pub fps: Option<f64>,
}

impl VideoInfo {
    pub fn effective_fps(&self) -> f64 {
        match self.fps {
            Some(fps) => fps,
            None => {
                warn!("⚠️ Could not determine video FPS, defaulting to {}", FALLBACK_FPS);
                FALLBACK_FPS
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
    avg_frame_rate: Option<String>,
    r_frame_rate: Option<String>,
}

pub fn probe_video(path: &Path) -> Result<VideoInfo, VideoError> {
    let output = Command::new("ffprobe")
        .args(["-v", "error", "-select_streams", "v:0"])
        .args(["-show_entries", "stream=width,height,avg_frame_rate,r_frame_rate"])
        .args(["-of", "json"])
        .arg(path)
        .output()
        .map_err(|source| VideoError::ToolUnavailable {
            tool: "ffprobe",
            source,
        })?;

    if !output.status.success() {
        return Err(VideoError::OpenFailed {
            path: path.to_path_buf(),
            reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    debug!("ffprobe output: {}", stdout);
    parse_probe_json(&stdout).map_err(|e| match e {
        VideoError::OpenFailed { reason, .. } => VideoError::OpenFailed {
            path: path.to_path_buf(),
            reason,
        },
        other => other,
    })
}

pub(crate) fn parse_probe_json(raw: &str) -> Result<VideoInfo, VideoError> {
    let parsed: ProbeOutput = serde_json::from_str(raw)?;
    let stream = parsed.streams.into_iter().next().ok_or_else(|| VideoError::OpenFailed {
        path: Default::default(),
        reason: "no video stream".to_string(),
    })?;

    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => {
            return Err(VideoError::OpenFailed {
                path: Default::default(),
                reason: "video stream has no dimensions".to_string(),
            })
        }
    };

    // avg_frame_rate 更接近真实解码帧率，r_frame_rate 兜底
    let fps = stream
        .avg_frame_rate
        .as_deref()
        .and_then(parse_frame_rate)
        .or_else(|| stream.r_frame_rate.as_deref().and_then(parse_frame_rate));

    Ok(VideoInfo { width, height, fps })
}

/// 解析 "30000/1001" 或 "25" 形式的帧率，0 或非法值返回 None
pub fn parse_frame_rate(raw: &str) -> Option<f64> {
    let fps = match raw.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => raw.trim().parse().ok()?,
    };

    if fps.is_finite() && fps > 0.0 {
        Some(fps)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frame_rate() {
        assert_eq!(parse_frame_rate("30/1"), Some(30.0));
        assert_eq!(parse_frame_rate("25"), Some(25.0));
        let ntsc = parse_frame_rate("30000/1001").unwrap();
        assert!((ntsc - 29.97).abs() < 0.01);
    }

    #[test]
    fn test_parse_frame_rate_unknown() {
        assert_eq!(parse_frame_rate("0/0"), None);
        assert_eq!(parse_frame_rate("0/1"), None);
        assert_eq!(parse_frame_rate("N/A"), None);
        assert_eq!(parse_frame_rate(""), None);
    }

    #[test]
    fn test_parse_probe_json() {
        let raw = r#"{"programs":[],"streams":[{"width":1920,"height":1080,"r_frame_rate":"60/1","avg_frame_rate":"30/1"}]}"#;
        let info = parse_probe_json(raw).unwrap();
        assert_eq!(
            info,
            VideoInfo {
                width: 1920,
                height: 1080,
                fps: Some(30.0)
            }
        );
    }

    #[test]
    fn test_parse_probe_json_unknown_rate_falls_back() {
        let raw = r#"{"streams":[{"width":640,"height":480,"r_frame_rate":"0/0","avg_frame_rate":"0/0"}]}"#;
        let info = parse_probe_json(raw).unwrap();
        assert_eq!(info.fps, None);
        assert_eq!(info.effective_fps(), FALLBACK_FPS);
    }

    #[test]
    fn test_parse_probe_json_without_stream() {
        assert!(matches!(
            parse_probe_json(r#"{"streams":[]}"#),
            Err(VideoError::OpenFailed { .. })
        ));
        assert!(matches!(parse_probe_json("not json"), Err(VideoError::Probe(_))));
    }
}
