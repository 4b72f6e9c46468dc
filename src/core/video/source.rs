//! 帧来源 - ffmpeg 子进程解码为 rawvideo rgb24

use super::error::VideoError;
use super::frame::RgbFrame;
use super::probe::VideoInfo;
use log::{debug, warn};
use std::collections::VecDeque;
use std::ffi::OsStr;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};
use std::thread::JoinHandle;

/// 错误信息只保留 stderr 最后几行
const STDERR_TAIL_LINES: usize = 20;

/// 按解码顺序产出帧，frame_number 从 0 连续递增
pub trait FrameSource: Iterator<Item = Result<RgbFrame, VideoError>> {}

impl<T> FrameSource for T where T: Iterator<Item = Result<RgbFrame, VideoError>> {}

pub struct FfmpegFrameSource {
    child: Child,
    stdout: ChildStdout,
    stderr_tail: Option<JoinHandle<Vec<String>>>,
    width: u32,
    height: u32,
    next_number: u64,
    finished: bool,
}

impl FfmpegFrameSource {
    pub fn spawn(path: &Path, info: &VideoInfo) -> Result<Self, VideoError> {
        Self::spawn_program(OsStr::new("ffmpeg"), path, info)
    }

    /// ffprobe 报告的是存储尺寸，`-noautorotate` 让输出保持同一尺寸
    pub(crate) fn spawn_program(
        program: &OsStr,
        path: &Path,
        info: &VideoInfo,
    ) -> Result<Self, VideoError> {
        let mut child = Command::new(program)
            .args(["-v", "error", "-nostdin", "-noautorotate"])
            .arg("-i")
            .arg(path)
            .args(["-map", "0:v:0"])
            .args(["-fps_mode", "passthrough"])
            .args(["-f", "rawvideo", "-pix_fmt", "rgb24", "-"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| VideoError::ToolUnavailable {
                tool: "ffmpeg",
                source,
            })?;

        // stderr 必须持续读走，否则管道写满后 ffmpeg 会阻塞
        let stderr_tail = child.stderr.take().map(spawn_stderr_collector);

        let stdout = match child.stdout.take() {
            Some(stdout) => stdout,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(VideoError::OpenFailed {
                    path: path.to_path_buf(),
                    reason: "ffmpeg stdout unavailable".to_string(),
                });
            }
        };

        debug!("ffmpeg decoding {:?} at {}x{}", path, info.width, info.height);
        Ok(Self {
            child,
            stdout,
            stderr_tail,
            width: info.width,
            height: info.height,
            next_number: 0,
            finished: false,
        })
    }

    fn read_frame(&mut self) -> Result<Option<RgbFrame>, VideoError> {
        let mut buf = vec![0u8; RgbFrame::byte_len(self.width, self.height)];
        let mut filled = 0;
        while filled < buf.len() {
            match self.stdout.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        if filled < buf.len() {
            if filled > 0 {
                warn!("⚠️ Discarding truncated trailing frame ({} bytes)", filled);
            }
            self.finish()?;
            return Ok(None);
        }

        let frame = RgbFrame::new(self.width, self.height, buf, self.next_number);
        self.next_number += 1;
        Ok(Some(frame))
    }

    fn finish(&mut self) -> Result<(), VideoError> {
        self.finished = true;
        let status = self.child.wait()?;
        let tail = self.join_stderr();
        if !status.success() {
            return Err(VideoError::Decoder(format!("{}: {}", status, tail.join("\n"))));
        }
        Ok(())
    }

    fn join_stderr(&mut self) -> Vec<String> {
        self.stderr_tail
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default()
    }
}

fn spawn_stderr_collector(stderr: impl Read + Send + 'static) -> JoinHandle<Vec<String>> {
    std::thread::spawn(move || {
        let mut lines = VecDeque::new();
        let mut reader = BufReader::new(stderr);
        let mut line = Vec::new();

        loop {
            line.clear();
            match reader.read_until(b'\n', &mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
            let cleaned = String::from_utf8_lossy(&line).trim().to_string();
            if cleaned.is_empty() {
                continue;
            }
            lines.push_back(cleaned);
            if lines.len() > STDERR_TAIL_LINES {
                lines.pop_front();
            }
        }

        lines.into_iter().collect()
    })
}

impl Iterator for FfmpegFrameSource {
    type Item = Result<RgbFrame, VideoError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.read_frame() {
            Ok(Some(frame)) => Some(Ok(frame)),
            Ok(None) => None,
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl Drop for FfmpegFrameSource {
    fn drop(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
        self.join_stderr();
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use std::sync::mpsc;
    use std::time::Duration;
    use tempfile::TempDir;

    /// 写一个假的 ffmpeg：记录参数，刷屏 stderr，再输出若干 4x4 帧
    fn fake_ffmpeg(dir: &TempDir, stderr_lines: usize, frames: usize, exit_code: i32) -> PathBuf {
        let args_file = dir.path().join("args.txt");
        let script = format!(
            "#!/bin/sh\n\
             printf '%s\\n' \"$@\" > '{args}'\n\
             i=0\n\
             while [ $i -lt {lines} ]; do\n\
               echo \"[h264 @ 0x0] error while decoding MB $i, bytestream -5\" >&2\n\
               i=$((i+1))\n\
             done\n\
             head -c {bytes} /dev/zero\n\
             exit {code}\n",
            args = args_file.display(),
            lines = stderr_lines,
            bytes = RgbFrame::byte_len(4, 4) * frames,
            code = exit_code,
        );
        let path = dir.path().join("ffmpeg");
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn info_4x4() -> VideoInfo {
        VideoInfo {
            width: 4,
            height: 4,
            fps: Some(30.0),
        }
    }

    /// 并行测试 fork 时可能短暂持有刚写完的脚本，exec 会报 ETXTBSY
    fn spawn_fake(program: &Path) -> Result<FfmpegFrameSource, VideoError> {
        for _ in 0..50 {
            match FfmpegFrameSource::spawn_program(program.as_os_str(), Path::new("in.mp4"), &info_4x4()) {
                Err(VideoError::ToolUnavailable { source, .. }) if source.raw_os_error() == Some(26) => {
                    std::thread::sleep(Duration::from_millis(20));
                }
                other => return other,
            }
        }
        FfmpegFrameSource::spawn_program(program.as_os_str(), Path::new("in.mp4"), &info_4x4())
    }

    fn collect_with_timeout(program: PathBuf) -> Vec<Result<RgbFrame, VideoError>> {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let frames: Vec<_> = spawn_fake(&program).unwrap().collect();
            let _ = tx.send(frames);
        });
        rx.recv_timeout(Duration::from_secs(20))
            .expect("frame source blocked on a full stderr pipe")
    }

    #[test]
    fn test_noisy_stderr_does_not_block_decoding() {
        let dir = TempDir::new().unwrap();
        let program = fake_ffmpeg(&dir, 3000, 1, 0);

        let frames = collect_with_timeout(program);

        assert_eq!(frames.len(), 1);
        let frame = frames.into_iter().next().unwrap().unwrap();
        assert_eq!((frame.width, frame.height, frame.frame_number), (4, 4, 0));
    }

    #[test]
    fn test_failed_decoder_reports_stderr_tail() {
        let dir = TempDir::new().unwrap();
        let program = fake_ffmpeg(&dir, 3000, 2, 1);

        let results = collect_with_timeout(program);

        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok() && results[1].is_ok());
        match &results[2] {
            Err(VideoError::Decoder(msg)) => {
                assert!(msg.contains("error while decoding MB 2999"));
                assert!(!msg.contains("MB 0,"));
                assert!(msg.lines().count() <= STDERR_TAIL_LINES + 1);
            }
            other => panic!("expected decoder error, got {other:?}"),
        }
    }

    #[test]
    fn test_ffmpeg_arguments_keep_stored_orientation() {
        let dir = TempDir::new().unwrap();
        let program = fake_ffmpeg(&dir, 0, 0, 0);

        let frames = collect_with_timeout(program);
        assert!(frames.is_empty());

        let args: Vec<String> = fs::read_to_string(dir.path().join("args.txt"))
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect();
        let pos = |flag: &str| args.iter().position(|a| a == flag);
        let input = pos("-i").unwrap();
        assert!(pos("-noautorotate").unwrap() < input);
        assert_eq!(args[input + 1], "in.mp4");
        assert_eq!(args[pos("-fps_mode").unwrap() + 1], "passthrough");
        assert!(pos("-vsync").is_none());
    }

    #[test]
    fn test_missing_program_is_tool_unavailable() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("no-such-ffmpeg");

        let err = FfmpegFrameSource::spawn_program(missing.as_os_str(), Path::new("in.mp4"), &info_4x4())
            .err()
            .unwrap();

        assert!(matches!(err, VideoError::ToolUnavailable { tool: "ffmpeg", .. }));
    }
}
