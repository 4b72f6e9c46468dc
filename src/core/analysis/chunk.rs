//! 分析单元划分 - 单帧 / 滑动窗口

use super::error::AnalysisError;
use crate::core::discovery::file_stem;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    SingleFrame,
    SlidingWindow { window_size: usize, stride: usize },
}

impl Grouping {
    pub fn sliding_default() -> Self {
        Grouping::SlidingWindow {
            window_size: 2,
            stride: 1,
        }
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        match *self {
            Grouping::SingleFrame => Ok(()),
            Grouping::SlidingWindow { window_size, stride } => {
                if window_size == 0 || stride == 0 {
                    Err(AnalysisError::InvalidWindow { window_size, stride })
                } else {
                    Ok(())
                }
            }
        }
    }

    fn window(&self) -> (usize, usize) {
        match *self {
            Grouping::SingleFrame => (1, 1),
            Grouping::SlidingWindow { window_size, stride } => (window_size, stride),
        }
    }
}

/// 一次模型请求对应的帧窗口（只存在于内存）
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisUnit {
    pub start: usize,
    pub frames: Vec<PathBuf>,
}

impl AnalysisUnit {
    /// `chunk_{start:04}_{first}` 或 `chunk_{start:04}_{first}_to_{last}`，
    /// 字典序即时间顺序
    pub fn id(&self) -> String {
        let first = self.frames.first().map(|p| file_stem(p)).unwrap_or_default();
        match self.frames.last() {
            Some(last) if self.frames.len() > 1 => {
                format!("chunk_{:04}_{}_to_{}", self.start, first, file_stem(last))
            }
            _ => format!("chunk_{:04}_{}", self.start, first),
        }
    }
}

/// 窗口起点 0, stride, 2*stride ... 且 start + size <= n
pub fn plan_units(frames: &[PathBuf], grouping: Grouping) -> Result<Vec<AnalysisUnit>, AnalysisError> {
    grouping.validate()?;
    let (size, stride) = grouping.window();

    if frames.len() < size {
        return Ok(Vec::new());
    }

    Ok((0..=frames.len() - size)
        .step_by(stride)
        .map(|start| AnalysisUnit {
            start,
            frames: frames[start..start + size].to_vec(),
        })
        .collect())
}
