//! 按固定时间间隔采样帧
//!
//! 每个完整区间（`step` 帧）输出一帧：区间的第一帧先暂存，
//! 区间最后一帧解码到达后才放行。末尾不足一个区间的帧被丢弃，
//! 所以输出帧数恰好是 `floor(total_frames / step)`。

use super::error::VideoError;
use super::frame::RgbFrame;

#[derive(Debug, Clone, PartialEq)]
pub enum SamplerState {
    /// 等待区间起点
    Idle,
    /// 已暂存区间首帧，等待区间走完
    Holding { interval_end: u64 },
}

#[derive(Debug)]
pub struct FrameSampler {
    step: u64,
    state: SamplerState,
    pending: Option<RgbFrame>,
}

impl FrameSampler {
    pub fn new(step: u64) -> Self {
        Self {
            step: step.max(1),
            state: SamplerState::Idle,
            pending: None,
        }
    }

    /// `step = floor(fps) * interval_secs`，至少为 1
    pub fn for_rate(fps: f64, interval_secs: u32) -> Result<Self, VideoError> {
        if interval_secs == 0 {
            return Err(VideoError::InvalidInterval);
        }
        let whole_fps = fps.floor().max(1.0) as u64;
        Ok(Self::new(whole_fps * interval_secs as u64))
    }

    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn state(&self) -> &SamplerState {
        &self.state
    }

    /// 送入按解码顺序编号的一帧，区间完成时返回该区间的首帧
    pub fn push(&mut self, frame: RgbFrame) -> Option<RgbFrame> {
        let index = frame.frame_number;

        if self.state == SamplerState::Idle && index % self.step == 0 {
            self.state = SamplerState::Holding {
                interval_end: index + self.step - 1,
            };
            self.pending = Some(frame);
        }

        match self.state {
            SamplerState::Holding { interval_end } if index >= interval_end => {
                self.state = SamplerState::Idle;
                self.pending.take()
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(n: u64) -> RgbFrame {
        RgbFrame::new(1, 1, vec![0, 0, 0], n)
    }

    fn run(step: u64, total: u64) -> Vec<u64> {
        let mut sampler = FrameSampler::new(step);
        (0..total)
            .filter_map(|n| sampler.push(frame(n)))
            .map(|f| f.frame_number)
            .collect()
    }

    #[test]
    fn test_emits_first_frame_of_each_complete_interval() {
        assert_eq!(run(3, 9), vec![0, 3, 6]);
    }

    #[test]
    fn test_partial_trailing_interval_dropped() {
        assert_eq!(run(3, 10), vec![0, 3, 6]);
        assert_eq!(run(3, 11), vec![0, 3, 6]);
        assert_eq!(run(3, 2), Vec::<u64>::new());
    }

    #[test]
    fn test_count_is_floor_of_total_over_step() {
        for total in 0..200u64 {
            assert_eq!(run(60, total).len() as u64, total / 60);
        }
    }

    #[test]
    fn test_step_one_keeps_every_frame() {
        assert_eq!(run(1, 4), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_for_rate() {
        assert_eq!(FrameSampler::for_rate(30.0, 2).unwrap().step(), 60);
        assert_eq!(FrameSampler::for_rate(29.97, 2).unwrap().step(), 58);
        assert_eq!(FrameSampler::for_rate(0.5, 1).unwrap().step(), 1);
        assert!(matches!(
            FrameSampler::for_rate(30.0, 0),
            Err(VideoError::InvalidInterval)
        ));
    }

    #[test]
    fn test_state_transitions() {
        let mut sampler = FrameSampler::new(2);
        assert_eq!(sampler.state(), &SamplerState::Idle);

        assert!(sampler.push(frame(0)).is_none());
        assert_eq!(sampler.state(), &SamplerState::Holding { interval_end: 1 });

        assert_eq!(sampler.push(frame(1)).map(|f| f.frame_number), Some(0));
        assert_eq!(sampler.state(), &SamplerState::Idle);
    }
}
