//! # 帧窗口选择
//!
//! 按分数边界 (f0, f1) 选取连续帧 [⌊f0·N⌋, ⌊f1·N⌋)，用于丢弃平衡阶段。
//! 结束索引不大于起始索引时向后扩展一帧，保证至少处理一帧。

use crate::error::{LeoError, Result};

use std::ops::Range;

/// 分数形式的帧窗口
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameWindow {
    pub start: f64,
    pub end: f64,
}

impl FrameWindow {
    pub fn new(start: f64, end: f64) -> Self {
        FrameWindow { start, end }
    }

    /// 检查 0 <= start <= end <= 1
    pub fn validate(&self) -> Result<()> {
        let in_unit = |f: f64| f.is_finite() && (0.0..=1.0).contains(&f);
        if !in_unit(self.start) || !in_unit(self.end) {
            return Err(LeoError::RangeError(format!(
                "frame window ({}, {}) must lie within [0, 1]",
                self.start, self.end
            )));
        }
        if self.end < self.start {
            return Err(LeoError::RangeError(format!(
                "frame window end {} is before start {}",
                self.end, self.start
            )));
        }
        Ok(())
    }

    /// 对 `n_frames` 帧的轨迹计算索引区间
    pub fn select(&self, n_frames: usize) -> Result<Range<usize>> {
        self.validate()?;

        let first = (self.start * n_frames as f64).floor() as usize;
        let mut last = (self.end * n_frames as f64).floor() as usize;
        if last <= first {
            last = first + 1;
        }

        if last > n_frames {
            return Err(LeoError::RangeError(format!(
                "frame window ({}, {}) selects no frame of {}",
                self.start, self.end, n_frames
            )));
        }

        Ok(first..last)
    }
}

impl Default for FrameWindow {
    fn default() -> Self {
        FrameWindow::new(0.8, 1.0)
    }
}
