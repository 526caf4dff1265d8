//! # RDF 计算器
//!
//! 单向流水线：选择帧窗口 → 累加直方图 → 归一化 → 平滑。
//!
//! ## 参考
//! - Allen & Tildesley, Computer Simulation of Liquids, §8.2
//!
//! ## 依赖关系
//! - 被 `commands/rdf.rs` 调用
//! - 使用 `models/structure.rs` 的 Trajectory, Frame
//! - 使用 `rdf/window.rs`, `rdf/histogram.rs`, `rdf/smoothing.rs`

use crate::error::{LeoError, Result};
use crate::models::{SpeciesPair, Trajectory};
use crate::rdf::histogram::{normalize, RdfAccumulator};
use crate::rdf::smoothing::Smoothing;
use crate::rdf::window::FrameWindow;

use std::ops::Range;

/// 默认截断半径 (Å)
pub const DEFAULT_CUTOFF: f64 = 6.0;
/// 默认 bin 数
pub const DEFAULT_BINS: usize = 300;
/// 默认滑动平均宽度 (bin)
pub const DEFAULT_SMOOTH_WINDOW: usize = 5;
/// 默认高斯 sigma (bin)
pub const DEFAULT_SIGMA: f64 = 1.0;

/// 截断半径
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cutoff {
    /// 固定值 (Å)
    Fixed(f64),
    /// 窗口第一帧最短晶格边长的一半
    HalfShortestEdge,
}

/// 一次 RDF 计算的完整配置
#[derive(Debug, Clone, PartialEq)]
pub struct RdfConfig {
    pub cutoff: Cutoff,
    pub bins: usize,
    pub window: FrameWindow,
    pub smoothing: Smoothing,
}

impl Default for RdfConfig {
    fn default() -> Self {
        RdfConfig {
            cutoff: Cutoff::Fixed(DEFAULT_CUTOFF),
            bins: DEFAULT_BINS,
            window: FrameWindow::default(),
            smoothing: Smoothing::Off,
        }
    }
}

impl RdfConfig {
    /// 在处理任何帧之前检查参数
    pub fn validate(&self) -> Result<()> {
        if let Cutoff::Fixed(r) = self.cutoff {
            if !(r.is_finite() && r > 0.0) {
                return Err(LeoError::RangeError(format!(
                    "cutoff must be positive, got {}",
                    r
                )));
            }
        }
        if self.bins == 0 {
            return Err(LeoError::RangeError(
                "bin count must be positive".to_string(),
            ));
        }
        self.window.validate()?;
        self.smoothing.validate(self.bins)
    }
}

/// 单个物种对的 g(r)
#[derive(Debug, Clone)]
pub struct PartialRdf {
    pub pair: SpeciesPair,
    pub g: Vec<f64>,
    /// 窗口内没有任何该类原子对落入 (0, cutoff)，g 全为零。
    ///
    /// 比"某一类型原子数为零"更宽：参考帧中两类原子都存在但彼此
    /// 始终相距超过截断半径时同样为 true（例如单原子的自身对）。
    pub empty: bool,
}

/// RDF 计算结果
#[derive(Debug, Clone)]
pub struct RdfResult {
    /// bin 中心 (Å)
    pub radii: Vec<f64>,
    /// 总 g(r)
    pub total: Vec<f64>,
    /// 偏 g(r)，按 (ta, tb) 升序
    pub partials: Vec<PartialRdf>,
    /// 使用的帧索引区间
    pub frame_range: Range<usize>,
    /// 实际使用的截断半径 (Å)
    pub cutoff: f64,
    /// 参考帧原子数
    pub n_atoms: usize,
    /// 参考帧体积 (Å³)
    pub volume: f64,
    /// 参考帧最小垂直晶面间距的一半 (Å)
    pub half_min_width: f64,
}

impl RdfResult {
    pub fn frames_used(&self) -> usize {
        self.frame_range.len()
    }

    /// 截断半径超过最近镜像约定的有效范围
    pub fn cutoff_exceeds_minimum_image(&self) -> bool {
        self.cutoff > self.half_min_width + 1e-12
    }

    /// 曲线最高点 (r, g)
    pub fn peak(radii: &[f64], g: &[f64]) -> Option<(f64, f64)> {
        radii
            .iter()
            .zip(g)
            .filter(|(_, v)| v.is_finite())
            .fold(None, |best: Option<(f64, f64)>, (&r, &v)| match best {
                Some((_, bv)) if bv >= v => best,
                _ => Some((r, v)),
            })
    }
}

/// RDF 计算器
pub struct RdfCalculator {
    config: RdfConfig,
}

impl RdfCalculator {
    pub fn new(config: RdfConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RdfConfig {
        &self.config
    }

    /// 计算 RDF，每处理完一帧调用一次 `on_frame(已处理帧数)`
    pub fn compute_with_progress<F>(&self, trajectory: &Trajectory, mut on_frame: F) -> Result<RdfResult>
    where
        F: FnMut(usize),
    {
        self.config.validate()?;

        if trajectory.is_empty() {
            return Err(LeoError::EmptyTrajectory {
                path: trajectory.source.clone(),
            });
        }

        let range = self.config.window.select(trajectory.len())?;
        let window = &trajectory.frames[range.clone()];
        let reference = &window[0];

        let cutoff = match self.config.cutoff {
            Cutoff::Fixed(r) => r,
            Cutoff::HalfShortestEdge => {
                let lengths = reference.lattice.lengths();
                lengths.iter().copied().fold(f64::INFINITY, f64::min) / 2.0
            }
        };
        if !(cutoff.is_finite() && cutoff > 0.0) {
            return Err(LeoError::RangeError(format!(
                "cutoff must be positive, got {}",
                cutoff
            )));
        }

        // 累加
        let types = reference.unique_types();
        let mut accumulator = RdfAccumulator::new(&types, cutoff, self.config.bins);
        for (i, frame) in window.iter().enumerate() {
            accumulator.accumulate(frame);
            on_frame(i + 1);
        }
        let averaged = accumulator.finalize();

        // 归一化（参考帧的原子数与体积）
        let n_atoms = reference.len();
        let volume = reference.volume();
        let total = normalize(
            &averaged.total,
            &averaged.radii,
            averaged.bin_width,
            n_atoms,
            n_atoms,
            volume,
        );

        let partials = averaged
            .partials
            .iter()
            .map(|(&pair, counts)| {
                let n_a = reference.count_of(pair.first);
                let n_b = reference.count_of(pair.second);
                let g = normalize(
                    counts,
                    &averaged.radii,
                    averaged.bin_width,
                    n_a,
                    n_b,
                    volume,
                );
                PartialRdf {
                    pair,
                    g: self.config.smoothing.apply(&g),
                    empty: counts.iter().all(|&c| c == 0.0),
                }
            })
            .collect();

        let widths = reference.lattice.perpendicular_widths();
        let half_min_width = widths.iter().copied().fold(f64::INFINITY, f64::min) / 2.0;

        Ok(RdfResult {
            radii: averaged.radii,
            total: self.config.smoothing.apply(&total),
            partials,
            frame_range: range,
            cutoff,
            n_atoms,
            volume,
            half_min_width,
        })
    }
}
