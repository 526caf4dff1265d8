//! # 距离直方图累加与 g(r) 归一化
//!
//! ## 算法概述
//! 1. 每帧计算总距离集合与每个物种对的距离集合，累加到整数直方图
//! 2. 所有帧结束后除以帧数（帧平均）
//! 3. 以参考帧的原子数与体积计算理想气体壳层期望数
//!    `N_a · (N_b / V) · 4π r² dr`，逐 bin 相除得到 g(r)
//!
//! 物种对集合固定为窗口第一帧出现的类型的全部无序组合。
//!
//! ## 依赖关系
//! - 被 `rdf/calculator.rs` 调用
//! - 使用 `rdf/distance.rs`

use crate::models::{Frame, SpeciesPair};
use crate::rdf::distance::pair_distances;

use std::collections::BTreeMap;
use std::f64::consts::PI;

/// [0, cutoff) 上等宽 bin 的计数直方图
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    cutoff: f64,
    counts: Vec<u64>,
}

impl Histogram {
    pub fn new(cutoff: f64, bins: usize) -> Self {
        Histogram {
            cutoff,
            counts: vec![0; bins],
        }
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn bin_width(&self) -> f64 {
        self.cutoff / self.counts.len() as f64
    }

    /// bin 中心
    pub fn centers(&self) -> Vec<f64> {
        let width = self.bin_width();
        (0..self.bins()).map(|i| (i as f64 + 0.5) * width).collect()
    }

    /// 加入一个距离，区间外的值被忽略
    pub fn add(&mut self, d: f64) {
        if !(0.0..self.cutoff).contains(&d) {
            return;
        }
        let idx = ((d / self.bin_width()) as usize).min(self.counts.len() - 1);
        self.counts[idx] += 1;
    }

    pub fn extend(&mut self, distances: &[f64]) {
        for &d in distances {
            self.add(d);
        }
    }
}

/// 跨帧累加器：总直方图 + 每个物种对一个直方图
#[derive(Debug, Clone)]
pub struct RdfAccumulator {
    cutoff: f64,
    total: Histogram,
    partials: BTreeMap<SpeciesPair, Histogram>,
    frames: usize,
}

impl RdfAccumulator {
    /// 以参考帧中出现的类型建立物种对
    pub fn new(types: &[u32], cutoff: f64, bins: usize) -> Self {
        let partials = SpeciesPair::all_pairs(types)
            .into_iter()
            .map(|pair| (pair, Histogram::new(cutoff, bins)))
            .collect();

        RdfAccumulator {
            cutoff,
            total: Histogram::new(cutoff, bins),
            partials,
            frames: 0,
        }
    }

    /// 累加一帧
    pub fn accumulate(&mut self, frame: &Frame) {
        let frac = frame.fractional_positions();
        let all: Vec<usize> = (0..frame.len()).collect();

        let d = pair_distances(&frac, &frame.lattice, &all, &all, self.cutoff);
        self.total.extend(&d);

        let by_type: BTreeMap<u32, Vec<usize>> = frame
            .unique_types()
            .into_iter()
            .map(|t| (t, frame.indices_of(t)))
            .collect();

        let empty = Vec::new();
        for (pair, hist) in self.partials.iter_mut() {
            let a = by_type.get(&pair.first).unwrap_or(&empty);
            let b = by_type.get(&pair.second).unwrap_or(&empty);
            let d = pair_distances(&frac, &frame.lattice, a, b, self.cutoff);
            hist.extend(&d);
        }

        self.frames += 1;
    }

    /// 除以帧数，得到帧平均计数
    pub fn finalize(self) -> AveragedHistograms {
        let n = self.frames.max(1) as f64;
        let average = |h: &Histogram| h.counts.iter().map(|&c| c as f64 / n).collect();

        AveragedHistograms {
            radii: self.total.centers(),
            bin_width: self.total.bin_width(),
            total: average(&self.total),
            partials: self
                .partials
                .iter()
                .map(|(&pair, h)| (pair, average(h)))
                .collect(),
        }
    }
}

/// 帧平均后的直方图
#[derive(Debug, Clone)]
pub struct AveragedHistograms {
    pub radii: Vec<f64>,
    pub bin_width: f64,
    pub total: Vec<f64>,
    pub partials: BTreeMap<SpeciesPair, Vec<f64>>,
}

/// 理想气体归一化：g_i = count_i / (N_a · N_b / V · 4π r_i² dr)
///
/// 期望数为零（某一类型没有原子）时整条曲线为零。
pub fn normalize(
    counts: &[f64],
    radii: &[f64],
    bin_width: f64,
    n_a: usize,
    n_b: usize,
    volume: f64,
) -> Vec<f64> {
    let rho = if volume > 0.0 { n_b as f64 / volume } else { 0.0 };

    counts
        .iter()
        .zip(radii)
        .map(|(&count, &r)| {
            let shell = 4.0 * PI * r * r * bin_width;
            let expected = n_a as f64 * rho * shell;
            if expected > 0.0 {
                count / expected
            } else {
                0.0
            }
        })
        .collect()
}
