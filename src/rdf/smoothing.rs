//! # g(r) 平滑
//!
//! 均匀滑动平均或高斯核卷积，输出长度与输入相同，边界外视为零。
//! 只作用于 g(r) 数值，不改变半径轴。

use crate::error::{LeoError, Result};

/// 平滑方式
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Smoothing {
    #[default]
    Off,
    /// 均匀核，宽度为奇数个 bin
    Moving { width: usize },
    /// 高斯核，sigma 以 bin 为单位，半宽 ⌊3σ⌋
    Gaussian { sigma: f64 },
}

impl Smoothing {
    /// 检查参数；核长度不得超过 bin 数
    pub fn validate(&self, bins: usize) -> Result<()> {
        match *self {
            Smoothing::Off => return Ok(()),
            Smoothing::Moving { width } => {
                if width == 0 || width % 2 == 0 {
                    return Err(LeoError::InvalidArgument(format!(
                        "moving-average window must be a positive odd number, got {}",
                        width
                    )));
                }
            }
            Smoothing::Gaussian { sigma } => {
                if !(sigma.is_finite() && sigma > 0.0) {
                    return Err(LeoError::InvalidArgument(format!(
                        "gaussian sigma must be positive, got {}",
                        sigma
                    )));
                }
            }
        }

        let len = self.kernel_len();
        if len > bins as f64 {
            return Err(LeoError::InvalidArgument(format!(
                "{} kernel spans {} bins, more than the {} histogram bins",
                self, len, bins
            )));
        }
        Ok(())
    }

    /// 核长度（浮点，避免大 sigma 溢出）
    fn kernel_len(&self) -> f64 {
        match *self {
            Smoothing::Off => 0.0,
            Smoothing::Moving { width } => width as f64,
            Smoothing::Gaussian { sigma } => 2.0 * (3.0 * sigma).floor() + 1.0,
        }
    }

    /// 卷积核；Off 返回 None
    pub fn kernel(&self) -> Option<Vec<f64>> {
        match *self {
            Smoothing::Off => None,
            Smoothing::Moving { width } => Some(vec![1.0 / width as f64; width]),
            Smoothing::Gaussian { sigma } => {
                let half = (3.0 * sigma) as i64;
                let mut k: Vec<f64> = (-half..=half)
                    .map(|x| (-0.5 * (x as f64 / sigma).powi(2)).exp())
                    .collect();
                let sum: f64 = k.iter().sum();
                k.iter_mut().for_each(|v| *v /= sum);
                Some(k)
            }
        }
    }

    pub fn apply(&self, y: &[f64]) -> Vec<f64> {
        match self.kernel() {
            Some(k) => convolve_same(y, &k),
            None => y.to_vec(),
        }
    }
}

impl std::fmt::Display for Smoothing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Smoothing::Off => write!(f, "off"),
            Smoothing::Moving { width } => write!(f, "moving average ({} bins)", width),
            Smoothing::Gaussian { sigma } => write!(f, "gaussian (sigma = {} bins)", sigma),
        }
    }
}

/// 同长度卷积：out[i] = Σ_k y[i + c - k] · kernel[k]，c = (K-1)/2
pub fn convolve_same(y: &[f64], kernel: &[f64]) -> Vec<f64> {
    let n = y.len() as isize;
    let c = (kernel.len() as isize - 1) / 2;

    (0..n)
        .map(|i| {
            kernel
                .iter()
                .enumerate()
                .filter_map(|(k, &w)| {
                    let j = i + c - k as isize;
                    (0..n).contains(&j).then(|| y[j as usize] * w)
                })
                .sum()
        })
        .collect()
}
