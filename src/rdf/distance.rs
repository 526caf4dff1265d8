//! # 周期性最近镜像距离
//!
//! 分数坐标差逐分量减去最近整数，再乘回晶格得到笛卡尔距离。
//! 只考虑最近镜像，对倾斜严重的晶胞只是近似。
//!
//! 两组原子之间做稠密的全对计算，O(nₐ·n_b)。

use crate::models::Lattice;

/// 两个分数坐标之间的最近镜像距离
pub fn minimum_image_distance(fa: [f64; 3], fb: [f64; 3], lattice: &Lattice) -> f64 {
    let df = [
        wrap(fa[0] - fb[0]),
        wrap(fa[1] - fb[1]),
        wrap(fa[2] - fb[2]),
    ];
    let dc = lattice.to_cartesian(df);
    (dc[0] * dc[0] + dc[1] * dc[1] + dc[2] * dc[2]).sqrt()
}

#[inline]
fn wrap(d: f64) -> f64 {
    d - d.round()
}

/// 两组原子（可相同）之间所有 0 < d < cutoff 的距离
///
/// `fractional` 为整帧的分数坐标，`a`、`b` 为原子索引。
/// 同一原子 (i == j) 的配对被跳过。
pub fn pair_distances(
    fractional: &[[f64; 3]],
    lattice: &Lattice,
    a: &[usize],
    b: &[usize],
    cutoff: f64,
) -> Vec<f64> {
    let mut out = Vec::new();

    for &i in a {
        for &j in b {
            if i == j {
                continue;
            }
            let d = minimum_image_distance(fractional[i], fractional[j], lattice);
            if d > 0.0 && d < cutoff {
                out.push(d);
            }
        }
    }

    out
}
