//! # 晶格、帧与轨迹数据模型
//!
//! 所有格式解析后统一为 `Trajectory`，RDF 计算只依赖这里的类型。
//!
//! ## 依赖关系
//! - 被 `parsers/` 和 `rdf/` 使用
//! - 无外部模块依赖

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 晶格表示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lattice {
    /// 晶格向量矩阵 (3x3)，行向量表示 a, b, c
    /// [[a1, a2, a3], [b1, b2, b3], [c1, c2, c3]]
    pub matrix: [[f64; 3]; 3],
}

impl Lattice {
    /// 从晶格向量矩阵创建
    pub fn from_vectors(matrix: [[f64; 3]; 3]) -> Self {
        Lattice { matrix }
    }

    /// 正交盒子 diag(lx, ly, lz)
    pub fn orthogonal(lx: f64, ly: f64, lz: f64) -> Self {
        Lattice {
            matrix: [[lx, 0.0, 0.0], [0.0, ly, 0.0], [0.0, 0.0, lz]],
        }
    }

    /// 计算晶格体积（带符号的行列式）
    pub fn volume(&self) -> f64 {
        let a = self.matrix[0];
        let b = self.matrix[1];
        let c = self.matrix[2];

        a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0])
            + a[2] * (b[0] * c[1] - b[1] * c[0])
    }

    /// 逆矩阵，奇异晶格返回 None
    pub fn inverse(&self) -> Option<[[f64; 3]; 3]> {
        let m = self.matrix;
        let det = self.volume();

        if det.abs() < 1e-10 || !det.is_finite() {
            return None;
        }

        Some([
            [
                (m[1][1] * m[2][2] - m[1][2] * m[2][1]) / det,
                (m[0][2] * m[2][1] - m[0][1] * m[2][2]) / det,
                (m[0][1] * m[1][2] - m[0][2] * m[1][1]) / det,
            ],
            [
                (m[1][2] * m[2][0] - m[1][0] * m[2][2]) / det,
                (m[0][0] * m[2][2] - m[0][2] * m[2][0]) / det,
                (m[0][2] * m[1][0] - m[0][0] * m[1][2]) / det,
            ],
            [
                (m[1][0] * m[2][1] - m[1][1] * m[2][0]) / det,
                (m[0][1] * m[2][0] - m[0][0] * m[2][1]) / det,
                (m[0][0] * m[1][1] - m[0][1] * m[1][0]) / det,
            ],
        ])
    }

    /// 分数坐标转笛卡尔坐标 (行向量: c = f · L)
    pub fn to_cartesian(&self, frac: [f64; 3]) -> [f64; 3] {
        row_times_matrix(frac, &self.matrix)
    }

    /// 三个晶格向量的长度 (a, b, c)
    pub fn lengths(&self) -> [f64; 3] {
        let norm = |v: [f64; 3]| (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
        [
            norm(self.matrix[0]),
            norm(self.matrix[1]),
            norm(self.matrix[2]),
        ]
    }

    /// 三组相对晶面之间的垂直距离 V / |b×c|, V / |c×a|, V / |a×b|
    ///
    /// 最近镜像约定只在截断半径小于最小值的一半时完整。
    pub fn perpendicular_widths(&self) -> [f64; 3] {
        let [a, b, c] = self.matrix;
        let volume = self.volume().abs();
        let area = |u: [f64; 3], v: [f64; 3]| {
            let x = u[1] * v[2] - u[2] * v[1];
            let y = u[2] * v[0] - u[0] * v[2];
            let z = u[0] * v[1] - u[1] * v[0];
            (x * x + y * y + z * z).sqrt()
        };
        [
            volume / area(b, c),
            volume / area(c, a),
            volume / area(a, b),
        ]
    }
}

fn row_times_matrix(v: [f64; 3], m: &[[f64; 3]; 3]) -> [f64; 3] {
    [
        v[0] * m[0][0] + v[1] * m[1][0] + v[2] * m[2][0],
        v[0] * m[0][1] + v[1] * m[1][1] + v[2] * m[2][1],
        v[0] * m[0][2] + v[1] * m[1][2] + v[2] * m[2][2],
    ]
}

/// 单帧原子构型
///
/// 坐标已平移到盒子下角为原点，解析完成后不再修改。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frame {
    /// 笛卡尔坐标 (Å)
    pub positions: Vec<[f64; 3]>,

    /// 每个原子的类型编号（从 1 开始）
    pub types: Vec<u32>,

    /// 晶格
    pub lattice: Lattice,

    /// LAMMPS 时间步（POSCAR 无此信息）
    pub timestep: Option<u64>,
}

impl Frame {
    pub fn new(positions: Vec<[f64; 3]>, types: Vec<u32>, lattice: Lattice) -> Self {
        Frame {
            positions,
            types,
            lattice,
            timestep: None,
        }
    }

    pub fn with_timestep(mut self, timestep: u64) -> Self {
        self.timestep = Some(timestep);
        self
    }

    /// 原子数
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// 晶胞体积（行列式绝对值）
    pub fn volume(&self) -> f64 {
        self.lattice.volume().abs()
    }

    /// 出现过的类型，升序
    pub fn unique_types(&self) -> Vec<u32> {
        self.types
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// 指定类型的原子数
    pub fn count_of(&self, atom_type: u32) -> usize {
        self.types.iter().filter(|&&t| t == atom_type).count()
    }

    /// 指定类型的原子索引
    pub fn indices_of(&self, atom_type: u32) -> Vec<usize> {
        self.types
            .iter()
            .enumerate()
            .filter(|(_, &t)| t == atom_type)
            .map(|(i, _)| i)
            .collect()
    }

    /// 全部原子的分数坐标
    pub fn fractional_positions(&self) -> Vec<[f64; 3]> {
        match self.lattice.inverse() {
            Some(inv) => self
                .positions
                .iter()
                .map(|&p| row_times_matrix(p, &inv))
                .collect(),
            None => self.positions.clone(),
        }
    }
}

/// 轨迹：按时间顺序排列的帧
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trajectory {
    /// 帧列表
    pub frames: Vec<Frame>,

    /// 文件中声明的元素符号，下标 0 对应类型 1 (POSCAR 元素行)
    pub species: Option<Vec<String>>,

    /// 末尾不完整的帧是否被丢弃
    pub truncated: bool,

    /// 来源文件格式
    pub source_format: String,

    /// 来源文件路径（用于提示信息）
    pub source: String,
}

impl Trajectory {
    pub fn new(frames: Vec<Frame>, source_format: impl Into<String>) -> Self {
        Trajectory {
            frames,
            species: None,
            truncated: false,
            source_format: source_format.into(),
            source: String::new(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_species(mut self, species: Vec<String>) -> Self {
        self.species = Some(species);
        self
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
