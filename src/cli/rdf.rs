//! # rdf 子命令 CLI 定义
//!
//! 从轨迹计算总 RDF 与各物种对的偏 RDF。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/rdf.rs`

use crate::rdf::calculator::{
    DEFAULT_BINS, DEFAULT_CUTOFF, DEFAULT_SIGMA, DEFAULT_SMOOTH_WINDOW,
};

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 输入轨迹格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum TrajectoryFormat {
    /// VASP POSCAR/CONTCAR/XDATCAR (last configuration)
    #[value(alias = "xdatcar")]
    Poscar,
    /// LAMMPS text dump (all frames)
    #[value(alias = "dump")]
    Lammps,
}

impl std::fmt::Display for TrajectoryFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrajectoryFormat::Poscar => write!(f, "poscar"),
            TrajectoryFormat::Lammps => write!(f, "lammps"),
        }
    }
}

/// 平滑方式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum SmoothMode {
    /// No smoothing
    #[default]
    Off,
    /// Uniform moving average (--window)
    Moving,
    /// Gaussian kernel (--sigma, in bins)
    Gaussian,
}

impl std::fmt::Display for SmoothMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SmoothMode::Off => write!(f, "off"),
            SmoothMode::Moving => write!(f, "moving"),
            SmoothMode::Gaussian => write!(f, "gaussian"),
        }
    }
}

/// rdf 子命令参数
#[derive(Args, Debug)]
pub struct RdfArgs {
    /// Input trajectory (POSCAR/CONTCAR/XDATCAR or LAMMPS dump)
    pub input: PathBuf,

    /// Input format (guessed from the file name if not specified)
    #[arg(long, value_enum)]
    pub fmt: Option<TrajectoryFormat>,

    /// Type to element labels, e.g. "1:Al,2:N,3:Sc"
    #[arg(long)]
    pub type_map: Option<String>,

    /// Fractional frame window to average over, e.g. "--avg-frac 0.5 1.0"
    #[arg(long, num_args = 2, value_names = ["START", "END"], default_values_t = [0.8, 1.0])]
    pub avg_frac: Vec<f64>,

    /// Cutoff radius in Å
    #[arg(long, default_value_t = DEFAULT_CUTOFF)]
    pub cutoff: f64,

    /// Use half of the shortest cell edge of the first window frame as cutoff
    #[arg(long, default_value_t = false, conflicts_with = "cutoff")]
    pub auto_cutoff: bool,

    /// Number of histogram bins
    #[arg(long, default_value_t = DEFAULT_BINS)]
    pub bins: usize,

    /// Smoothing applied to g(r)
    #[arg(long, value_enum, default_value = "off")]
    pub smooth: SmoothMode,

    /// Moving-average width in bins (odd)
    #[arg(long, default_value_t = DEFAULT_SMOOTH_WINDOW)]
    pub window: usize,

    /// Gaussian sigma in bins
    #[arg(long, default_value_t = DEFAULT_SIGMA)]
    pub sigma: f64,

    /// Output text table (".csv" extension writes CSV)
    #[arg(long, default_value = "rdf.txt")]
    pub txt: PathBuf,

    /// Output figure (".svg" extension writes SVG, otherwise PNG)
    #[arg(long, default_value = "rdf.png")]
    pub out: PathBuf,

    /// Figure width in pixels
    #[arg(long, default_value_t = 1000)]
    pub width: u32,

    /// Height of each row of panels in pixels
    #[arg(long, default_value_t = 400)]
    pub panel_height: u32,

    /// Skip figure generation
    #[arg(long, default_value_t = false)]
    pub no_plot: bool,
}
