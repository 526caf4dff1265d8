//! # 解析器模块
//!
//! 将轨迹文件统一解析为 `Trajectory`。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: poscar, lammps_dump

pub mod lammps_dump;
pub mod poscar;

use crate::cli::rdf::TrajectoryFormat;
use crate::error::{LeoError, Result};
use crate::models::Trajectory;
use std::path::Path;

/// 按指定格式解析轨迹文件
pub fn parse_trajectory_file(path: &Path, format: TrajectoryFormat) -> Result<Trajectory> {
    if !path.is_file() {
        return Err(LeoError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    match format {
        TrajectoryFormat::Poscar => poscar::parse_poscar_file(path),
        TrajectoryFormat::Lammps => lammps_dump::parse_dump_file(path),
    }
}

/// 从文件名推断格式：VASP 结构文件按名称识别，其余视为 LAMMPS dump
pub fn guess_format(path: &Path) -> TrajectoryFormat {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_uppercase();

    let is_vasp = ["POSCAR", "CONTCAR", "XDATCAR"]
        .iter()
        .any(|prefix| name.starts_with(prefix))
        || name.ends_with(".VASP");

    if is_vasp {
        TrajectoryFormat::Poscar
    } else {
        TrajectoryFormat::Lammps
    }
}
