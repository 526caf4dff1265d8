//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `rdf`: 周期性径向分布函数 g(r)
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: rdf

pub mod rdf;

use clap::{Parser, Subcommand};

/// Leo - 计算材料工作流工具箱
#[derive(Parser)]
#[command(name = "leo")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "A computational materials toolbox", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Radial distribution function (total + partial) from a POSCAR/XDATCAR or LAMMPS dump
    Rdf(rdf::RdfArgs),
}
