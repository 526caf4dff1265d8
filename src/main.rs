//! # Leo - 计算材料工作流工具箱
//!
//! 分子动力学轨迹后处理，单一可执行文件。
//!
//! ## 子命令
//! - `rdf` - 周期性径向分布函数（总 RDF + 各物种对偏 RDF）
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (POSCAR/XDATCAR, LAMMPS dump)
//!   │     ├── rdf/       (g(r) 计算、导出、绘图)
//!   │     └── models/    (晶格、帧、轨迹)
//!   ├── utils/      (输出与进度条)
//!   └── error.rs    (错误处理)
//! ```

mod cli;
mod commands;
mod error;
mod models;
mod parsers;
mod rdf;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
