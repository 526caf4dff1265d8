//! # RDF 计算模块
//!
//! 周期性边界下的径向分布函数 g(r)，总 RDF 与各物种对的偏 RDF。
//!
//! ## 子模块
//! - `window`: 帧窗口选择
//! - `distance`: 最近镜像距离
//! - `histogram`: 直方图累加与归一化
//! - `smoothing`: 滑动平均 / 高斯平滑
//! - `calculator`: 流水线入口
//! - `export`: 数据导出
//! - `plot`: 图表生成
//!
//! ## 依赖关系
//! - 被 `commands/rdf.rs` 使用
//! - 使用 `models/`

pub mod calculator;
pub mod distance;
pub mod export;
pub mod histogram;
pub mod plot;
pub mod smoothing;
pub mod window;

pub use calculator::{Cutoff, RdfCalculator, RdfConfig, RdfResult};
pub use smoothing::Smoothing;
pub use window::FrameWindow;
