//! # 数据模型模块
//!
//! 定义晶格、帧、轨迹与类型映射。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `rdf/` 和 `commands/` 使用
//! - 子模块: structure, type_map

pub mod structure;
pub mod type_map;

pub use structure::{Frame, Lattice, Trajectory};
pub use type_map::{SpeciesPair, TypeMap};
