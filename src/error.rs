//! # 统一错误处理模块
//!
//! 定义 Leo 的所有错误类型，使用 `thiserror` 派生。
//!
//! 两类可恢复情况不在此处：空的物种对（输出全零曲线）与
//! dump 文件末尾不完整的帧（直接丢弃），二者都只打印警告。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// Leo 统一错误类型
#[derive(Error, Debug)]
pub enum LeoError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Malformed {format} file: {path} (line {line})\nReason: {reason}")]
    FormatError {
        format: String,
        path: String,
        line: usize,
        reason: String,
    },

    #[error("No complete frame found in: {path}")]
    EmptyTrajectory { path: String },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid range: {0}")]
    RangeError(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // 输出错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Failed to render figure: {0}")]
    PlotError(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, LeoError>;

impl LeoError {
    /// 构造格式错误（行号从 1 开始）
    pub fn format(format: &str, path: &str, line: usize, reason: impl Into<String>) -> Self {
        LeoError::FormatError {
            format: format.to_string(),
            path: path.to_string(),
            line,
            reason: reason.into(),
        }
    }
}
