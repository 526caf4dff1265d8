//! # 进度条工具
//!
//! 封装 `indicatif`，用于逐帧累加直方图时显示进度。
//!
//! ## 依赖关系
//! - 被 `commands/rdf.rs` 使用
//! - 使用 `indicatif` crate

use indicatif::{ProgressBar, ProgressStyle};

const FRAME_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} frames ({eta}) {msg}";

/// 创建逐帧进度条
pub fn create_frame_bar(n_frames: usize, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(n_frames as u64);
    let style = ProgressStyle::with_template(FRAME_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_bar_length() {
        let pb = create_frame_bar(12, "accumulating");
        assert_eq!(pb.length(), Some(12));
        pb.set_position(12);
        pb.finish_and_clear();
        assert_eq!(pb.position(), 12);
    }
}
