//! # LAMMPS dump 轨迹解析器
//!
//! 读取文本格式 dump 文件中的全部帧。
//!
//! ## 格式说明
//! ```text
//! ITEM: TIMESTEP
//! 1000
//! ITEM: NUMBER OF ATOMS
//! 64
//! ITEM: BOX BOUNDS pp pp pp        # 三角盒子: "xy xz yz pp pp pp"
//! xlo xhi [xy]
//! ylo yhi [xz]
//! zlo zhi [yz]
//! ITEM: ATOMS id type x y z ...
//! 1 1 0.0 0.0 0.0 ...
//! ...
//! ```
//!
//! 倾斜因子被读取但忽略，盒子按正交处理。文件末尾正在写入的
//! 不完整帧会被丢弃而不是报错，便于查看运行中的模拟。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/structure.rs`

use crate::error::{LeoError, Result};
use crate::models::{Frame, Lattice, Trajectory};
use std::fs;
use std::path::Path;

const FORMAT: &str = "lammps-dump";

/// 原子坐标列的种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionKind {
    /// x y z
    Wrapped,
    /// xu yu zu
    Unwrapped,
    /// xs ys zs（相对盒长的分数坐标）
    Scaled,
}

/// `ITEM: ATOMS` 表头解析后的固定列布局
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomColumns {
    /// 表头声明的列数
    pub n_columns: usize,
    pub type_col: usize,
    pub position_cols: [usize; 3],
    pub kind: PositionKind,
}

impl AtomColumns {
    /// 从 `ITEM: ATOMS ...` 行建立列布局，缺少必需列时返回原因
    pub fn from_header(line: &str) -> std::result::Result<Self, String> {
        let names: Vec<&str> = line.split_whitespace().skip(2).collect();
        let find = |name: &str| names.iter().position(|&n| n == name);

        let type_col = find("type").ok_or_else(|| "Missing 'type' column".to_string())?;

        let candidates = [
            (["x", "y", "z"], PositionKind::Wrapped),
            (["xu", "yu", "zu"], PositionKind::Unwrapped),
            (["xs", "ys", "zs"], PositionKind::Scaled),
        ];

        for (cols, kind) in candidates {
            if let (Some(x), Some(y), Some(z)) = (find(cols[0]), find(cols[1]), find(cols[2])) {
                return Ok(AtomColumns {
                    n_columns: names.len(),
                    type_col,
                    position_cols: [x, y, z],
                    kind,
                });
            }
        }

        Err("Missing position columns (x y z, xu yu zu or xs ys zs)".to_string())
    }
}

/// 单个 dump 块的解析结果
enum Block {
    Complete { frame: Frame, next: usize },
    Incomplete,
}

/// 解析 LAMMPS dump 文件
pub fn parse_dump_file(path: &Path) -> Result<Trajectory> {
    let content = fs::read_to_string(path).map_err(|e| LeoError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_dump_content(&content, &path.display().to_string())
}

/// 从字符串内容解析全部帧，`source` 仅用于错误信息
pub fn parse_dump_content(content: &str, source: &str) -> Result<Trajectory> {
    let lines: Vec<&str> = content.lines().collect();
    let mut frames = Vec::new();
    let mut truncated = false;

    let mut i = 0;
    while i < lines.len() {
        if !lines[i].starts_with("ITEM: TIMESTEP") {
            i += 1;
            continue;
        }

        match parse_block(&lines, i, source)? {
            Block::Complete { frame, next } => {
                frames.push(frame);
                i = next;
            }
            Block::Incomplete => {
                truncated = true;
                break;
            }
        }
    }

    let mut trajectory = Trajectory::new(frames, FORMAT).with_source(source);
    trajectory.truncated = truncated;
    Ok(trajectory)
}

/// 解析从 `start`（`ITEM: TIMESTEP` 行）开始的一个块
fn parse_block(lines: &[&str], start: usize, source: &str) -> Result<Block> {
    let err = |idx: usize, reason: String| LeoError::format(FORMAT, source, idx + 1, reason);

    macro_rules! line_or_incomplete {
        ($idx:expr) => {
            match lines.get($idx) {
                Some(line) => *line,
                None => return Ok(Block::Incomplete),
            }
        };
    }

    // TIMESTEP
    let step_line = line_or_incomplete!(start + 1);
    let timestep: u64 = step_line
        .trim()
        .parse()
        .map_err(|_| err(start + 1, format!("Invalid timestep '{}'", step_line.trim())))?;

    // NUMBER OF ATOMS
    let header = line_or_incomplete!(start + 2);
    if !header.starts_with("ITEM: NUMBER OF ATOMS") {
        return Err(err(start + 2, "Missing 'ITEM: NUMBER OF ATOMS'".to_string()));
    }
    let count_line = line_or_incomplete!(start + 3);
    let n_atoms: usize = count_line
        .trim()
        .parse()
        .map_err(|_| err(start + 3, format!("Invalid atom count '{}'", count_line.trim())))?;

    // BOX BOUNDS
    let header = line_or_incomplete!(start + 4);
    if !header.starts_with("ITEM: BOX BOUNDS") {
        return Err(err(start + 4, "Missing 'ITEM: BOX BOUNDS'".to_string()));
    }

    let mut lo = [0.0; 3];
    let mut len = [0.0; 3];
    for dim in 0..3 {
        let idx = start + 5 + dim;
        let line = line_or_incomplete!(idx);
        let parts: Vec<f64> = line
            .split_whitespace()
            .map(|s| s.parse::<f64>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| err(idx, format!("Invalid box bounds '{}'", line.trim())))?;

        // lo hi 或 lo hi tilt
        if parts.len() != 2 && parts.len() != 3 {
            return Err(err(idx, format!("BOX line format error: '{}'", line.trim())));
        }
        if parts[1] <= parts[0] {
            return Err(err(idx, format!("Non-positive box length: '{}'", line.trim())));
        }
        lo[dim] = parts[0];
        len[dim] = parts[1] - parts[0];
    }
    let lattice = Lattice::orthogonal(len[0], len[1], len[2]);

    // ATOMS
    let atoms_idx = start + 8;
    let header = line_or_incomplete!(atoms_idx);
    if !header.starts_with("ITEM: ATOMS") {
        return Err(err(atoms_idx, "Missing 'ITEM: ATOMS'".to_string()));
    }
    let columns = AtomColumns::from_header(header).map_err(|reason| err(atoms_idx, reason))?;

    // 行数上限，不信任文件声明的原子数
    let capacity = n_atoms.min(lines.len().saturating_sub(atoms_idx + 1));
    let mut positions = Vec::with_capacity(capacity);
    let mut types = Vec::with_capacity(capacity);

    for k in 0..n_atoms {
        let idx = atoms_idx + 1 + k;
        let line = line_or_incomplete!(idx);
        let tokens: Vec<&str> = line.split_whitespace().collect();

        // 列数不符：正在写入的行，截断到上一完整帧
        if tokens.len() != columns.n_columns {
            return Ok(Block::Incomplete);
        }

        let atom_type: u32 = tokens[columns.type_col]
            .parse()
            .map_err(|_| err(idx, format!("Invalid atom type '{}'", tokens[columns.type_col])))?;

        let mut p = [0.0; 3];
        for (dim, &col) in columns.position_cols.iter().enumerate() {
            let value: f64 = tokens[col]
                .parse()
                .map_err(|_| err(idx, format!("Invalid coordinate '{}'", tokens[col])))?;
            p[dim] = match columns.kind {
                PositionKind::Wrapped | PositionKind::Unwrapped => value - lo[dim],
                PositionKind::Scaled => value * len[dim],
            };
        }

        positions.push(p);
        types.push(atom_type);
    }

    Ok(Block::Complete {
        frame: Frame::new(positions, types, lattice).with_timestep(timestep),
        next: atoms_idx + 1 + n_atoms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(step: u64, header: &str, bounds: &[&str], rows: &[&str]) -> String {
        let mut s = format!(
            "ITEM: TIMESTEP\n{}\nITEM: NUMBER OF ATOMS\n{}\n{}\n",
            step,
            rows.len(),
            header
        );
        for b in bounds {
            s.push_str(b);
            s.push('\n');
        }
        s.push_str("ITEM: ATOMS id type x y z vx\n");
        for r in rows {
            s.push_str(r);
            s.push('\n');
        }
        s
    }

    fn simple_block(step: u64) -> String {
        block(
            step,
            "ITEM: BOX BOUNDS pp pp pp",
            &["-5.0 5.0", "0.0 10.0", "0.0 10.0"],
            &["1 1 -5.0 0.0 0.0 0.1", "2 2 0.0 1.0 2.0 0.2"],
        )
    }

    #[test]
    fn test_parse_multiple_frames() {
        let content = format!("{}{}{}", simple_block(0), simple_block(100), simple_block(200));
        let traj = parse_dump_content(&content, "dump").unwrap();

        assert_eq!(traj.len(), 3);
        assert!(!traj.truncated);
        assert_eq!(traj.frames[2].timestep, Some(200));

        let frame = &traj.frames[0];
        assert_eq!(frame.types, vec![1, 2]);
        // 平移到盒子原点
        assert_eq!(frame.positions[0], [0.0, 0.0, 0.0]);
        assert_eq!(frame.positions[1], [5.0, 1.0, 2.0]);
        assert!((frame.volume() - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_tilt_is_accepted_and_ignored() {
        let content = block(
            0,
            "ITEM: BOX BOUNDS xy xz yz pp pp pp",
            &["0.0 10.0 0.5", "0.0 10.0 0.0", "0.0 10.0 0.0"],
            &["1 1 1.0 1.0 1.0 0.0"],
        );
        let traj = parse_dump_content(&content, "dump").unwrap();
        assert_eq!(traj.frames[0].lattice, Lattice::orthogonal(10.0, 10.0, 10.0));
    }

    #[test]
    fn test_truncated_trailing_block_is_dropped() {
        let mut content = format!("{}{}", simple_block(0), simple_block(100));
        content.push_str("ITEM: TIMESTEP\n200\nITEM: NUMBER OF ATOMS\n2\nITEM: BOX BOUNDS pp pp pp\n");
        content.push_str("-5.0 5.0\n0.0 10.0\n0.0 10.0\nITEM: ATOMS id type x y z vx\n");
        content.push_str("1 1 0.0 0.0 0.0 0.1\n2 2 0.0");

        let traj = parse_dump_content(&content, "dump").unwrap();
        assert_eq!(traj.len(), 2);
        assert!(traj.truncated);
    }

    #[test]
    fn test_file_ending_mid_header_is_dropped() {
        let content = format!("{}ITEM: TIMESTEP\n100\nITEM: NUMBER OF ATOMS\n", simple_block(0));
        let traj = parse_dump_content(&content, "dump").unwrap();
        assert_eq!(traj.len(), 1);
        assert!(traj.truncated);
    }

    #[test]
    fn test_missing_section_header_is_format_error() {
        let content = "ITEM: TIMESTEP\n0\nITEM: NUMBER OF ATOMS\n1\nITEM: BOX\n0 1\n0 1\n0 1\n";
        match parse_dump_content(content, "dump") {
            Err(LeoError::FormatError { line, reason, .. }) => {
                assert_eq!(line, 5);
                assert!(reason.contains("BOX BOUNDS"));
            }
            other => panic!("expected FormatError, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_box_line_is_format_error() {
        let content = block(
            0,
            "ITEM: BOX BOUNDS pp pp pp",
            &["0.0 10.0 0.0 1.0", "0.0 10.0", "0.0 10.0"],
            &["1 1 0.0 0.0 0.0 0.0"],
        );
        assert!(matches!(
            parse_dump_content(&content, "dump"),
            Err(LeoError::FormatError { .. })
        ));
    }

    #[test]
    fn test_missing_type_column_is_format_error() {
        let content = "ITEM: TIMESTEP\n0\nITEM: NUMBER OF ATOMS\n1\nITEM: BOX BOUNDS pp pp pp\n\
                       0 1\n0 1\n0 1\nITEM: ATOMS id x y z\n1 0 0 0\n";
        match parse_dump_content(content, "dump") {
            Err(LeoError::FormatError { reason, .. }) => assert!(reason.contains("type")),
            other => panic!("expected FormatError, got {:?}", other),
        }
    }

    #[test]
    fn test_leading_garbage_is_skipped() {
        let content = format!("LAMMPS run log header\n\n{}", simple_block(0));
        let traj = parse_dump_content(&content, "dump").unwrap();
        assert_eq!(traj.len(), 1);
    }

    #[test]
    fn test_column_lookup_is_positional_and_case_sensitive() {
        let cols = AtomColumns::from_header("ITEM: ATOMS z y x type id").unwrap();
        assert_eq!(cols.type_col, 3);
        assert_eq!(cols.position_cols, [2, 1, 0]);
        assert_eq!(cols.kind, PositionKind::Wrapped);

        assert!(AtomColumns::from_header("ITEM: ATOMS id Type x y z").is_err());
    }

    #[test]
    fn test_scaled_columns() {
        let content = "ITEM: TIMESTEP\n0\nITEM: NUMBER OF ATOMS\n1\nITEM: BOX BOUNDS pp pp pp\n\
                       -2 2\n0 8\n0 8\nITEM: ATOMS id type xs ys zs\n1 1 0.5 0.25 1.0\n";
        let traj = parse_dump_content(content, "dump").unwrap();
        assert_eq!(traj.frames[0].positions[0], [2.0, 2.0, 8.0]);
    }

    #[test]
    fn test_unwrapped_columns_preferred_after_wrapped() {
        let cols = AtomColumns::from_header("ITEM: ATOMS id type xu yu zu xs ys zs").unwrap();
        assert_eq!(cols.kind, PositionKind::Unwrapped);
        assert_eq!(cols.position_cols, [2, 3, 4]);
    }

    #[test]
    fn test_huge_atom_count_is_treated_as_incomplete() {
        let content = "ITEM: TIMESTEP\n0\nITEM: NUMBER OF ATOMS\n18446744073709551615\n\
                       ITEM: BOX BOUNDS pp pp pp\n0.0 10.0\n0.0 10.0\n0.0 10.0\n\
                       ITEM: ATOMS id type x y z\n1 1 0.0 0.0 0.0\n";
        let traj = parse_dump_content(content, "dump").unwrap();
        assert!(traj.is_empty());
        assert!(traj.truncated);
    }
}
