//! # VASP POSCAR / CONTCAR / XDATCAR 解析器
//!
//! 读取单个结构快照。XDATCAR 含多个构型时只取最后一个。
//!
//! ## 格式说明
//! ```text
//! Comment line (structure name)
//! 1.0                    # scaling factor
//! a1 a2 a3               # lattice vector a
//! b1 b2 b3               # lattice vector b
//! c1 c2 c3               # lattice vector c
//! Element1 Element2 ...  # element symbols (VASP 5+, optional)
//! n1 n2 ...              # number of atoms per element
//! Selective dynamics     # optional
//! Direct/Cartesian       # coordinate type (XDATCAR: "Direct configuration= N")
//! x1 y1 z1               # atom positions
//! ...
//! ```
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/structure.rs`

use crate::error::{LeoError, Result};
use crate::models::{Frame, Lattice, Trajectory};
use std::fs;
use std::path::Path;

const FORMAT: &str = "poscar";

/// 解析 POSCAR/CONTCAR/XDATCAR 文件
pub fn parse_poscar_file(path: &Path) -> Result<Trajectory> {
    let content = fs::read_to_string(path).map_err(|e| LeoError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_poscar_content(&content, &path.display().to_string())
}

/// 从字符串内容解析，`source` 仅用于错误信息
pub fn parse_poscar_content(content: &str, source: &str) -> Result<Trajectory> {
    let lines: Vec<&str> = content.lines().collect();
    let err = |idx: usize, reason: String| LeoError::format(FORMAT, source, idx + 1, reason);

    if lines.len() < 7 {
        return Err(err(lines.len().saturating_sub(1), "File too short".to_string()));
    }

    // Line 1: Scaling factor
    let scale: f64 = lines[1]
        .split_whitespace()
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| err(1, format!("Invalid scaling factor '{}'", lines[1].trim())))?;

    // Lines 2-4: Lattice vectors
    let mut matrix = [[0.0; 3]; 3];
    for (i, row) in matrix.iter_mut().enumerate() {
        let v = parse_vector(lines[2 + i]).ok_or_else(|| {
            err(2 + i, format!("Invalid lattice vector '{}'", lines[2 + i].trim()))
        })?;
        *row = [v[0] * scale, v[1] * scale, v[2] * scale];
    }
    let lattice = Lattice::from_vectors(matrix);
    if lattice.inverse().is_none() {
        return Err(err(2, "Lattice vectors are linearly dependent".to_string()));
    }

    // Line 5: Element symbols (VASP 5+) or atom counts (VASP 4)
    let (species, counts, count_line) = match parse_counts(lines[5]) {
        Some(counts) => (None, counts, 5),
        None => {
            let species: Vec<String> = lines[5].split_whitespace().map(str::to_string).collect();
            let counts = parse_counts(lines[6])
                .ok_or_else(|| err(6, format!("Invalid atom count line '{}'", lines[6].trim())))?;
            if counts.len() != species.len() {
                return Err(err(
                    6,
                    format!(
                        "{} element symbols but {} atom counts",
                        species.len(),
                        counts.len()
                    ),
                ));
            }
            (Some(species), counts, 6)
        }
    };

    let n_atoms = counts
        .iter()
        .try_fold(0usize, |acc, &c| acc.checked_add(c))
        .ok_or_else(|| err(count_line, "Atom count overflow".to_string()))?;
    if n_atoms == 0 {
        return Err(err(count_line, "Structure contains no atoms".to_string()));
    }

    // 最后一个坐标类型行（XDATCAR 含多个构型）
    let marker = lines
        .iter()
        .enumerate()
        .skip(count_line + 1)
        .filter(|(_, l)| {
            let l = l.trim().to_lowercase();
            l.starts_with("direct") || l.starts_with("cart")
        })
        .map(|(i, _)| i)
        .last()
        .ok_or_else(|| err(count_line + 1, "Missing Direct/Cartesian line".to_string()))?;

    let is_direct = lines[marker].trim().to_lowercase().starts_with("direct");

    // Atom positions
    let mut positions = Vec::with_capacity(n_atoms.min(lines.len()));
    for j in 0..n_atoms {
        let idx = marker + 1 + j;
        let line = lines.get(idx).ok_or_else(|| {
            err(
                idx.min(lines.len()),
                format!("Expected {} coordinate rows, found {}", n_atoms, j),
            )
        })?;
        let v = parse_vector(line)
            .ok_or_else(|| err(idx, format!("Invalid coordinate row '{}'", line.trim())))?;

        let position = if is_direct {
            lattice.to_cartesian(v)
        } else {
            [v[0] * scale, v[1] * scale, v[2] * scale]
        };
        positions.push(position);
    }

    let types: Vec<u32> = counts
        .iter()
        .enumerate()
        .flat_map(|(i, &count)| std::iter::repeat(i as u32 + 1).take(count))
        .collect();

    let trajectory =
        Trajectory::new(vec![Frame::new(positions, types, lattice)], FORMAT).with_source(source);
    Ok(match species {
        Some(species) => trajectory.with_species(species),
        None => trajectory,
    })
}

/// 读取一行的前三个浮点数（忽略 selective dynamics 的 T/F 标记）
fn parse_vector(line: &str) -> Option<[f64; 3]> {
    let mut it = line.split_whitespace().map(|s| s.parse::<f64>());
    let x = it.next()?.ok()?;
    let y = it.next()?.ok()?;
    let z = it.next()?.ok()?;
    Some([x, y, z])
}

/// 整数行；任一字段不是整数即返回 None
fn parse_counts(line: &str) -> Option<Vec<usize>> {
    let counts: Vec<usize> = line
        .split_whitespace()
        .map(|s| s.parse().ok())
        .collect::<Option<_>>()?;
    if counts.is_empty() {
        None
    } else {
        Some(counts)
    }
}
