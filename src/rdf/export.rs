//! # RDF 数据导出
//!
//! ## 支持格式
//! - TXT: `# r g_total g_A-B ...` 表头 + 每个 bin 一行，6 位小数，空格分隔
//! - CSV: 相同列，使用 `csv` 库写入
//!
//! ## 依赖关系
//! - 被 `commands/rdf.rs` 调用
//! - 使用 `rdf/calculator.rs` 的 RdfResult 结构
//! - 使用 `csv` 库写入 CSV 文件

use crate::error::{LeoError, Result};
use crate::models::TypeMap;
use crate::rdf::RdfResult;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// 列名：r, g_total, g_<A>-<B> ...
pub fn column_names(result: &RdfResult, type_map: &TypeMap) -> Vec<String> {
    let mut names = vec!["r".to_string(), "g_total".to_string()];
    names.extend(
        result
            .partials
            .iter()
            .map(|p| format!("g_{}", type_map.pair_label(p.pair))),
    );
    names
}

/// 第 `i` 个 bin 的全部数值，已格式化
fn row(result: &RdfResult, i: usize) -> Vec<String> {
    let mut values = vec![
        format!("{:.6}", result.radii[i]),
        format!("{:.6}", result.total[i]),
    ];
    values.extend(result.partials.iter().map(|p| format!("{:.6}", p.g[i])));
    values
}

/// 生成文本表格内容
pub fn format_table(result: &RdfResult, type_map: &TypeMap) -> String {
    let mut out = format!("# {}\n", column_names(result, type_map).join(" "));
    for i in 0..result.radii.len() {
        out.push_str(&row(result, i).join(" "));
        out.push('\n');
    }
    out
}

/// 写入表格，扩展名为 `.csv` 时写 CSV，否则写文本表格
pub fn write_table(result: &RdfResult, type_map: &TypeMap, output_path: &Path) -> Result<()> {
    let is_csv = output_path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    if is_csv {
        to_csv(result, type_map, output_path)
    } else {
        to_txt(result, type_map, output_path)
    }
}

/// 导出文本表格
pub fn to_txt(result: &RdfResult, type_map: &TypeMap, output_path: &Path) -> Result<()> {
    let write_err = |e| LeoError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    };

    let file = File::create(output_path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(format_table(result, type_map).as_bytes())
        .map_err(write_err)?;
    writer.flush().map_err(write_err)?;

    Ok(())
}

/// 导出 CSV
pub fn to_csv(result: &RdfResult, type_map: &TypeMap, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record(column_names(result, type_map))?;
    for i in 0..result.radii.len() {
        wtr.write_record(row(result, i))?;
    }

    wtr.flush().map_err(|e| LeoError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SpeciesPair;
    use crate::rdf::calculator::PartialRdf;

    fn sample() -> RdfResult {
        RdfResult {
            radii: vec![0.05, 0.15],
            total: vec![0.0, 1.25],
            partials: vec![
                PartialRdf {
                    pair: SpeciesPair::new(1, 1),
                    g: vec![0.0, 2.0],
                    empty: false,
                },
                PartialRdf {
                    pair: SpeciesPair::new(1, 2),
                    g: vec![0.0, 0.5],
                    empty: false,
                },
            ],
            frame_range: 0..1,
            cutoff: 0.2,
            n_atoms: 2,
            volume: 1000.0,
            half_min_width: 5.0,
        }
    }

    #[test]
    fn test_format_table() {
        let map: TypeMap = "1:Al,2:Sc".parse().unwrap();
        let table = format_table(&sample(), &map);

        let expected = "# r g_total g_Al-Al g_Al-Sc\n\
                        0.050000 0.000000 0.000000 0.000000\n\
                        0.150000 1.250000 2.000000 0.500000\n";
        assert_eq!(table, expected);
    }

    #[test]
    fn test_numeric_labels_without_type_map() {
        let names = column_names(&sample(), &TypeMap::new());
        assert_eq!(names, vec!["r", "g_total", "g_1-1", "g_1-2"]);
    }

    #[test]
    fn test_write_txt_and_csv() {
        let dir = tempfile::tempdir().unwrap();
        let map = TypeMap::new();

        let txt = dir.path().join("rdf.txt");
        write_table(&sample(), &map, &txt).unwrap();
        assert_eq!(
            std::fs::read_to_string(&txt).unwrap(),
            format_table(&sample(), &map)
        );

        let csv_path = dir.path().join("rdf.csv");
        write_table(&sample(), &map, &csv_path).unwrap();
        let content = std::fs::read_to_string(&csv_path).unwrap();
        assert!(content.starts_with("r,g_total,g_1-1,g_1-2\n"));
        assert_eq!(content.lines().count(), 3);
    }
}
