//! # RDF 图表生成
//!
//! 使用 `plotters` 绘制分面图：第一个面板为总 g(r)，其余每个物种对一个面板，
//! 两列排布。
//!
//! ## 依赖关系
//! - 被 `commands/rdf.rs` 调用
//! - 使用 `rdf/calculator.rs` 的 RdfResult 结构
//! - 使用 `plotters` 渲染图表

use crate::error::{LeoError, Result};
use crate::models::TypeMap;
use crate::rdf::RdfResult;

use plotters::prelude::*;
use std::path::Path;

/// 每行面板数
const COLUMNS: usize = 2;

fn plot_err<E: std::fmt::Debug>(e: E) -> LeoError {
    LeoError::PlotError(format!("{:?}", e))
}

/// 面板行数
pub fn panel_rows(result: &RdfResult) -> usize {
    let panels = 1 + result.partials.len();
    panels.div_ceil(COLUMNS)
}

/// 生成 RDF 图表，扩展名为 `.svg` 时输出 SVG，否则 PNG
pub fn generate_rdf_plot(
    result: &RdfResult,
    type_map: &TypeMap,
    output_path: &Path,
    width: u32,
    panel_height: u32,
) -> Result<()> {
    let rows = panel_rows(result);
    let size = (width, panel_height * rows as u32);

    let use_svg = output_path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("svg"))
        .unwrap_or(false);

    if use_svg {
        let root = SVGBackend::new(output_path, size).into_drawing_area();
        draw_panels(&root, result, type_map, rows)?;
        root.present().map_err(plot_err)?;
    } else {
        let root = BitMapBackend::new(output_path, size).into_drawing_area();
        draw_panels(&root, result, type_map, rows)?;
        root.present().map_err(plot_err)?;
    }
    Ok(())
}

fn draw_panels<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    result: &RdfResult,
    type_map: &TypeMap,
    rows: usize,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(plot_err)?;

    let mut curves: Vec<(String, &[f64])> = vec![("Total RDF".to_string(), &result.total)];
    curves.extend(
        result
            .partials
            .iter()
            .map(|p| (format!("g({})", type_map.pair_label(p.pair)), p.g.as_slice())),
    );

    let areas = root.split_evenly((rows, COLUMNS));
    for (area, (title, g)) in areas.iter().zip(curves) {
        draw_curve(area, &result.radii, g, &title, result.cutoff)?;
    }

    Ok(())
}

/// 绘制单个面板
fn draw_curve<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    radii: &[f64],
    g: &[f64],
    title: &str,
    x_max: f64,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let y_top = g
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    let y_max = if y_top > 0.0 { y_top * 1.1 } else { 1.0 };

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 22).into_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..x_max, 0.0..y_max)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("r (Å)")
        .y_desc("g(r)")
        .x_label_style(("sans-serif", 14))
        .y_label_style(("sans-serif", 14))
        .axis_desc_style(("sans-serif", 16))
        .draw()
        .map_err(plot_err)?;

    // 理想气体参考线 g = 1
    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(0.0, 1.0), (x_max, 1.0)],
            BLACK.mix(0.3).stroke_width(1),
        )))
        .map_err(plot_err)?;

    let line_color = RGBColor(0, 102, 204);
    chart
        .draw_series(LineSeries::new(
            radii.iter().zip(g).map(|(&r, &v)| (r, v)),
            line_color.stroke_width(2),
        ))
        .map_err(plot_err)?;

    Ok(())
}
