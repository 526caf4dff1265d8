//! # rdf 子命令实现
//!
//! 读取轨迹 → 选择帧窗口 → 计算总 / 偏 g(r) → 写表格与图。
//!
//! ## 依赖关系
//! - 使用 `cli/rdf.rs` 定义的 RdfArgs
//! - 使用 `parsers/` 读取轨迹
//! - 使用 `rdf/` 模块进行计算与输出

use crate::cli::rdf::{RdfArgs, SmoothMode};
use crate::error::{LeoError, Result};
use crate::models::{Trajectory, TypeMap};
use crate::parsers;
use crate::rdf::{self, Cutoff, FrameWindow, RdfCalculator, RdfConfig, RdfResult, Smoothing};
use crate::utils::{output, progress};

/// 执行 RDF 计算
pub fn execute(args: RdfArgs) -> Result<()> {
    output::print_header("Radial Distribution Function");

    let config = build_config(&args)?;
    config.validate()?;

    let format = args
        .fmt
        .unwrap_or_else(|| parsers::guess_format(&args.input));
    let trajectory = parsers::parse_trajectory_file(&args.input, format)?;

    output::print_success(&format!(
        "Loaded {} frame(s) from '{}' ({})",
        trajectory.len(),
        args.input.display(),
        format
    ));
    if trajectory.truncated {
        output::print_warning("Incomplete trailing frame skipped");
    }

    let type_map = resolve_type_map(args.type_map.as_deref(), &trajectory)?;

    let calculator = RdfCalculator::new(config);
    let result = compute(&calculator, &trajectory)?;

    report(&result, &type_map, trajectory.len(), calculator.config());

    rdf::export::write_table(&result, &type_map, &args.txt)?;
    output::print_saved("Table", &args.txt);

    if !args.no_plot {
        rdf::plot::generate_rdf_plot(&result, &type_map, &args.out, args.width, args.panel_height)?;
        output::print_saved("Figure", &args.out);
    }

    print_peak_table(&result, &type_map);
    Ok(())
}

/// 由命令行参数构造计算配置
fn build_config(args: &RdfArgs) -> Result<RdfConfig> {
    let window = match args.avg_frac.as_slice() {
        [start, end] => FrameWindow::new(*start, *end),
        other => {
            return Err(LeoError::InvalidArgument(format!(
                "--avg-frac expects two values, got {}",
                other.len()
            )))
        }
    };

    let cutoff = if args.auto_cutoff {
        Cutoff::HalfShortestEdge
    } else {
        Cutoff::Fixed(args.cutoff)
    };

    let smoothing = match args.smooth {
        SmoothMode::Off => Smoothing::Off,
        SmoothMode::Moving => Smoothing::Moving { width: args.window },
        SmoothMode::Gaussian => Smoothing::Gaussian { sigma: args.sigma },
    };

    Ok(RdfConfig {
        cutoff,
        bins: args.bins,
        window,
        smoothing,
    })
}

/// `--type-map` 优先，未覆盖的类型使用文件中的元素行
fn resolve_type_map(mapping: Option<&str>, trajectory: &Trajectory) -> Result<TypeMap> {
    let from_file = trajectory
        .species
        .as_deref()
        .map(TypeMap::from_species)
        .unwrap_or_default();

    match mapping {
        Some(s) => Ok(s.parse::<TypeMap>()?.or_fallback(&from_file)),
        None => Ok(from_file),
    }
}

/// 带进度条的计算
fn compute(calculator: &RdfCalculator, trajectory: &Trajectory) -> Result<RdfResult> {
    if trajectory.is_empty() {
        return Err(LeoError::EmptyTrajectory {
            path: trajectory.source.clone(),
        });
    }

    let range = calculator.config().window.select(trajectory.len())?;
    let pb = progress::create_frame_bar(range.len(), "accumulating");

    let result = calculator.compute_with_progress(trajectory, |done| pb.set_position(done as u64));
    pb.finish_and_clear();
    result
}

/// 打印窗口、截断半径与警告
fn report(result: &RdfResult, type_map: &TypeMap, n_frames: usize, config: &RdfConfig) {
    output::print_info(&format!(
        "Averaged frames {}..{} ({} of {})",
        result.frame_range.start,
        result.frame_range.end,
        result.frames_used(),
        n_frames
    ));
    output::print_info(&format!(
        "{} atoms, V = {:.3} Å³, cutoff = {:.3} Å, {} bins, smoothing: {}",
        result.n_atoms,
        result.volume,
        result.cutoff,
        config.bins,
        config.smoothing
    ));

    if result.cutoff_exceeds_minimum_image() {
        output::print_warning(&format!(
            "Cutoff {:.3} Å exceeds half the minimum cell width ({:.3} Å); g(r) beyond it is not reliable",
            result.cutoff, result.half_min_width
        ));
    }

    for partial in result.partials.iter().filter(|p| p.empty) {
        output::print_warning(&format!(
            "No {} pairs within the cutoff; g({}) is zero",
            type_map.pair_label(partial.pair),
            type_map.pair_label(partial.pair)
        ));
    }
}

/// 打印第一峰表格
fn print_peak_table(result: &RdfResult, type_map: &TypeMap) {
    use tabled::{Table, Tabled};

    #[derive(Tabled)]
    struct PeakRow {
        #[tabled(rename = "Pair")]
        pair: String,
        #[tabled(rename = "r_max (Å)")]
        r_max: String,
        #[tabled(rename = "g_max")]
        g_max: String,
    }

    let curves = std::iter::once(("total".to_string(), &result.total)).chain(
        result
            .partials
            .iter()
            .map(|p| (type_map.pair_label(p.pair), &p.g)),
    );

    let rows: Vec<PeakRow> = curves
        .map(|(pair, g)| match RdfResult::peak(&result.radii, g) {
            Some((r, v)) if v > 0.0 => PeakRow {
                pair,
                r_max: format!("{:.3}", r),
                g_max: format!("{:.3}", v),
            },
            _ => PeakRow {
                pair,
                r_max: "-".to_string(),
                g_max: "0".to_string(),
            },
        })
        .collect();

    output::print_header("Highest Peaks");
    println!("{}", Table::new(&rows));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::path::Path;

    fn args(list: &[&str]) -> RdfArgs {
        match Cli::try_parse_from(list).unwrap().command {
            Commands::Rdf(args) => args,
        }
    }

    /// 3 帧、每帧 10 个原子（类型 1 与 2 各 5 个）、10 Å 立方盒子
    fn write_dump(path: &Path) {
        let mut s = String::new();
        for frame in 0..3 {
            s.push_str(&format!(
                "ITEM: TIMESTEP\n{}\nITEM: NUMBER OF ATOMS\n10\n",
                frame * 100
            ));
            s.push_str("ITEM: BOX BOUNDS pp pp pp\n0.0 10.0\n0.0 10.0\n0.0 10.0\n");
            s.push_str("ITEM: ATOMS id type x y z\n");
            for i in 0..10 {
                let t = if i < 5 { 1 } else { 2 };
                let x = (i as f64 * 1.7 + frame as f64 * 0.3) % 10.0;
                let y = (i as f64 * 2.9 + 0.5) % 10.0;
                let z = (i as f64 * 3.7 + frame as f64 * 0.1) % 10.0;
                s.push_str(&format!("{} {} {:.4} {:.4} {:.4}\n", i + 1, t, x, y, z));
            }
        }
        std::fs::write(path, s).unwrap();
    }

    #[test]
    fn test_dump_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let dump = dir.path().join("wrapped.lammpstrj");
        let txt = dir.path().join("rdf.txt");
        write_dump(&dump);

        execute(args(&[
            "leo",
            "rdf",
            dump.to_str().unwrap(),
            "--cutoff",
            "5",
            "--bins",
            "50",
            "--avg-frac",
            "0",
            "1",
            "--type-map",
            "1:Cu,2:Se",
            "--txt",
            txt.to_str().unwrap(),
            "--no-plot",
        ]))
        .unwrap();

        let table = std::fs::read_to_string(&txt).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 51);
        assert_eq!(lines[0], "# r g_total g_Cu-Cu g_Cu-Se g_Se-Se");
        assert!(lines[1].starts_with("0.050000 "));
        assert!(lines[1..].iter().all(|l| l.split(' ').count() == 5));
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let dir = tempfile::tempdir().unwrap();
        let dump = dir.path().join("traj.dump");
        write_dump(&dump);

        let run = |name: &str| {
            let txt = dir.path().join(name);
            execute(args(&[
                "leo",
                "rdf",
                dump.to_str().unwrap(),
                "--smooth",
                "gaussian",
                "--txt",
                txt.to_str().unwrap(),
                "--no-plot",
            ]))
            .unwrap();
            std::fs::read(txt).unwrap()
        };

        assert_eq!(run("a.txt"), run("b.txt"));
    }

    #[test]
    fn test_csv_table_output() {
        let dir = tempfile::tempdir().unwrap();
        let dump = dir.path().join("traj.dump");
        let csv = dir.path().join("rdf.csv");
        write_dump(&dump);

        execute(args(&[
            "leo",
            "rdf",
            dump.to_str().unwrap(),
            "--cutoff",
            "4",
            "--bins",
            "40",
            "--txt",
            csv.to_str().unwrap(),
            "--no-plot",
        ]))
        .unwrap();

        let content = std::fs::read_to_string(&csv).unwrap();
        assert!(content.starts_with("r,g_total,g_1-1,g_1-2,g_2-2\n"));
        assert_eq!(content.lines().count(), 41);
    }

    #[test]
    fn test_missing_input_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.dump");
        let err = execute(args(&["leo", "rdf", missing.to_str().unwrap(), "--no-plot"])).unwrap_err();
        assert!(matches!(err, LeoError::FileNotFound { .. }));
    }

    #[test]
    fn test_window_beyond_trajectory_is_range_error() {
        let dir = tempfile::tempdir().unwrap();
        let dump = dir.path().join("traj.dump");
        write_dump(&dump);

        let err = execute(args(&[
            "leo",
            "rdf",
            dump.to_str().unwrap(),
            "--avg-frac",
            "0.5",
            "1.5",
            "--txt",
            dir.path().join("x.txt").to_str().unwrap(),
            "--no-plot",
        ]))
        .unwrap_err();
        assert!(matches!(err, LeoError::RangeError(_)));
    }

    #[test]
    fn test_type_map_falls_back_to_file_species() {
        let frame = crate::models::Frame::new(
            vec![[0.0; 3]],
            vec![1],
            crate::models::Lattice::orthogonal(5.0, 5.0, 5.0),
        );
        let traj = Trajectory::new(vec![frame], "poscar")
            .with_species(vec!["Al".to_string(), "N".to_string()]);

        let map = resolve_type_map(Some("2:Sc"), &traj).unwrap();
        assert_eq!(map.label(1), "Al");
        assert_eq!(map.label(2), "Sc");

        assert!(resolve_type_map(Some("1=Al"), &traj).is_err());
    }

    #[test]
    fn test_dump_truncated_in_first_block_is_empty_trajectory() {
        let dir = tempfile::tempdir().unwrap();
        let dump = dir.path().join("cut.dump");
        std::fs::write(&dump, "ITEM: TIMESTEP\n0\nITEM: NUMBER OF ATOMS\n").unwrap();

        let err = execute(args(&[
            "leo",
            "rdf",
            dump.to_str().unwrap(),
            "--txt",
            dir.path().join("x.txt").to_str().unwrap(),
            "--no-plot",
        ]))
        .unwrap_err();
        assert!(matches!(err, LeoError::EmptyTrajectory { .. }));
        assert!(!dir.path().join("x.txt").exists());
    }

    #[test]
    fn test_oversized_gaussian_sigma_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let dump = dir.path().join("traj.dump");
        write_dump(&dump);

        let err = execute(args(&[
            "leo",
            "rdf",
            dump.to_str().unwrap(),
            "--smooth",
            "gaussian",
            "--sigma",
            "1e18",
            "--no-plot",
        ]))
        .unwrap_err();
        assert!(matches!(err, LeoError::InvalidArgument(_)));
    }
}
