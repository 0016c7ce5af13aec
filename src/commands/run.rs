//! # run 命令实现
//!
//! 完整的 EOS 工作流：生成缩放变体 → 并行提交模拟作业 →
//! 收集结果 → 写出数据文件 → 拟合 → 报告。
//!
//! ## 功能
//! - 加载四个 JSON 配置文档并在提交前完成全部校验
//! - 背靠背提交全部作业（提交之间互不等待）
//! - 按标签收集，单个失败不影响其余
//! - 成功点数达标时拟合并输出参数表
//!
//! ## 依赖关系
//! - 使用 `cli/run.rs` 定义的参数
//! - 使用 `pipeline/`, `engine/`, `eos/`
//! - 使用 `utils/output.rs`, `utils/progress.rs`, `utils/walltime.rs`

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::cli::run::{EngineKind, RunArgs};
use crate::commands::fit::print_fit_report;
use crate::engine::command::CommandEngine;
use crate::engine::synthetic::SyntheticEngine;
use crate::engine::{SimulationConfig, SimulationEngine};
use crate::eos::{export, fitter, plot, EnergyPoint};
use crate::error::{EoskitError, Result};
use crate::models::{Atom, Coords, Crystal, Lattice};
use crate::parsers;
use crate::pipeline::{build_variants, collect_results, default_labels, JobDispatcher};
use crate::utils::{output, progress, walltime};

/// 执行 run 命令
pub fn execute(args: RunArgs) -> Result<()> {
    output::print_header("Equation of State Workflow");

    // 所有配置与参数校验都发生在提交任何作业之前
    let walltime_seconds = walltime::parse_walltime(&args.walltime)?;
    let kpoints = [args.kpoints[0], args.kpoints[1], args.kpoints[2]];
    let config = SimulationConfig::load(
        &args.config_dir,
        &args.codename,
        &args.pseudo_family,
        kpoints,
        args.max_scf_iterations,
        walltime_seconds,
    )?;

    let factors = parse_scale_factors(&args.scale_factors)?;
    let reference = resolve_structure(&args.structure)?;

    output::print_field("Codename", &config.codename);
    output::print_field("Pseudo family", &config.pseudo_family);
    output::print_field(
        "K-point mesh",
        &format!("{}x{}x{}", kpoints[0], kpoints[1], kpoints[2]),
    );
    let (a, _, _, _, _, _) = reference.lattice.parameters();
    output::print_field(
        "Structure",
        &format!(
            "{} (a = {:.4} Å, V = {:.3} Å³)",
            reference.formula(),
            a,
            reference.volume()
        ),
    );
    output::print_field(
        "Scale factors",
        &factors
            .iter()
            .map(|f| format!("{}", f))
            .collect::<Vec<_>>()
            .join(", "),
    );
    println!();

    // 变体生成（廉价步骤，顺序执行）
    let labeled: Vec<(String, f64)> = default_labels(factors.len())
        .into_iter()
        .zip(factors.iter().copied())
        .collect();
    let variants = build_variants(&reference, &labeled)?;

    // 扇出：背靠背提交，提交失败只影响对应标签
    let engine = build_engine(&args, &reference)?;
    output::print_info(&format!("Engine: {}", engine.name()));

    let dispatcher = JobDispatcher::new(engine, args.jobs)?;
    let mut handles = BTreeMap::new();
    let mut rejected: Vec<(String, EoskitError)> = Vec::new();

    let pb = progress::create_progress_bar(variants.len() as u64, "Submitting jobs");
    for (label, structure) in &variants {
        match dispatcher.submit(label, structure, &config) {
            Ok(handle) => {
                handles.insert(label.clone(), handle);
            }
            Err(e) => {
                rejected.push((label.clone(), e));
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    output::print_info(&format!(
        "Submitted {} jobs ({} rejected at submission)",
        handles.len(),
        rejected.len()
    ));

    // 扇入：唯一的阻塞点
    let spinner = progress::create_spinner(&format!("Waiting for {} jobs...", handles.len()));
    let results = collect_results(handles);
    spinner.finish_and_clear();

    // 按标签汇报失败，成功点继续走拟合
    let mut points: Vec<EnergyPoint> = Vec::new();
    let mut failed = rejected;

    for (label, outcome) in results {
        match outcome {
            Ok(point) => points.push(point),
            Err(e) => failed.push((label, e)),
        }
    }

    if !failed.is_empty() {
        output::print_separator();
        for (label, error) in &failed {
            output::print_label_failure(label, &error.to_string());
        }
    }

    output::print_separator();
    output::print_info(&format!(
        "Collected {} energy points ({} failed labels)",
        points.len(),
        failed.len()
    ));

    if points.is_empty() {
        return Err(EoskitError::InsufficientData { needed: 4, got: 0 });
    }

    export::write_eos_csv(&points, &args.output)?;
    output::print_success(&format!("EOS data written to '{}'", args.output.display()));

    if args.no_fit {
        output::print_done("Collection complete (fit skipped)");
        return Ok(());
    }

    if points.len() < 4 {
        output::print_warning(&format!(
            "Only {} successful points; the EOS fit needs at least 4",
            points.len()
        ));
    }

    // 拟合阶段的失败不影响已写出的原始数据
    let fit = fitter::fit(&points)?;
    print_fit_report(&fit, &points);

    if let Some(plot_path) = &args.plot {
        let use_svg = plot_path.extension().and_then(|e| e.to_str()) == Some("svg");
        plot::generate_eos_plot(
            &points,
            Some(&fit),
            plot_path,
            &format!("Equation of State: {}", reference.formula()),
            1024,
            768,
            use_svg,
        )?;
        output::print_success(&format!("Plot written to '{}'", plot_path.display()));
    }

    output::print_done(&format!(
        "EOS workflow complete: V0 = {:.4} Å³, B0 = {:.4} {}/Å³",
        fit.v0,
        fit.b0,
        points[0].energy_unit
    ));

    Ok(())
}

/// 解析逗号分隔的缩放因子列表
fn parse_scale_factors(expr: &str) -> Result<Vec<f64>> {
    let factors: Vec<f64> = expr
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .map_err(|_| EoskitError::InvalidArgument(format!("invalid scale factor '{}'", s)))
        })
        .collect::<Result<_>>()?;

    if factors.is_empty() {
        return Err(EoskitError::InvalidArgument(
            "at least one scale factor is required".to_string(),
        ));
    }

    Ok(factors)
}

/// 解析参考结构：内置名称或 POSCAR 文件路径
fn resolve_structure(spec: &str) -> Result<Crystal> {
    if spec.eq_ignore_ascii_case("si") {
        return Ok(silicon_diamond());
    }

    let path = Path::new(spec);
    if path.exists() {
        return parsers::parse_structure_file(path);
    }

    Err(EoskitError::FileNotFound {
        path: spec.to_string(),
    })
}

/// 内置硅金刚石结构（fcc 原胞，双原子基）
fn silicon_diamond() -> Crystal {
    let alat = 5.430; // angstrom
    let lattice = Lattice::from_vectors([
        [0.5 * alat, 0.5 * alat, 0.0],
        [0.0, 0.5 * alat, 0.5 * alat],
        [0.5 * alat, 0.0, 0.5 * alat],
    ]);

    Crystal::new(
        "Si",
        lattice,
        vec![
            Atom::new("Si", [0.0, 0.0, 0.0]),
            Atom::new("Si", [0.25, 0.25, 0.25]),
        ],
        Coords::Fractional,
    )
}

/// 按参数构建模拟引擎
fn build_engine(args: &RunArgs, reference: &Crystal) -> Result<Arc<dyn SimulationEngine>> {
    match args.engine {
        EngineKind::Synthetic => Ok(Arc::new(
            SyntheticEngine::centered_on(reference.volume()).with_noise(1e-4),
        )),
        EngineKind::Command => {
            let command = args.command.as_ref().ok_or_else(|| {
                EoskitError::InvalidArgument(
                    "--engine command requires --command <EXECUTABLE>".to_string(),
                )
            })?;
            Ok(Arc::new(CommandEngine::new(
                command.as_str(),
                &args.jobs_root,
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scale_factors() {
        let factors = parse_scale_factors("0.96, 0.98,1.00").unwrap();
        assert_eq!(factors, vec![0.96, 0.98, 1.00]);
    }

    #[test]
    fn test_parse_scale_factors_rejects_garbage() {
        assert!(parse_scale_factors("0.96,abc").is_err());
        assert!(parse_scale_factors("").is_err());
    }

    #[test]
    fn test_builtin_silicon_volume() {
        let si = silicon_diamond();
        // fcc 原胞体积 = a³/4
        assert!((si.volume() - 5.430_f64.powi(3) / 4.0).abs() < 1e-9);
        assert_eq!(si.formula(), "Si2");
    }
}
