//! # fit 命令实现
//!
//! 读取 EOS 数据文件并做 Birch–Murnaghan 拟合。
//!
//! ## 功能
//! - 读取 (volume, energy, energy_unit) CSV
//! - 非线性最小二乘拟合
//! - 终端表格输出拟合参数与标准误差
//! - 可选绘图
//!
//! ## 依赖关系
//! - 使用 `cli/fit.rs` 定义的参数
//! - 使用 `eos/` 的拟合、导出与绘图

use crate::cli::fit::FitArgs;
use crate::eos::{export, fitter, plot, EnergyPoint, EosFitResult};
use crate::error::Result;
use crate::utils::output;

use tabled::{Table, Tabled};

/// 拟合结果行
#[derive(Debug, Clone, Tabled)]
struct ParameterRow {
    #[tabled(rename = "Parameter")]
    parameter: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Std. Error")]
    std_error: String,
}

/// 执行 fit 命令
pub fn execute(args: FitArgs) -> Result<()> {
    output::print_header("Birch-Murnaghan EOS Fit");

    let points = export::read_eos_csv(&args.input)?;
    output::print_info(&format!(
        "Loaded {} points from '{}'",
        points.len(),
        args.input.display()
    ));

    let fit = fitter::fit(&points)?;
    print_fit_report(&fit, &points);

    if let Some(plot_path) = &args.plot {
        let use_svg = plot_path.extension().and_then(|e| e.to_str()) == Some("svg");
        plot::generate_eos_plot(
            &points,
            Some(&fit),
            plot_path,
            "Equation of State",
            1024,
            768,
            use_svg,
        )?;
        output::print_success(&format!("Plot written to '{}'", plot_path.display()));
    }

    output::print_done("Fit complete");
    Ok(())
}

/// 打印拟合参数表与收敛信息
///
/// 单位取自数据点（拟合已保证一致性）。
pub(crate) fn print_fit_report(fit: &EosFitResult, points: &[EnergyPoint]) {
    let unit = points
        .first()
        .map(|p| p.energy_unit.as_str())
        .unwrap_or("?");
    let errors = fit.standard_errors();

    let rows = vec![
        ParameterRow {
            parameter: format!("E0 ({})", unit),
            value: format!("{:.6}", fit.e0),
            std_error: format!("{:.2e}", errors[0]),
        },
        ParameterRow {
            parameter: "V0 (Å³)".to_string(),
            value: format!("{:.4}", fit.v0),
            std_error: format!("{:.2e}", errors[1]),
        },
        ParameterRow {
            parameter: format!("B0 ({}/Å³)", unit),
            value: format!("{:.4}", fit.b0),
            std_error: format!("{:.2e}", errors[2]),
        },
        ParameterRow {
            parameter: "B0'".to_string(),
            value: format!("{:.4}", fit.b0_prime),
            std_error: format!("{:.2e}", errors[3]),
        },
    ];

    println!("{}", Table::new(rows));

    if unit == "eV" {
        // 1 eV/Å³ = 160.2176634 GPa
        output::print_info(&format!("B0 = {:.2} GPa", fit.b0 * 160.2176634));
    }
    output::print_info(&format!(
        "Converged in {} iterations, residual norm {:.3e}",
        fit.iterations, fit.residual_norm
    ));
}
