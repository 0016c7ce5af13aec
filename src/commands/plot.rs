//! # plot 命令实现
//!
//! 从 EOS 数据文件生成图表。
//!
//! ## 功能
//! - 读取 (volume, energy, energy_unit) CSV
//! - 默认叠加 Birch–Murnaghan 拟合曲线
//! - 按输出扩展名选择 PNG/SVG
//!
//! ## 依赖关系
//! - 使用 `cli/plot.rs` 定义的参数
//! - 使用 `eos/` 的拟合、导出与绘图

use crate::cli::plot::PlotArgs;
use crate::eos::{export, fitter, plot};
use crate::error::Result;
use crate::utils::output;

/// 执行 plot 命令
pub fn execute(args: PlotArgs) -> Result<()> {
    output::print_header("EOS Plot");

    let points = export::read_eos_csv(&args.input)?;
    output::print_info(&format!(
        "Loaded {} points from '{}'",
        points.len(),
        args.input.display()
    ));

    let fit = if args.no_fit {
        None
    } else {
        let fit = fitter::fit(&points)?;
        output::print_info(&format!(
            "Fitted curve: V0 = {:.4} Å³, B0 = {:.4}",
            fit.v0, fit.b0
        ));
        Some(fit)
    };

    let use_svg = args.output.extension().and_then(|e| e.to_str()) == Some("svg");
    plot::generate_eos_plot(
        &points,
        fit.as_ref(),
        &args.output,
        &args.title,
        args.width,
        args.height,
        use_svg,
    )?;

    output::print_done(&format!("Plot written to '{}'", args.output.display()));
    Ok(())
}
