//! # EOS 曲线绘图
//!
//! 使用 `plotters` 库绘制体积-能量采样点与拟合曲线。
//!
//! ## 功能
//! - 数据点散点图
//! - 可选 Birch–Murnaghan 拟合曲线（采样体积范围内 300 点）
//! - 支持 PNG 和 SVG 输出
//!
//! ## 依赖关系
//! - 被 `commands/run.rs`, `commands/fit.rs`, `commands/plot.rs` 调用
//! - 使用 `eos/mod.rs` 的 EnergyPoint, EosFitResult
//! - 使用 `plotters` 渲染图表

use crate::eos::{birch_murnaghan, EnergyPoint, EosFitResult};
use crate::error::{EoskitError, Result};

use plotters::prelude::*;
use std::path::Path;

/// 拟合曲线的采样点数
const CURVE_SAMPLES: usize = 300;

/// 生成 EOS 图表
pub fn generate_eos_plot(
    points: &[EnergyPoint],
    fit: Option<&EosFitResult>,
    output_path: &Path,
    title: &str,
    width: u32,
    height: u32,
    use_svg: bool,
) -> Result<()> {
    if points.is_empty() {
        return Err(EoskitError::InvalidArgument(
            "nothing to plot: empty point set".to_string(),
        ));
    }

    if use_svg {
        let root = SVGBackend::new(output_path, (width, height)).into_drawing_area();
        draw_eos_chart(&root, points, fit, title)?;
        root.present()
            .map_err(|e| EoskitError::Other(e.to_string()))?;
    } else {
        let root = BitMapBackend::new(output_path, (width, height)).into_drawing_area();
        draw_eos_chart(&root, points, fit, title)?;
        root.present()
            .map_err(|e| EoskitError::Other(e.to_string()))?;
    }
    Ok(())
}

/// 绘制 EOS 图表的核心逻辑
fn draw_eos_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    points: &[EnergyPoint],
    fit: Option<&EosFitResult>,
    title: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| EoskitError::Other(format!("{:?}", e)))?;

    let v_min = points.iter().map(|p| p.volume).fold(f64::INFINITY, f64::min);
    let v_max = points
        .iter()
        .map(|p| p.volume)
        .fold(f64::NEG_INFINITY, f64::max);
    let e_min = points.iter().map(|p| p.energy).fold(f64::INFINITY, f64::min);
    let e_max = points
        .iter()
        .map(|p| p.energy)
        .fold(f64::NEG_INFINITY, f64::max);

    let v_pad = ((v_max - v_min) * 0.05).max(1e-6);
    let e_pad = ((e_max - e_min) * 0.10).max(1e-6);

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(
            (v_min - v_pad)..(v_max + v_pad),
            (e_min - e_pad)..(e_max + e_pad),
        )
        .map_err(|e| EoskitError::Other(format!("{:?}", e)))?;

    // 单位取自数据点（拟合阶段已保证一致）
    let unit = points[0].energy_unit.as_str();

    chart
        .configure_mesh()
        .x_desc("Volume (Å³)")
        .y_desc(format!("Energy ({})", unit))
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(|e| EoskitError::Other(format!("{:?}", e)))?;

    // 拟合曲线
    if let Some(fit) = fit {
        let line_color = RGBColor(0, 102, 204);
        let step = (v_max - v_min) / (CURVE_SAMPLES - 1) as f64;
        let curve = (0..CURVE_SAMPLES).map(|i| {
            let v = v_min + step * i as f64;
            (v, birch_murnaghan(v, fit.e0, fit.v0, fit.b0, fit.b0_prime))
        });

        chart
            .draw_series(LineSeries::new(curve, line_color.stroke_width(2)))
            .map_err(|e| EoskitError::Other(format!("{:?}", e)))?;

        // 标注平衡体积
        let v0_text = format!("V0 = {:.3} Å³", fit.v0);
        chart
            .draw_series(std::iter::once(Text::new(
                v0_text,
                (v_max - (v_max - v_min) * 0.25, e_max + e_pad * 0.5),
                ("sans-serif", 14).into_font().color(&BLACK),
            )))
            .map_err(|e| EoskitError::Other(format!("{:?}", e)))?;
    }

    // 数据点
    let point_color = RGBColor(204, 51, 51);
    chart
        .draw_series(
            points
                .iter()
                .map(|p| Circle::new((p.volume, p.energy), 4, point_color.filled())),
        )
        .map_err(|e| EoskitError::Other(format!("{:?}", e)))?;

    Ok(())
}
