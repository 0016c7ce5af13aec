//! # plot 子命令 CLI 定义
//!
//! 绘制 EOS 数据点与拟合曲线。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/plot.rs`

use clap::Args;
use std::path::PathBuf;

/// plot 子命令参数
#[derive(Args, Debug)]
pub struct PlotArgs {
    /// Input CSV file (volume, energy, energy_unit)
    #[arg(long, default_value = "eos.csv")]
    pub input: PathBuf,

    /// Output image path (.png or .svg, inferred from extension)
    #[arg(long, default_value = "eos.png")]
    pub output: PathBuf,

    /// Plot title
    #[arg(long, default_value = "Equation of State")]
    pub title: String,

    /// Image width in pixels
    #[arg(long, default_value_t = 1024)]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 768)]
    pub height: u32,

    /// Plot raw points only, without a fitted curve
    #[arg(long, default_value_t = false)]
    pub no_fit: bool,
}
