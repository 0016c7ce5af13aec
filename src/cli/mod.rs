//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `run`: 完整 EOS 工作流（变体生成 → 并行模拟 → 收集 → 拟合）
//! - `fit`: 对已有 EOS 数据文件做 Birch–Murnaghan 拟合
//! - `plot`: 绘制 EOS 数据点与拟合曲线
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: run, fit, plot

pub mod fit;
pub mod plot;
pub mod run;

use clap::{Parser, Subcommand};

/// Eoskit - 晶体状态方程并行工作流工具
#[derive(Parser)]
#[command(name = "eoskit")]
#[command(version)]
#[command(about = "A concurrent equation-of-state workflow toolkit for crystal structures", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Run the full EOS workflow: scale, simulate in parallel, collect, fit
    Run(run::RunArgs),

    /// Fit the Birch-Murnaghan EOS to an existing data file
    Fit(fit::FitArgs),

    /// Plot EOS data points and the fitted curve
    Plot(plot::PlotArgs),
}
