//! # fit 子命令 CLI 定义
//!
//! 对已有 EOS 数据文件做拟合。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/fit.rs`

use clap::Args;
use std::path::PathBuf;

/// fit 子命令参数
#[derive(Args, Debug)]
pub struct FitArgs {
    /// Input CSV file (volume, energy, energy_unit)
    #[arg(long, default_value = "eos.csv")]
    pub input: PathBuf,

    /// Optional plot output path (.png or .svg)
    #[arg(long)]
    pub plot: Option<PathBuf>,
}
