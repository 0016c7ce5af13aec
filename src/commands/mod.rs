//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `pipeline/`, `engine/`, `eos/`, `utils/`
//! - 子模块: run, fit, plot

pub mod fit;
pub mod plot;
pub mod run;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Run(args) => run::execute(args),
        Commands::Fit(args) => fit::execute(args),
        Commands::Plot(args) => plot::execute(args),
    }
}
