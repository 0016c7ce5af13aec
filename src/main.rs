//! # Eoskit - 晶体状态方程并行工作流工具
//!
//! 对参考晶体结构做等比缩放采样，把每个变体交给外部电子结构
//! 引擎并行计算，按标签收集体积-能量数据，最后用三阶
//! Birch–Murnaghan 模型拟合状态方程。
//!
//! ## 子命令
//! - `run`  - 完整工作流：缩放 → 并行模拟 → 收集 → 拟合
//! - `fit`  - 对已有数据文件做拟合
//! - `plot` - 绘制数据点与拟合曲线
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── pipeline/  (缩放、调度、收集)
//!   │     ├── engine/    (模拟引擎边界)
//!   │     ├── eos/       (模型、拟合、导出、绘图)
//!   │     ├── parsers/   (结构文件解析)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod cli;
mod commands;
mod engine;
mod eos;
mod error;
mod models;
mod parsers;
mod pipeline;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
