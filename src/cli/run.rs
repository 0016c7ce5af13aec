//! # run 子命令 CLI 定义
//!
//! 完整 EOS 工作流的参数。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/run.rs`

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 模拟引擎选择
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum EngineKind {
    /// Built-in Birch-Murnaghan evaluator (no external program needed)
    Synthetic,
    /// External command invoked once per job
    Command,
}

/// run 子命令参数
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Simulation code identifier (e.g. 'siesta-m@neu')
    #[arg(long)]
    pub codename: String,

    /// Pseudopotential family identifier
    #[arg(long)]
    pub pseudo_family: String,

    /// Reference structure: built-in name ('Si') or a POSCAR file path
    #[arg(long, default_value = "Si")]
    pub structure: String,

    /// K-point mesh (three integers)
    #[arg(long, num_args = 3, value_names = ["KX", "KY", "KZ"], default_values_t = [4, 4, 4])]
    pub kpoints: Vec<u32>,

    /// Maximum SCF iterations per job
    #[arg(long, default_value_t = 50)]
    pub max_scf_iterations: u32,

    /// Wall-clock limit per job ('HH:MM:SS' or seconds)
    #[arg(long, default_value = "0:30:00")]
    pub walltime: String,

    /// Scale factors for the lattice constant (comma-separated)
    #[arg(long, default_value = "0.96,0.98,1.00,1.02,1.04")]
    pub scale_factors: String,

    // ─────────────────────────────────────────────────────────────
    // Engine options
    // ─────────────────────────────────────────────────────────────
    /// Simulation engine
    #[arg(long, value_enum, default_value = "synthetic")]
    pub engine: EngineKind,

    /// Executable invoked per job (required for --engine command)
    #[arg(long)]
    pub command: Option<String>,

    /// Root directory for per-job working directories
    #[arg(long, default_value = "jobs")]
    pub jobs_root: PathBuf,

    /// Number of concurrent jobs (0 = number of CPU cores)
    #[arg(long, default_value_t = 0)]
    pub jobs: usize,

    // ─────────────────────────────────────────────────────────────
    // Input / output
    // ─────────────────────────────────────────────────────────────
    /// Directory containing parameters.json, basis.json, settings.json, options.json
    #[arg(long, default_value = ".")]
    pub config_dir: PathBuf,

    /// Output CSV file for the collected (volume, energy, unit) triples
    #[arg(long, default_value = "eos.csv")]
    pub output: PathBuf,

    /// Optional plot output path (.png or .svg)
    #[arg(long)]
    pub plot: Option<PathBuf>,

    /// Collect and export only, skip the EOS fit
    #[arg(long, default_value_t = false)]
    pub no_fit: bool,
}
