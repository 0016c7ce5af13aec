//! # 外部命令引擎
//!
//! 将每个模拟请求交给一个外部可执行程序处理：为每个标签创建
//! 独立的作业目录，写入 `request.json`，然后以该目录为工作目录
//! 运行配置的命令，并把进程 stdout 解析为 JSON 响应载荷。
//!
//! 外部程序契约：
//! ```text
//! <command> request.json      # cwd = jobs_root/<label>/
//! stdout: {"energy": -215.6, "energy_unit": "eV", ...}
//! ```
//!
//! `request.json` 同时给出分数坐标与笛卡尔坐标，外部程序无需
//! 自行做晶格换算。
//!
//! ## 依赖关系
//! - 实现 `engine/mod.rs` 的 `SimulationEngine`
//! - 使用 `serde_json` 序列化请求与解析响应

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::Value;

use super::{JobFailure, JobRequest, SimulationEngine};
use crate::error::{EoskitError, Result};

/// 请求文件名（写入每个作业目录）
const REQUEST_FILE: &str = "request.json";

/// 外部命令引擎
pub struct CommandEngine {
    /// 每个作业调用的可执行程序
    command: String,

    /// 作业目录根
    jobs_root: PathBuf,
}

impl CommandEngine {
    pub fn new(command: impl Into<String>, jobs_root: impl Into<PathBuf>) -> Self {
        CommandEngine {
            command: command.into(),
            jobs_root: jobs_root.into(),
        }
    }
}

impl SimulationEngine for CommandEngine {
    fn name(&self) -> &str {
        "command"
    }

    fn validate(&self, request: &JobRequest) -> Result<()> {
        if self.command.trim().is_empty() {
            return Err(EoskitError::InvalidArgument(
                "engine command must not be empty".to_string(),
            ));
        }
        if !command_in_path(&self.command) {
            return Err(EoskitError::CommandNotFound {
                command: self.command.clone(),
            });
        }
        if request.structure.atoms.is_empty() {
            return Err(EoskitError::InvalidArgument(format!(
                "structure for '{}' has no atoms",
                request.label
            )));
        }

        // 作业根目录不可创建视为资源拒绝
        fs::create_dir_all(&self.jobs_root).map_err(|e| EoskitError::FileWriteError {
            path: self.jobs_root.display().to_string(),
            source: e,
        })?;

        Ok(())
    }

    fn execute(&self, request: &JobRequest) -> std::result::Result<Value, JobFailure> {
        let job_dir = self.jobs_root.join(&request.label);
        fs::create_dir_all(&job_dir)
            .map_err(|e| JobFailure::new(format!("cannot create job dir: {}", e)))?;

        let fractional = request
            .structure
            .fractional_positions()
            .map_err(|e| JobFailure::new(e.to_string()))?;
        let document = serde_json::json!({
            "label": request.label,
            "structure": request.structure,
            "fractional_positions": fractional,
            "cartesian_positions": request.structure.cartesian_positions(),
            "config": request.config,
        });

        let request_json = serde_json::to_string_pretty(&document)
            .map_err(|e| JobFailure::new(format!("cannot serialize request: {}", e)))?;
        fs::write(job_dir.join(REQUEST_FILE), request_json)
            .map_err(|e| JobFailure::new(format!("cannot write {}: {}", REQUEST_FILE, e)))?;

        let output = Command::new(&self.command)
            .arg(REQUEST_FILE)
            .current_dir(&job_dir)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    JobFailure::new(format!("command '{}' not found in PATH", self.command))
                } else {
                    JobFailure::new(format!("failed to run '{}': {}", self.command, e))
                }
            })?;

        if !output.status.success() {
            return Err(JobFailure::new(format!(
                "'{}' exited with {}: {}",
                self.command,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| JobFailure::new(format!("invalid JSON on stdout: {}", e)))
    }
}

/// 检查命令是否可执行：带路径分隔符时检查文件本身，否则搜索 PATH
fn command_in_path(command: &str) -> bool {
    let path = Path::new(command);
    if path.components().count() > 1 {
        return path.is_file();
    }

    std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(command).is_file()))
        .unwrap_or(false)
}
