//! # 模拟引擎边界
//!
//! 电子结构模拟引擎被视为黑盒协作方：给定结构与数值方法配置，
//! 最终产出一个标量能量加元数据的 JSON 响应，或一个失败描述。
//! 管线核心只依赖此处的 trait，不关心引擎内部。
//!
//! ## 依赖关系
//! - 被 `pipeline/dispatch.rs` 调用（在调度线程池的工作线程上阻塞执行）
//! - 子模块: config, command, synthetic

pub mod command;
pub mod config;
pub mod synthetic;

pub use config::SimulationConfig;

use serde_json::Value;

use crate::error::Result;
use crate::models::Crystal;

/// 单个模拟请求：结构 + 数值方法配置
#[derive(Debug, Clone)]
pub struct JobRequest {
    /// 变体标签（在整条管线中保持稳定）
    pub label: String,

    /// 缩放后的结构
    pub structure: Crystal,

    /// 数值方法配置
    pub config: SimulationConfig,
}

/// 作业失败描述
#[derive(Debug, Clone)]
pub struct JobFailure {
    pub reason: String,
}

impl JobFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        JobFailure {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for JobFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason)
    }
}

/// 模拟引擎抽象
///
/// `validate` 在提交线程上同步执行，失败会作为该标签的提交错误
/// 立即上报；`execute` 在调度线程池的工作线程上阻塞运行，
/// 其结果通过 `JobHandle` 异步取回。
pub trait SimulationEngine: Send + Sync {
    /// 引擎名称（用于日志输出）
    fn name(&self) -> &str;

    /// 提交前的同步校验
    fn validate(&self, _request: &JobRequest) -> Result<()> {
        Ok(())
    }

    /// 阻塞执行一个模拟请求
    ///
    /// 成功时返回引擎的 JSON 响应载荷，
    /// 形如 `{"energy": -215.6, "energy_unit": "eV", ...}`。
    fn execute(&self, request: &JobRequest) -> std::result::Result<Value, JobFailure>;
}
