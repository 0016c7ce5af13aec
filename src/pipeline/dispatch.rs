//! # 作业调度器
//!
//! 为每个变体向模拟引擎提交一个独立作业。`submit` 立即返回
//! 非阻塞句柄，连续提交之间没有任何等待，N 个长时间模拟
//! 因此能在引擎侧并行运行而不是串行排队。
//!
//! ## 功能
//! - 基于 rayon 线程池的异步执行
//! - 提交时校验失败只影响对应标签，不波及已发出的兄弟作业
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 调用
//! - 使用 `engine/mod.rs` 的 `SimulationEngine`

use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

use serde_json::Value;

use crate::engine::{JobFailure, JobRequest, SimulationConfig, SimulationEngine};
use crate::error::{EoskitError, Result};
use crate::models::Crystal;

/// 在途或已完成的模拟作业句柄
///
/// 在解析前由提交方独占持有；`wait` 消耗句柄并阻塞到终态。
pub struct JobHandle {
    label: String,
    volume: f64,
    rx: Receiver<std::result::Result<Value, JobFailure>>,
}

impl JobHandle {
    /// 变体标签
    pub fn label(&self) -> &str {
        &self.label
    }

    /// 提交时刻捕获的晶胞体积 (Å³)
    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// 阻塞等待作业到达终态
    pub fn wait(self) -> std::result::Result<Value, JobFailure> {
        match self.rx.recv() {
            Ok(outcome) => outcome,
            // 工作线程在发送结果前消失（如引擎 panic）
            Err(_) => Err(JobFailure::new(format!(
                "worker for '{}' terminated without a result",
                self.label
            ))),
        }
    }
}

/// 作业调度器
pub struct JobDispatcher {
    engine: Arc<dyn SimulationEngine>,
    pool: rayon::ThreadPool,
}

impl JobDispatcher {
    /// 创建调度器
    ///
    /// `jobs` 为并行作业数，0 表示使用 CPU 核数。
    pub fn new(engine: Arc<dyn SimulationEngine>, jobs: usize) -> Result<Self> {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .map_err(|e| EoskitError::Other(format!("failed to build thread pool: {}", e)))?;

        Ok(JobDispatcher { engine, pool })
    }

    /// 提交一个作业并立即返回句柄
    ///
    /// 引擎的同步校验失败会作为该标签的 `SubmissionError` 上报；
    /// 实际执行被派发到线程池，本调用绝不等待任何作业完成。
    pub fn submit(
        &self,
        label: &str,
        structure: &Crystal,
        config: &SimulationConfig,
    ) -> Result<JobHandle> {
        let request = JobRequest {
            label: label.to_string(),
            structure: structure.clone(),
            config: config.clone(),
        };

        self.engine
            .validate(&request)
            .map_err(|e| EoskitError::SubmissionError {
                label: label.to_string(),
                reason: e.to_string(),
            })?;

        let volume = structure.volume();
        let (tx, rx) = mpsc::channel();
        let engine = Arc::clone(&self.engine);

        self.pool.spawn(move || {
            let outcome = engine.execute(&request);
            // 接收端先行关闭时丢弃结果即可
            tx.send(outcome).ok();
        });

        Ok(JobHandle {
            label: label.to_string(),
            volume,
            rx,
        })
    }
}
