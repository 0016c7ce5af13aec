//! # 结果收集器
//!
//! 阻塞等待所有作业句柄到达终态，并把每个标签的结果解析为
//! (volume, energy, energy_unit) 采样点。输出映射按标签为键，
//! 与底层作业的完成顺序完全无关。
//!
//! ## 功能
//! - 全量 fan-in：唯一的阻塞点
//! - 部分失败语义：单个作业失败只记录在其标签下，不阻碍其余收集
//! - 响应载荷字段缺失时报 `MissingField`
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 调用
//! - 使用 `pipeline/dispatch.rs` 的 `JobHandle`

use std::collections::BTreeMap;

use serde_json::Value;

use super::dispatch::JobHandle;
use crate::eos::EnergyPoint;
use crate::error::{EoskitError, Result};

/// 等待全部句柄并按标签收集结果
///
/// 返回映射的键集合与输入完全一致；每个值要么是成功解析的
/// 采样点，要么是该标签独立的失败原因。
pub fn collect(handles: BTreeMap<String, JobHandle>) -> BTreeMap<String, Result<EnergyPoint>> {
    handles
        .into_iter()
        .map(|(label, handle)| {
            let volume = handle.volume();
            let outcome = match handle.wait() {
                Ok(payload) => extract_energy_point(&label, volume, &payload),
                Err(failure) => Err(EoskitError::JobFailed {
                    label: label.clone(),
                    reason: failure.reason,
                }),
            };
            (label, outcome)
        })
        .collect()
}

/// 从成功作业的响应载荷中提取采样点
fn extract_energy_point(label: &str, volume: f64, payload: &Value) -> Result<EnergyPoint> {
    let energy = payload
        .get("energy")
        .and_then(Value::as_f64)
        .ok_or_else(|| EoskitError::MissingField {
            label: label.to_string(),
            field: "energy".to_string(),
        })?;

    let energy_unit = payload
        .get("energy_unit")
        .and_then(Value::as_str)
        .ok_or_else(|| EoskitError::MissingField {
            label: label.to_string(),
            field: "energy_unit".to_string(),
        })?;

    Ok(EnergyPoint {
        volume,
        energy,
        energy_unit: energy_unit.to_string(),
    })
}
