//! # 解析器模块
//!
//! 参考结构文件的解析入口。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: poscar

pub mod poscar;

use crate::error::{EoskitError, Result};
use crate::models::Crystal;
use std::path::Path;

/// 从文件路径推断格式并解析
pub fn parse_structure_file(path: &Path) -> Result<Crystal> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    if matches!(ext.as_str(), "poscar" | "vasp") {
        return poscar::parse_poscar_file(path);
    }

    // 可能是 POSCAR/CONTCAR (无扩展名)
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        if name.starts_with("POSCAR") || name.starts_with("CONTCAR") {
            return poscar::parse_poscar_file(path);
        }
    }

    Err(EoskitError::UnsupportedFormat(format!(
        "Cannot determine format for: {}",
        path.display()
    )))
}
