//! # 模拟配置
//!
//! 聚合一次计算所需的全部数值方法参数：命令行给出的标识
//! （codename、赝势族、k 点网格、迭代上限、墙钟时限）加上
//! 工作目录下的四个 JSON 配置文档。
//!
//! ## 配置文档
//! - `parameters.json` - 计算参数（泛函、收敛阈值等）
//! - `basis.json`      - 基组描述
//! - `settings.json`   - 引擎设置
//! - `options.json`    - 资源选项
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 构建，传递给 `pipeline/dispatch.rs`
//! - 使用 `serde_json` 解析配置文档

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::error::{EoskitError, Result};

/// 模拟配置（对管线核心不透明，仅用于请求关联与透传）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// 计算代码标识（如 `siesta-m@neu`）
    pub codename: String,

    /// 赝势族标识
    pub pseudo_family: String,

    /// k 点网格
    pub kpoints: [u32; 3],

    /// SCF 最大迭代次数
    pub max_scf_iterations: u32,

    /// 墙钟时限（秒）
    pub max_walltime_seconds: u64,

    /// parameters.json 内容
    pub parameters: Value,

    /// basis.json 内容
    pub basis: Value,

    /// settings.json 内容
    pub settings: Value,

    /// options.json 内容
    pub options: Value,
}

impl SimulationConfig {
    /// 从配置目录加载四个 JSON 文档并组装配置
    ///
    /// 任何文档缺失或解析失败都会在提交任何作业之前中止。
    #[allow(clippy::too_many_arguments)]
    pub fn load(
        config_dir: &Path,
        codename: impl Into<String>,
        pseudo_family: impl Into<String>,
        kpoints: [u32; 3],
        max_scf_iterations: u32,
        max_walltime_seconds: u64,
    ) -> Result<Self> {
        if !config_dir.is_dir() {
            return Err(EoskitError::DirectoryNotFound {
                path: config_dir.display().to_string(),
            });
        }

        let parameters = load_document(config_dir, "parameters.json")?;
        let basis = load_document(config_dir, "basis.json")?;
        let settings = load_document(config_dir, "settings.json")?;
        let options = load_document(config_dir, "options.json")?;

        let config = SimulationConfig {
            codename: codename.into(),
            pseudo_family: pseudo_family.into(),
            kpoints,
            max_scf_iterations,
            max_walltime_seconds,
            parameters,
            basis,
            settings,
            options,
        };
        config.validate()?;
        Ok(config)
    }

    /// 校验配置本身的合法性
    pub fn validate(&self) -> Result<()> {
        if self.codename.trim().is_empty() {
            return Err(EoskitError::InvalidArgument(
                "codename must not be empty".to_string(),
            ));
        }
        if self.kpoints.iter().any(|&k| k == 0) {
            return Err(EoskitError::InvalidArgument(format!(
                "k-point mesh must be positive in every direction, got {:?}",
                self.kpoints
            )));
        }
        if self.max_scf_iterations == 0 {
            return Err(EoskitError::InvalidArgument(
                "max SCF iterations must be at least 1".to_string(),
            ));
        }
        if self.max_walltime_seconds == 0 {
            return Err(EoskitError::InvalidArgument(
                "walltime must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// 读取并解析单个配置文档（必须是 JSON 对象）
fn load_document(dir: &Path, name: &str) -> Result<Value> {
    let path = dir.join(name);
    if !path.exists() {
        return Err(EoskitError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let content = fs::read_to_string(&path).map_err(|e| EoskitError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let value: Value = serde_json::from_str(&content).map_err(|e| EoskitError::ConfigError {
        document: name.to_string(),
        reason: e.to_string(),
    })?;

    if !value.is_object() {
        return Err(EoskitError::ConfigError {
            document: name.to_string(),
            reason: "top-level value must be a JSON object".to_string(),
        });
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_docs(dir: &Path) {
        fs::create_dir_all(dir).unwrap();
        fs::write(
            dir.join("parameters.json"),
            r#"{"xc-functional": "LDA", "dm-tolerance": 1e-3}"#,
        )
        .unwrap();
        fs::write(dir.join("basis.json"), r#"{"pao-energy-shift": "300 meV"}"#).unwrap();
        fs::write(dir.join("settings.json"), r#"{}"#).unwrap();
        fs::write(
            dir.join("options.json"),
            r#"{"resources": {"num_machines": 1}}"#,
        )
        .unwrap();
    }

    #[test]
    fn test_load_config_documents() {
        let dir = std::env::temp_dir().join("eoskit_test_config_load");
        write_docs(&dir);

        let config =
            SimulationConfig::load(&dir, "siesta-m@neu", "lda-psf", [4, 4, 4], 50, 1800).unwrap();

        assert_eq!(config.kpoints, [4, 4, 4]);
        assert_eq!(config.parameters["xc-functional"], "LDA");

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_missing_document_fails() {
        let dir = std::env::temp_dir().join("eoskit_test_config_missing");
        fs::create_dir_all(&dir).ok();
        fs::remove_file(dir.join("parameters.json")).ok();

        let result = SimulationConfig::load(&dir, "code", "fam", [4, 4, 4], 50, 1800);
        assert!(matches!(result, Err(EoskitError::FileNotFound { .. })));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_validate_rejects_zero_kpoints() {
        let dir = std::env::temp_dir().join("eoskit_test_config_kpoints");
        write_docs(&dir);

        let result = SimulationConfig::load(&dir, "code", "fam", [4, 0, 4], 50, 1800);
        assert!(matches!(result, Err(EoskitError::InvalidArgument(_))));

        fs::remove_dir_all(&dir).ok();
    }
}
