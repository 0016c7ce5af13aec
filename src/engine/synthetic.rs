//! # 内置合成引擎
//!
//! 用 Birch–Murnaghan 模型直接计算能量的假引擎，
//! 供演练（dry run）、端到端测试与绘图演示使用，
//! 无需任何外部电子结构程序。
//!
//! ## 依赖关系
//! - 实现 `engine/mod.rs` 的 `SimulationEngine`
//! - 使用 `eos/mod.rs` 的模型函数

use serde_json::json;

use super::{JobFailure, JobRequest, SimulationEngine};
use crate::eos::birch_murnaghan;

/// 合成引擎参数
///
/// 默认值取硅金刚石结构的量级（能量 eV，体积 Å³）。
#[derive(Debug, Clone)]
pub struct SyntheticEngine {
    pub e0: f64,
    pub v0: f64,
    pub b0: f64,
    pub b0_prime: f64,
    /// 叠加噪声的标准差（0 为无噪声）
    pub noise_sigma: f64,
    pub energy_unit: String,
}

impl Default for SyntheticEngine {
    fn default() -> Self {
        SyntheticEngine {
            e0: -215.6,
            v0: 40.0,
            b0: 0.55,
            b0_prime: 4.2,
            noise_sigma: 0.0,
            energy_unit: "eV".to_string(),
        }
    }
}

impl SyntheticEngine {
    /// 以给定平衡体积为中心构造（其余参数取默认值）
    pub fn centered_on(v0: f64) -> Self {
        SyntheticEngine {
            v0,
            ..Default::default()
        }
    }

    pub fn with_noise(mut self, sigma: f64) -> Self {
        self.noise_sigma = sigma;
        self
    }
}

impl SimulationEngine for SyntheticEngine {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn execute(&self, request: &JobRequest) -> std::result::Result<serde_json::Value, JobFailure> {
        let volume = request.structure.volume();
        if volume < 1e-12 {
            return Err(JobFailure::new("cell volume is zero"));
        }

        let mut energy = birch_murnaghan(volume, self.e0, self.v0, self.b0, self.b0_prime);
        if self.noise_sigma > 0.0 {
            energy += self.noise_sigma * gaussian_from_label(&request.label);
        }

        Ok(json!({
            "energy": energy,
            "energy_unit": self.energy_unit,
            "engine": self.name(),
            "codename": request.config.codename,
            "volume": volume,
        }))
    }
}

/// 由标签确定性地生成一个标准正态样本
///
/// 同一标签总是得到同一噪声，保证整条管线可复现。
fn gaussian_from_label(label: &str) -> f64 {
    // FNV-1a 哈希作为种子，再走一轮 LCG 取两个均匀数做 Box-Muller
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in label.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }

    let mut next = || {
        hash = hash
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (hash >> 11) as f64 / (1u64 << 53) as f64
    };

    let u1: f64 = next().max(f64::MIN_POSITIVE);
    let u2: f64 = next();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SimulationConfig;
    use crate::models::{Atom, Coords, Crystal, Lattice};
    use serde_json::json;

    fn test_request(label: &str, alat: f64) -> JobRequest {
        let lattice = Lattice::from_parameters(alat, alat, alat, 90.0, 90.0, 90.0);
        let structure = Crystal::new(
            "Si",
            lattice,
            vec![Atom::new("Si", [0.0, 0.0, 0.0])],
            Coords::Fractional,
        );
        JobRequest {
            label: label.to_string(),
            structure,
            config: SimulationConfig {
                codename: "synthetic".to_string(),
                pseudo_family: "none".to_string(),
                kpoints: [4, 4, 4],
                max_scf_iterations: 50,
                max_walltime_seconds: 1800,
                parameters: json!({}),
                basis: json!({}),
                settings: json!({}),
                options: json!({}),
            },
        }
    }

    #[test]
    fn test_synthetic_energy_matches_model() {
        let engine = SyntheticEngine::centered_on(27.0);
        let request = test_request("c1", 3.0);

        let payload = engine.execute(&request).unwrap();
        let energy = payload["energy"].as_f64().unwrap();
        let expected = birch_murnaghan(27.0, engine.e0, 27.0, engine.b0, engine.b0_prime);

        assert!((energy - expected).abs() < 1e-12);
        assert_eq!(payload["energy_unit"], "eV");
    }

    #[test]
    fn test_noise_is_deterministic_per_label() {
        let engine = SyntheticEngine::centered_on(27.0).with_noise(1e-4);
        let request = test_request("c3", 3.0);

        let first = engine.execute(&request).unwrap()["energy"].as_f64().unwrap();
        let second = engine.execute(&request).unwrap()["energy"].as_f64().unwrap();

        assert_eq!(first, second);
    }
}
