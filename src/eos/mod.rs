//! # 状态方程模块
//!
//! 三阶 Birch–Murnaghan 状态方程的模型函数、非线性拟合、
//! 数据导出与绘图。
//!
//! ## 子模块
//! - `fitter`: Levenberg–Marquardt 非线性最小二乘拟合
//! - `export`: (volume, energy, energy_unit) 三元组的 CSV 读写
//! - `plot`: 数据点与拟合曲线绘图
//!
//! ## 依赖关系
//! - 被 `pipeline/collect.rs` 与 `commands/` 使用

pub mod export;
pub mod fitter;
pub mod plot;

use serde::{Deserialize, Serialize};

/// 单个体积-能量采样点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyPoint {
    /// 晶胞体积 (Å³)
    pub volume: f64,

    /// 自由能
    pub energy: f64,

    /// 能量单位（一次拟合内必须一致）
    pub energy_unit: String,
}

/// EOS 拟合结果
///
/// 每次拟合调用重新计算，不跨运行缓存。
#[derive(Debug, Clone)]
pub struct EosFitResult {
    /// 平衡能量 E0
    pub e0: f64,

    /// 平衡体积 V0 (Å³)
    pub v0: f64,

    /// 体模量 B0（能量单位/Å³）
    pub b0: f64,

    /// 体模量压力导数 B0'（无量纲）
    pub b0_prime: f64,

    /// 参数协方差矩阵，顺序 (E0, V0, B0, B0')
    pub covariance: [[f64; 4]; 4],

    /// 是否满足收敛判据
    pub converged: bool,

    /// 实际迭代次数
    pub iterations: usize,

    /// 残差范数 sqrt(Σr²)
    pub residual_norm: f64,
}

impl EosFitResult {
    /// 各参数的标准误差（协方差对角元开方）
    pub fn standard_errors(&self) -> [f64; 4] {
        let mut errors = [0.0; 4];
        for (i, err) in errors.iter_mut().enumerate() {
            *err = self.covariance[i][i].max(0.0).sqrt();
        }
        errors
    }
}

/// 三阶 Birch–Murnaghan 状态方程
///
/// `E(V) = E0 + 9/16·B0·V0·[(r−1)²·(2 + (B0'−4)·(r−1))]`，
/// 其中 `r = (V0/V)^(2/3)`。
pub fn birch_murnaghan(v: f64, e0: f64, v0: f64, b0: f64, b0_prime: f64) -> f64 {
    let r = (v0 / v).powf(2.0 / 3.0);
    e0 + 9.0 / 16.0 * b0 * v0 * ((r - 1.0).powi(2) * (2.0 + (b0_prime - 4.0) * (r - 1.0)))
}
