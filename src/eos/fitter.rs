//! # Birch–Murnaghan 非线性最小二乘拟合
//!
//! Levenberg–Marquardt 算法，解析雅可比，最小化
//! `Σ(E(V_i) − E_i)²`，参数为 (E0, V0, B0, B0')。
//!
//! ## 功能
//! - 单位一致性与数据量校验
//! - 固定初值策略（非凸目标，初值是收敛的关键）
//! - 参数协方差估计 `(JᵀJ)⁻¹·s²`
//!
//! ## 依赖关系
//! - 被 `commands/run.rs`, `commands/fit.rs` 调用
//! - 使用 `nalgebra` 做 4×4 线性代数

use nalgebra::{Matrix4, Vector4};

use super::{birch_murnaghan, EnergyPoint, EosFitResult};
use crate::error::{EoskitError, Result};

/// 模型自由参数个数
const NUM_PARAMS: usize = 4;

/// 迭代预算
const MAX_ITERATIONS: usize = 200;

/// 步长收敛阈值（相对）
const STEP_TOLERANCE: f64 = 1e-10;

/// 目标函数相对下降收敛阈值
const COST_TOLERANCE: f64 = 1e-14;

/// 阻尼系数上限，超过视为不收敛
const LAMBDA_MAX: f64 = 1e14;

/// 拟合三阶 Birch–Murnaghan 状态方程
///
/// 初值策略：`E0 = min(E)`, `V0 = mean(V)`, `B0 = 0.1`, `B0' = 3.0`。
/// 结果对输入点的顺序不敏感。
pub fn fit(points: &[EnergyPoint]) -> Result<EosFitResult> {
    if points.len() < NUM_PARAMS {
        return Err(EoskitError::InsufficientData {
            needed: NUM_PARAMS,
            got: points.len(),
        });
    }

    let expected_unit = &points[0].energy_unit;
    for point in &points[1..] {
        if point.energy_unit != *expected_unit {
            return Err(EoskitError::UnitMismatch {
                expected: expected_unit.clone(),
                found: point.energy_unit.clone(),
            });
        }
    }

    if points.iter().any(|p| p.volume <= 0.0) {
        return Err(EoskitError::InvalidArgument(
            "all volumes must be positive for an EOS fit".to_string(),
        ));
    }

    let n = points.len();
    let e_min = points.iter().map(|p| p.energy).fold(f64::INFINITY, f64::min);
    let v_mean = points.iter().map(|p| p.volume).sum::<f64>() / n as f64;

    let mut params = Vector4::new(e_min, v_mean, 0.1, 3.0);
    let mut cost = sum_of_squares(points, &params);
    let mut lambda = 1e-3;
    let mut converged = false;
    let mut iterations = 0;

    while iterations < MAX_ITERATIONS && !converged {
        iterations += 1;

        let (jtj, jtr) = normal_equations(points, &params);

        // Marquardt 对角缩放
        let mut damped = jtj;
        for i in 0..NUM_PARAMS {
            damped[(i, i)] += lambda * jtj[(i, i)].max(1e-12);
        }

        let step = match damped.lu().solve(&(-jtr)) {
            Some(step) => step,
            None => {
                lambda *= 10.0;
                if lambda > LAMBDA_MAX {
                    return Err(EoskitError::FitDidNotConverge {
                        reason: "normal equations are singular".to_string(),
                    });
                }
                continue;
            }
        };

        let trial = params + step;
        let trial_cost = if trial[1] > 0.0 {
            sum_of_squares(points, &trial)
        } else {
            // V0 走出定义域，直接拒绝该步
            f64::INFINITY
        };

        if trial_cost.is_finite() && trial_cost <= cost {
            let step_small = (0..NUM_PARAMS)
                .all(|i| step[i].abs() <= STEP_TOLERANCE * (params[i].abs() + STEP_TOLERANCE));
            let cost_drop_small = cost - trial_cost <= COST_TOLERANCE * cost.max(1e-300);

            params = trial;
            cost = trial_cost;
            lambda = (lambda / 10.0).max(1e-12);

            if step_small || cost_drop_small {
                converged = true;
            }
        } else {
            lambda *= 10.0;
            if lambda > LAMBDA_MAX {
                return Err(EoskitError::FitDidNotConverge {
                    reason: format!("damping exceeded {:.0e} without progress", LAMBDA_MAX),
                });
            }
        }
    }

    if !converged {
        return Err(EoskitError::FitDidNotConverge {
            reason: format!("iteration budget ({}) exhausted", MAX_ITERATIONS),
        });
    }

    // 收敛点处的协方差估计
    let (jtj, _) = normal_equations(points, &params);
    let jtj_inv = jtj.try_inverse().ok_or(EoskitError::FitDidNotConverge {
        reason: "Jacobian is singular at the solution".to_string(),
    })?;

    let dof = n.saturating_sub(NUM_PARAMS).max(1);
    let s2 = cost / dof as f64;

    let mut covariance = [[0.0; 4]; 4];
    for i in 0..NUM_PARAMS {
        for j in 0..NUM_PARAMS {
            covariance[i][j] = jtj_inv[(i, j)] * s2;
        }
    }

    Ok(EosFitResult {
        e0: params[0],
        v0: params[1],
        b0: params[2],
        b0_prime: params[3],
        covariance,
        converged,
        iterations,
        residual_norm: cost.sqrt(),
    })
}

/// 残差平方和
fn sum_of_squares(points: &[EnergyPoint], params: &Vector4<f64>) -> f64 {
    points
        .iter()
        .map(|p| {
            let r = birch_murnaghan(p.volume, params[0], params[1], params[2], params[3]) - p.energy;
            r * r
        })
        .sum()
}

/// 组装正规方程 (JᵀJ, Jᵀr)
fn normal_equations(points: &[EnergyPoint], params: &Vector4<f64>) -> (Matrix4<f64>, Vector4<f64>) {
    let mut jtj = Matrix4::zeros();
    let mut jtr = Vector4::zeros();

    for point in points {
        let row = jacobian_row(point.volume, params);
        let residual =
            birch_murnaghan(point.volume, params[0], params[1], params[2], params[3]) - point.energy;

        jtj += row * row.transpose();
        jtr += row * residual;
    }

    (jtj, jtr)
}

/// 模型对 (E0, V0, B0, B0') 的偏导
fn jacobian_row(v: f64, params: &Vector4<f64>) -> Vector4<f64> {
    let (v0, b0, b0_prime) = (params[1], params[2], params[3]);
    let c = 9.0 / 16.0;

    let r = (v0 / v).powf(2.0 / 3.0);
    let g = b0_prime - 4.0;
    let f = (r - 1.0).powi(2) * (2.0 + g * (r - 1.0));
    let f_prime = 2.0 * (r - 1.0) * (2.0 + g * (r - 1.0)) + g * (r - 1.0).powi(2);

    Vector4::new(
        1.0,
        c * b0 * (f + 2.0 / 3.0 * r * f_prime),
        c * v0 * f,
        c * b0 * v0 * (r - 1.0).powi(3),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic_points(volumes: &[f64], noise: &[f64]) -> Vec<EnergyPoint> {
        volumes
            .iter()
            .zip(noise.iter().chain(std::iter::repeat(&0.0)))
            .map(|(&v, &dv)| EnergyPoint {
                volume: v,
                energy: birch_murnaghan(v, -10.0, 20.0, 0.5, 4.0) + dv,
                energy_unit: "eV".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_fit_recovers_exact_synthetic_parameters() {
        let volumes = [15.0, 17.0, 19.0, 21.0, 23.0, 25.0];
        let points = synthetic_points(&volumes, &[]);

        let fit = fit(&points).unwrap();

        assert!(fit.converged);
        assert!((fit.e0 - (-10.0)).abs() / 10.0 < 0.01);
        assert!((fit.v0 - 20.0).abs() / 20.0 < 0.01);
        assert!((fit.b0 - 0.5).abs() / 0.5 < 0.01);
        assert!((fit.b0_prime - 4.0).abs() / 4.0 < 0.01);
    }

    #[test]
    fn test_fit_tolerates_small_noise() {
        let volumes = [15.0, 17.0, 19.0, 21.0, 23.0, 25.0];
        let noise = [1e-4, -8e-5, 5e-5, -1e-4, 7e-5, -3e-5];
        let points = synthetic_points(&volumes, &noise);

        let fit = fit(&points).unwrap();

        assert!(fit.converged);
        assert!((fit.v0 - 20.0).abs() / 20.0 < 0.01);
        assert!(fit.residual_norm < 1e-3);
    }

    #[test]
    fn test_fit_is_permutation_invariant() {
        let volumes = [15.0, 17.0, 19.0, 21.0, 23.0, 25.0];
        let points = synthetic_points(&volumes, &[]);
        let mut reversed = points.clone();
        reversed.reverse();

        let forward = fit(&points).unwrap();
        let backward = fit(&reversed).unwrap();

        assert!((forward.v0 - backward.v0).abs() < 1e-9);
        assert!((forward.b0 - backward.b0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_rejects_insufficient_data() {
        let points = synthetic_points(&[18.0, 20.0, 22.0], &[]);

        let result = fit(&points);
        assert!(matches!(
            result,
            Err(EoskitError::InsufficientData { needed: 4, got: 3 })
        ));
    }

    #[test]
    fn test_fit_rejects_mixed_units() {
        let mut points = synthetic_points(&[15.0, 17.0, 19.0, 21.0, 23.0], &[]);
        points[2].energy_unit = "Ry".to_string();

        let result = fit(&points);
        assert!(matches!(result, Err(EoskitError::UnitMismatch { .. })));
    }

    #[test]
    fn test_standard_errors_are_finite() {
        let volumes = [15.0, 17.0, 19.0, 21.0, 23.0, 25.0];
        let points = synthetic_points(&volumes, &[]);

        let fit = fit(&points).unwrap();
        for err in fit.standard_errors() {
            assert!(err.is_finite());
        }
    }
}
