//! # 并行采样管线
//!
//! 等比缩放变体的生成、作业扇出与结果扇入。
//!
//! ## 控制流
//! ```text
//! variants (标签 -> 缩放结构)
//!   └─> dispatch.submit × N   (连续提交，互不等待)
//!         └─> collect          (唯一阻塞点，按标签 fan-in)
//! ```
//!
//! ## 子模块
//! - `scaler`: 结构等比缩放（纯函数）
//! - `variants`: 带标签的变体集合
//! - `dispatch`: 作业调度与非阻塞句柄
//! - `collect`: 全量收集与载荷解析
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 使用
//! - 使用 `engine/`, `models/`, `eos/`

pub mod collect;
pub mod dispatch;
pub mod scaler;
pub mod variants;

pub use collect::collect as collect_results;
pub use dispatch::{JobDispatcher, JobHandle};
pub use variants::{build_variants, default_labels};

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use super::*;
    use crate::engine::synthetic::SyntheticEngine;
    use crate::eos::fitter;
    use crate::models::{Atom, Coords, Crystal, Lattice};
    use crate::pipeline::dispatch::tests::test_config;

    fn si_diamond() -> Crystal {
        let alat = 5.430;
        let lattice = Lattice::from_vectors([
            [0.5 * alat, 0.5 * alat, 0.0],
            [0.0, 0.5 * alat, 0.5 * alat],
            [0.5 * alat, 0.0, 0.5 * alat],
        ]);
        Crystal::new(
            "Si",
            lattice,
            vec![
                Atom::new("Si", [0.0, 0.0, 0.0]),
                Atom::new("Si", [0.25, 0.25, 0.25]),
            ],
            Coords::Fractional,
        )
    }

    #[test]
    fn test_end_to_end_synthetic_eos() {
        let reference = si_diamond();
        let factors = [0.96, 0.98, 1.00, 1.02, 1.04];
        let labeled: Vec<(String, f64)> = default_labels(factors.len())
            .into_iter()
            .zip(factors.iter().copied())
            .collect();

        let variants = build_variants(&reference, &labeled).unwrap();

        let engine =
            Arc::new(SyntheticEngine::centered_on(reference.volume()).with_noise(1e-4));
        let dispatcher = JobDispatcher::new(engine, 0).unwrap();
        let config = test_config();

        let mut handles = BTreeMap::new();
        for (label, structure) in &variants {
            let handle = dispatcher.submit(label, structure, &config).unwrap();
            handles.insert(label.clone(), handle);
        }

        let results = collect_results(handles);
        assert_eq!(results.len(), 5);

        let points: Vec<_> = results
            .into_values()
            .map(|outcome| outcome.unwrap())
            .collect();

        let fit = fitter::fit(&points).unwrap();
        assert!(fit.converged);

        // 平衡体积应落在采样体积范围内
        let v_min = points.iter().map(|p| p.volume).fold(f64::INFINITY, f64::min);
        let v_max = points
            .iter()
            .map(|p| p.volume)
            .fold(f64::NEG_INFINITY, f64::max);
        assert!(fit.v0 > v_min && fit.v0 < v_max);
    }
}
