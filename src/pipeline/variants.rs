//! # 变体集合构建
//!
//! 按 (label, factor) 序列为参考结构生成带标签的缩放变体。
//! 每个条目独立计算，顺序不影响结果；此步骤开销很小，
//! 因此顺序执行即可。
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 调用
//! - 使用 `pipeline/scaler.rs`

use std::collections::{BTreeMap, HashSet};

use super::scaler;
use crate::error::{EoskitError, Result};
use crate::models::Crystal;

/// 构建标签到缩放结构的映射
///
/// 标签必须唯一；出现重复时返回 `DuplicateLabel`，不产生部分结果。
pub fn build_variants(
    reference: &Crystal,
    labeled_factors: &[(String, f64)],
) -> Result<BTreeMap<String, Crystal>> {
    let mut seen = HashSet::new();
    for (label, _) in labeled_factors {
        if !seen.insert(label.as_str()) {
            return Err(EoskitError::DuplicateLabel {
                label: label.clone(),
            });
        }
    }

    let mut variants = BTreeMap::new();
    for (label, factor) in labeled_factors {
        let scaled = scaler::scale(reference, *factor)?;
        variants.insert(label.clone(), scaled);
    }

    Ok(variants)
}

/// 默认标签方案：c1, c2, ..., cN
pub fn default_labels(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("c{}", i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Atom, Coords, Lattice};

    fn cubic_reference() -> Crystal {
        let lattice = Lattice::from_parameters(4.0, 4.0, 4.0, 90.0, 90.0, 90.0);
        Crystal::new(
            "X",
            lattice,
            vec![Atom::new("X", [0.0, 0.0, 0.0])],
            Coords::Fractional,
        )
    }

    fn labeled(factors: &[f64]) -> Vec<(String, f64)> {
        default_labels(factors.len())
            .into_iter()
            .zip(factors.iter().copied())
            .collect()
    }

    #[test]
    fn test_build_variants_key_set() {
        let reference = cubic_reference();
        let variants = build_variants(&reference, &labeled(&[0.96, 0.98, 1.0, 1.02])).unwrap();

        let labels: Vec<&str> = variants.keys().map(|s| s.as_str()).collect();
        assert_eq!(labels, vec!["c1", "c2", "c3", "c4"]);
    }

    #[test]
    fn test_build_variants_scales_each_entry() {
        let reference = cubic_reference();
        let variants = build_variants(&reference, &labeled(&[0.5, 2.0])).unwrap();

        assert!((variants["c1"].volume() - 8.0).abs() < 1e-9);
        assert!((variants["c2"].volume() - 512.0).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_labels_fail_without_partial_output() {
        let reference = cubic_reference();
        let factors = vec![
            ("a".to_string(), 0.96),
            ("b".to_string(), 0.98),
            ("a".to_string(), 1.02),
        ];

        let result = build_variants(&reference, &factors);
        assert!(matches!(
            result,
            Err(EoskitError::DuplicateLabel { ref label }) if label == "a"
        ));
    }

    #[test]
    fn test_invalid_factor_propagates() {
        let reference = cubic_reference();
        let factors = vec![("a".to_string(), 1.0), ("b".to_string(), -0.5)];

        assert!(matches!(
            build_variants(&reference, &factors),
            Err(EoskitError::InvalidScale { .. })
        ));
    }

    #[test]
    fn test_default_labels() {
        assert_eq!(default_labels(3), vec!["c1", "c2", "c3"]);
    }
}
