//! # 结构等比缩放
//!
//! 将参考结构的晶格向量统一乘以缩放因子，分数坐标严格保持不变。
//! 纯函数：相同输入总是产生结构相等的输出，无任何副作用。
//!
//! ## 依赖关系
//! - 被 `pipeline/variants.rs` 调用
//! - 使用 `models/structure.rs`

use crate::error::{EoskitError, Result};
use crate::models::{Coords, Crystal, Lattice};

/// 等比缩放参考结构
///
/// 晶格向量逐一乘以 `factor`；笛卡尔坐标同步乘以 `factor`，
/// 分数坐标原样复制，两种约定下原子的分数位置都精确保持。
/// `factor <= 0`（含 NaN）返回 `InvalidScale`。
pub fn scale(structure: &Crystal, factor: f64) -> Result<Crystal> {
    if !(factor > 0.0) {
        return Err(EoskitError::InvalidScale { factor });
    }

    let mut matrix = structure.lattice.matrix;
    for row in &mut matrix {
        for component in row.iter_mut() {
            *component *= factor;
        }
    }

    let atoms = match structure.coords {
        Coords::Fractional => structure.atoms.clone(),
        Coords::Cartesian => {
            let mut atoms = structure.atoms.clone();
            for atom in &mut atoms {
                for component in atom.position.iter_mut() {
                    *component *= factor;
                }
            }
            atoms
        }
    };

    Ok(Crystal {
        name: structure.name.clone(),
        lattice: Lattice::from_vectors(matrix),
        atoms,
        coords: structure.coords,
        pbc: structure.pbc,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Atom;

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
    fn test_scale_identity() {
        let reference = si_diamond();
        let scaled = scale(&reference, 1.0).unwrap();

        assert!((scaled.volume() - reference.volume()).abs() < 1e-12);
        for (a, b) in scaled.atoms.iter().zip(reference.atoms.iter()) {
            for i in 0..3 {
                assert!((a.position[i] - b.position[i]).abs() < 1e-15);
            }
        }
    }

    #[test]
    fn test_scale_preserves_fractional_coordinates() {
        let mut reference = si_diamond();
        // 转成笛卡尔约定再缩放，分数坐标仍需严格保持
        let cart = reference.cartesian_positions();
        for (atom, pos) in reference.atoms.iter_mut().zip(cart) {
            atom.position = pos;
        }
        reference.coords = Coords::Cartesian;

        let before = reference.fractional_positions().unwrap();
        let scaled = scale(&reference, 1.04).unwrap();
        let after = scaled.fractional_positions().unwrap();

        for (b, a) in before.iter().zip(after.iter()) {
            for i in 0..3 {
                assert!((b[i] - a[i]).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_scale_volume_is_cubic_in_factor() {
        let reference = si_diamond();
        let scaled = scale(&reference, 0.96).unwrap();

        let expected = reference.volume() * 0.96_f64.powi(3);
        assert!((scaled.volume() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_scale_composes() {
        let reference = si_diamond();

        let twice = scale(&scale(&reference, 1.02).unwrap(), 0.97).unwrap();
        let once = scale(&reference, 1.02 * 0.97).unwrap();

        for i in 0..3 {
            for j in 0..3 {
                assert!((twice.lattice.matrix[i][j] - once.lattice.matrix[i][j]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_scale_rejects_nonpositive_factor() {
        let reference = si_diamond();

        assert!(matches!(
            scale(&reference, 0.0),
            Err(EoskitError::InvalidScale { .. })
        ));
        assert!(matches!(
            scale(&reference, -1.5),
            Err(EoskitError::InvalidScale { .. })
        ));
        assert!(matches!(
            scale(&reference, f64::NAN),
            Err(EoskitError::InvalidScale { .. })
        ));
    }
}
