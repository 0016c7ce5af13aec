//! # EOS 数据导出与读取
//!
//! (volume, energy, energy_unit) 三元组序列的 CSV 读写。
//! 该文件是一次完整管线运行的持久化产物，可直接用于拟合与绘图。
//!
//! ## 依赖关系
//! - 被 `commands/run.rs`, `commands/fit.rs`, `commands/plot.rs` 调用
//! - 使用 `csv` 库

use std::path::Path;

use super::EnergyPoint;
use crate::error::{EoskitError, Result};

/// 将采样点序列写入 CSV
pub fn write_eos_csv(points: &[EnergyPoint], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path).map_err(EoskitError::CsvError)?;

    for point in points {
        wtr.serialize(point).map_err(EoskitError::CsvError)?;
    }

    wtr.flush().map_err(|e| EoskitError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// 从 CSV 读回采样点序列
pub fn read_eos_csv(input_path: &Path) -> Result<Vec<EnergyPoint>> {
    if !input_path.exists() {
        return Err(EoskitError::FileNotFound {
            path: input_path.display().to_string(),
        });
    }

    let mut rdr = csv::Reader::from_path(input_path).map_err(EoskitError::CsvError)?;

    let mut points = Vec::new();
    for record in rdr.deserialize() {
        let point: EnergyPoint = record.map_err(EoskitError::CsvError)?;
        points.push(point);
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_write_then_read() {
        let path = std::env::temp_dir().join("eoskit_test_eos.csv");
        let points = vec![
            EnergyPoint {
                volume: 38.4,
                energy: -215.61,
                energy_unit: "eV".to_string(),
            },
            EnergyPoint {
                volume: 40.0,
                energy: -215.66,
                energy_unit: "eV".to_string(),
            },
        ];

        write_eos_csv(&points, &path).unwrap();
        let read_back = read_eos_csv(&path).unwrap();

        assert_eq!(read_back, points);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_read_missing_file_fails() {
        let path = std::env::temp_dir().join("eoskit_test_eos_missing.csv");
        std::fs::remove_file(&path).ok();

        assert!(matches!(
            read_eos_csv(&path),
            Err(EoskitError::FileNotFound { .. })
        ));
    }
}
