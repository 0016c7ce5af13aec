//! # 墙钟时限解析
//!
//! 解析 `HH:MM:SS` 形式（Slurm 习惯写法）或纯秒数的时限字符串。
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 使用
//! - 使用 `regex` crate

use regex::Regex;

use crate::error::{EoskitError, Result};

/// 解析墙钟时限为秒
///
/// 接受 `"HH:MM:SS"`（小时不限位数）或纯十进制秒数。
pub fn parse_walltime(expr: &str) -> Result<u64> {
    let expr = expr.trim();

    let pattern = Regex::new(r"^(\d+):([0-5]?\d):([0-5]?\d)$").unwrap();
    if let Some(caps) = pattern.captures(expr) {
        let hours: u64 = caps[1].parse().unwrap_or(0);
        let minutes: u64 = caps[2].parse().unwrap_or(0);
        let seconds: u64 = caps[3].parse().unwrap_or(0);
        return Ok(hours * 3600 + minutes * 60 + seconds);
    }

    if let Ok(seconds) = expr.parse::<u64>() {
        return Ok(seconds);
    }

    Err(EoskitError::InvalidArgument(format!(
        "invalid walltime '{}': expected HH:MM:SS or seconds",
        expr
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hms() {
        assert_eq!(parse_walltime("24:00:00").unwrap(), 86400);
        assert_eq!(parse_walltime("0:30:15").unwrap(), 1815);
        assert_eq!(parse_walltime("100:00:00").unwrap(), 360000);
    }

    #[test]
    fn test_parse_plain_seconds() {
        assert_eq!(parse_walltime("3600").unwrap(), 3600);
        assert_eq!(parse_walltime(" 1800 ").unwrap(), 1800);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_walltime("1:99:00").is_err());
        assert!(parse_walltime("soon").is_err());
        assert!(parse_walltime("").is_err());
    }
}
