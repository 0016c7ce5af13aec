//! # 统一错误处理模块
//!
//! 定义 Eoskit 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// Eoskit 统一错误类型
#[derive(Error, Debug)]
pub enum EoskitError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析与配置错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("Invalid configuration document '{document}': {reason}")]
    ConfigError { document: String, reason: String },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    // ─────────────────────────────────────────────────────────────
    // 结构与变体错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid scale factor {factor}: must be > 0")]
    InvalidScale { factor: f64 },

    #[error("Degenerate lattice (zero determinant) in structure '{0}'")]
    DegenerateLattice(String),

    #[error("Duplicate variant label: '{label}'")]
    DuplicateLabel { label: String },

    // ─────────────────────────────────────────────────────────────
    // 作业提交与收集错误（按标签隔离，不中断其他作业）
    // ─────────────────────────────────────────────────────────────
    #[error("Submission rejected for '{label}': {reason}")]
    SubmissionError { label: String, reason: String },

    #[error("Job '{label}' failed: {reason}")]
    JobFailed { label: String, reason: String },

    #[error("Job '{label}' output is missing required field '{field}'")]
    MissingField { label: String, field: String },

    // ─────────────────────────────────────────────────────────────
    // 拟合错误
    // ─────────────────────────────────────────────────────────────
    #[error("Insufficient data for EOS fit: need at least {needed} points, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("Mixed energy units in EOS data: '{expected}' vs '{found}'")]
    UnitMismatch { expected: String, found: String },

    #[error("EOS fit did not converge: {reason}")]
    FitDidNotConverge { reason: String },

    // ─────────────────────────────────────────────────────────────
    // 外部命令错误
    // ─────────────────────────────────────────────────────────────
    #[error("External command '{command}' not found in PATH")]
    CommandNotFound { command: String },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, EoskitError>;
