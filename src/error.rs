//! # 统一错误处理模块
//!
//! 定义 hea-sqs 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 错误分类
//! - 输入校验错误：化学式解析、成分归一化、晶体类型、缺失原子半径
//! - 文件 I/O 与格式错误
//! - 外部命令错误（ATAT `corrdump` / `mcsqs`、`sbatch`）
//!
//! 所有输入校验错误都不是瞬时错误，不做重试；批量模式下只终止当前合金。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// hea-sqs 统一错误类型
#[derive(Error, Debug)]
pub enum SqsError {
    // ─────────────────────────────────────────────────────────────
    // 输入校验错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse formula '{formula}': {reason}")]
    ParseError { formula: String, reason: String },

    #[error("Invalid composition for '{formula}': {reason}")]
    CompositionError { formula: String, reason: String },

    #[error("Unsupported crystal type '{0}' (expected FCC or BCC)")]
    UnsupportedCrystalType(String),

    #[error("No atomic radius available for element '{element}'")]
    UnknownElement { element: String },

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

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    FileFormatError {
        format: String,
        path: String,
        reason: String,
    },

    // ─────────────────────────────────────────────────────────────
    // 外部命令错误
    // ─────────────────────────────────────────────────────────────
    #[error("External command '{command}' not found in PATH")]
    CommandNotFound { command: String },

    #[error("External command failed: {command}\n{stderr}")]
    CommandFailed { command: String, stderr: String },

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
pub type Result<T> = std::result::Result<T, SqsError>;
