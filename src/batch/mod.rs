//! # 批量处理模块
//!
//! 提供统一的批量处理能力。
//!
//! ## 功能
//! - 收集匹配的结构文件（`inspect` 目录模式）
//! - 并行处理合金 × 晶体类型任务（`batch` 命令）
//! - 进度反馈与统计
//!
//! ## 依赖关系
//! - 被 `commands/batch.rs`, `commands/inspect.rs` 使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod collector;
pub mod runner;

pub use collector::FileCollector;
pub use runner::{BatchRunner, ProcessResult};
