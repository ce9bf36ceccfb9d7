//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `composition`: 解析并归一化合金化学式
//! - `build`: 构建无序超胞并写出 POSCAR
//! - `batch`: 合金列表 × 晶体类型的并行批量构建
//! - `search`: 调用 ATAT mcsqs 搜索 SQS（本地运行或生成 Slurm 作业）
//! - `inspect`: 统计已有结构文件的成分
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: composition, build, batch, search, inspect

pub mod batch;
pub mod build;
pub mod composition;
pub mod inspect;
pub mod search;

use clap::{Parser, Subcommand};

/// heasqs - 高熵合金成分归一化与无序超胞构建
#[derive(Parser)]
#[command(name = "heasqs")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(
    about = "Composition normalization and disordered supercells for high-entropy alloy SQS searches",
    long_about = None
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Parse alloy formulas and print normalized atomic fractions
    Composition(composition::CompositionArgs),

    /// Build a disordered FCC/BCC supercell and write it as POSCAR
    Build(build::BuildArgs),

    /// Build supercells for a list of alloys in parallel
    Batch(batch::BatchArgs),

    /// Search a special quasirandom structure with ATAT mcsqs
    Search(search::SearchArgs),

    /// Report the composition of existing POSCAR files
    Inspect(inspect::InspectArgs),
}
