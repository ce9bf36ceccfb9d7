//! # search 子命令 CLI 定义
//!
//! 调用 ATAT corrdump/mcsqs 搜索 SQS，或生成 Slurm 作业脚本
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/search.rs`

use crate::cli::build::{parse_cutoff, StructureOptions};

use clap::Args;
use std::path::PathBuf;

/// search 子命令参数
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Alloy formula, e.g. 'Al0.875CoCrFeNi'
    pub formula: String,

    #[command(flatten)]
    pub structure: StructureOptions,

    /// Override a cluster cutoff, e.g. '--cutoff 2=7.0' (repeatable)
    #[arg(long = "cutoff", value_parser = parse_cutoff)]
    pub cutoffs: Vec<(u32, f64)>,

    /// Working directory for ATAT files
    #[arg(short, long, default_value = "sqs_work")]
    pub workdir: PathBuf,

    /// Wall-clock budget for mcsqs in seconds
    #[arg(short, long, default_value_t = 60)]
    pub time_limit: u64,

    /// mcsqs executable
    #[arg(long, default_value = "mcsqs", env = "HEASQS_MCSQS")]
    pub mcsqs: String,

    /// corrdump executable
    #[arg(long, default_value = "corrdump", env = "HEASQS_CORRDUMP")]
    pub corrdump: String,

    // ─────────────────────────────────────────────────────────────
    // Slurm options
    // ─────────────────────────────────────────────────────────────
    /// Write a Slurm job script into the work directory instead of running locally
    #[arg(long, default_value_t = false)]
    pub sbatch: bool,

    /// Submit the generated job script with sbatch
    #[arg(long, default_value_t = false, requires = "sbatch")]
    pub submit: bool,

    /// Slurm partition
    #[arg(long, default_value = "cpu")]
    pub partition: String,

    /// Slurm constraint (omitted when empty)
    #[arg(long, default_value = "")]
    pub constraint: String,

    /// Memory per CPU
    #[arg(long, default_value = "2G")]
    pub mem_per_cpu: String,

    /// Module list to load in the job (comma-separated)
    #[arg(long, default_value = "")]
    pub modules: String,
}
