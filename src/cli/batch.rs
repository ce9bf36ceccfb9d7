//! # batch 子命令 CLI 定义
//!
//! 合金列表 × 晶体类型的并行批量构建
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/batch.rs`

use crate::cli::build::ReferenceRadius;

use clap::Args;
use std::path::PathBuf;

/// batch 子命令参数
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Text/CSV file listing one alloy formula per line (first column)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Lattice types to build for every alloy (comma-separated)
    #[arg(long, value_delimiter = ',', default_value = "fcc,bcc")]
    pub crystals: Vec<String>,

    /// Target number of atoms in each supercell
    #[arg(short = 'n', long, default_value_t = 32)]
    pub atoms: usize,

    /// CSV file with `element,radius` rows overriding the built-in radii (Å)
    #[arg(long, env = "HEASQS_RADII")]
    pub radii: Option<PathBuf>,

    /// Which radius sets the lattice parameter
    #[arg(long, value_enum, default_value = "dominant")]
    pub reference: ReferenceRadius,

    /// Base random seed; request i uses seed + i (entropy when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output directory for POSCAR files
    #[arg(short, long, default_value = "structures")]
    pub output: PathBuf,

    /// Summary CSV path (default: '<output>/summary.csv')
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Number of parallel jobs (0 = all CPUs)
    #[arg(short, long, default_value_t = 0, env = "HEASQS_JOBS")]
    pub jobs: usize,

    /// Overwrite existing POSCAR files
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}
