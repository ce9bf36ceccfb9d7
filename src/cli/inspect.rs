//! # inspect 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/inspect.rs`

use clap::Args;
use std::path::PathBuf;

/// inspect 子命令参数
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// POSCAR file or directory of structure files
    pub input: PathBuf,

    /// File name patterns in directory mode (comma-separated)
    #[arg(short, long, default_value = "*.vasp,POSCAR*,CONTCAR*,bestsqs*")]
    pub pattern: String,

    /// Search directories recursively
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    /// Compare each structure against this target formula
    #[arg(short, long)]
    pub formula: Option<String>,
}
