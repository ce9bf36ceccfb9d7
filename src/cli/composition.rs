//! # composition 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/composition.rs`

use clap::Args;

/// composition 子命令参数
#[derive(Args, Debug)]
pub struct CompositionArgs {
    /// One or more alloy formulas, e.g. 'Al0.875CoCrFeNi' 'Fe3Al'
    #[arg(required = true, num_args = 1..)]
    pub formulas: Vec<String>,

    /// Also show integer atom counts for this supercell size
    #[arg(short = 'n', long)]
    pub atoms: Option<usize>,
}
