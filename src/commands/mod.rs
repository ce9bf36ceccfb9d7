//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `alloy/`, `parsers/`, `models/`, `sqs/`, `utils/`
//! - 子模块: composition, build, batch, search, inspect

pub mod batch;
pub mod build;
pub mod composition;
pub mod inspect;
pub mod search;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Composition(args) => composition::execute(args),
        Commands::Build(args) => build::execute(args),
        Commands::Batch(args) => batch::execute(args),
        Commands::Search(args) => search::execute(args),
        Commands::Inspect(args) => inspect::execute(args),
    }
}
