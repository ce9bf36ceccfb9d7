//! # heasqs - 高熵合金 SQS 准备工具
//!
//! 将合金化学式归一化为原子分数，构建实现该成分的无序 FCC/BCC 超胞，
//! 给出团簇截断距离，并把结果交给 ATAT `mcsqs` 进行 SQS 搜索。
//!
//! ## 子命令
//! - `composition` - 化学式解析与归一化
//! - `build`       - 构建无序超胞并写出 POSCAR
//! - `batch`       - 合金列表并行批量构建
//! - `search`      - 调用 mcsqs 搜索 SQS（本地或 Slurm）
//! - `inspect`     - 统计结构文件成分
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── alloy/     (成分归一化、晶格几何、超胞、截断距离)
//!   │     ├── sqs/       (SQS 搜索接口与 ATAT 后端)
//!   │     ├── batch/     (并行批量执行)
//!   │     ├── parsers/   (化学式、半径表、POSCAR)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod alloy;
mod batch;
mod cli;
mod commands;
mod error;
mod models;
mod parsers;
mod sqs;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
