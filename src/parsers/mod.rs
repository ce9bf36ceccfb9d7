//! # 解析器模块
//!
//! 提供合金化学式、原子半径表和 POSCAR 结构文件的解析与输出。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: formula, poscar, radii

pub mod formula;
pub mod poscar;
pub mod radii;

pub use formula::parse_formula;
