//! # 数据模型模块
//!
//! 定义合金成分、晶体结构、截断距离和原子半径表。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `alloy/`, `sqs/` 和 `commands/` 使用
//! - 子模块: composition, structure, cutoffs, elements

pub mod composition;
pub mod cutoffs;
pub mod elements;
pub mod structure;

pub use composition::{Composition, RawCoefficient, RawCoefficients};
pub use cutoffs::CutoffSet;
pub use elements::RadiusTable;
pub use structure::{CrystalType, Lattice, Site, Structure, SupercellStructure};
