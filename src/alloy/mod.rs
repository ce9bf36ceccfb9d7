//! # 合金核心模块
//!
//! 成分归一化、晶格几何、无序超胞构建和截断距离建议。
//! 除超胞构建中的随机打乱外，全部为纯函数。
//!
//! ## 子模块
//! - `normalize`: 原始系数 -> 原子分数
//! - `geometry`: 原子半径 -> 晶格常数
//! - `supercell`: 超胞缩放、原子计数与元素分配
//! - `cutoffs`: 团簇截断距离
//!
//! ## 依赖关系
//! - 被 `commands/` 和 `models/composition.rs` 使用
//! - 使用 `models/`

pub mod cutoffs;
pub mod geometry;
pub mod normalize;
pub mod supercell;

pub use cutoffs::propose_cutoffs;
pub use geometry::RadiusReference;
pub use normalize::normalize;
pub use supercell::SupercellBuilder;
