//! # 团簇截断距离集合
//!
//! 团簇阶数（2 = 二体，3 = 三体，...）到近邻壳层距离的映射。
//!
//! ## 依赖关系
//! - 由 `alloy/cutoffs.rs` 构造
//! - 被 `sqs/` 使用

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 截断距离集合（Å）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutoffSet {
    cutoffs: BTreeMap<u32, f64>,
}

impl CutoffSet {
    pub fn new(cutoffs: BTreeMap<u32, f64>) -> Self {
        CutoffSet { cutoffs }
    }

    /// 返回替换了某一阶截断的新集合
    pub fn with_override(mut self, order: u32, distance: f64) -> Self {
        self.cutoffs.insert(order, distance);
        self
    }

    pub fn get(&self, order: u32) -> Option<f64> {
        self.cutoffs.get(&order).copied()
    }

    pub fn pair(&self) -> Option<f64> {
        self.get(2)
    }

    pub fn triplet(&self) -> Option<f64> {
        self.get(3)
    }

    /// 按阶数升序遍历
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.cutoffs.iter().map(|(k, v)| (*k, *v))
    }
}

impl std::fmt::Display for CutoffSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .cutoffs
            .iter()
            .map(|(order, d)| format!("{}: {:.4}", order, d))
            .collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}
