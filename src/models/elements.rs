//! # 元素原子半径表
//!
//! 内置经验原子半径（Å，Slater 1964，与 pymatgen `Element.atomic_radius` 一致），
//! 可由 CSV 文件覆盖（见 `parsers/radii.rs`）。
//!
//! ## 依赖关系
//! - 被 `alloy/geometry.rs`, `alloy/supercell.rs` 使用

use crate::error::{Result, SqsError};
use std::collections::HashMap;

/// 内置半径 (element, radius_in_angstroms)
const BUILTIN_RADII: &[(&str, f64)] = &[
    // --- Period 1-2 ---
    ("H", 0.25), ("Li", 1.45), ("Be", 1.05), ("B", 0.85), ("C", 0.70),
    ("N", 0.65), ("O", 0.60), ("F", 0.50),
    // --- Period 3 ---
    ("Na", 1.80), ("Mg", 1.50), ("Al", 1.25), ("Si", 1.10), ("P", 1.00),
    ("S", 1.00), ("Cl", 1.00),
    // --- Period 4 ---
    ("K", 2.20), ("Ca", 1.80), ("Sc", 1.60), ("Ti", 1.40), ("V", 1.35),
    ("Cr", 1.40), ("Mn", 1.40), ("Fe", 1.40), ("Co", 1.35), ("Ni", 1.35),
    ("Cu", 1.35), ("Zn", 1.35), ("Ga", 1.30), ("Ge", 1.25), ("As", 1.15),
    ("Se", 1.15), ("Br", 1.15),
    // --- Period 5 ---
    ("Rb", 2.35), ("Sr", 2.00), ("Y", 1.80), ("Zr", 1.55), ("Nb", 1.45),
    ("Mo", 1.45), ("Tc", 1.35), ("Ru", 1.30), ("Rh", 1.35), ("Pd", 1.40),
    ("Ag", 1.60), ("Cd", 1.55), ("In", 1.55), ("Sn", 1.45), ("Sb", 1.45),
    ("Te", 1.40), ("I", 1.40),
    // --- Period 6 ---
    ("Cs", 2.60), ("Ba", 2.15), ("La", 1.95), ("Ce", 1.85), ("Pr", 1.85),
    ("Nd", 1.85), ("Sm", 1.85), ("Gd", 1.80), ("Hf", 1.55), ("Ta", 1.45),
    ("W", 1.35), ("Re", 1.35), ("Os", 1.30), ("Ir", 1.35), ("Pt", 1.35),
    ("Au", 1.35), ("Hg", 1.50), ("Tl", 1.90), ("Pb", 1.80), ("Bi", 1.60),
];

/// 元素 -> 原子半径
#[derive(Debug, Clone, Default)]
pub struct RadiusTable {
    radii: HashMap<String, f64>,
}

impl RadiusTable {
    /// 空表
    pub fn new() -> Self {
        Self::default()
    }

    /// 内置表
    pub fn builtin() -> Self {
        let radii = BUILTIN_RADII
            .iter()
            .map(|(el, r)| (el.to_string(), *r))
            .collect();
        RadiusTable { radii }
    }

    /// 设置或覆盖某元素的半径
    pub fn insert(&mut self, element: impl Into<String>, radius: f64) {
        self.radii.insert(element.into(), radius);
    }

    /// 用另一张表覆盖当前表中的条目
    pub fn merge(mut self, other: RadiusTable) -> Self {
        self.radii.extend(other.radii);
        self
    }

    /// 查询半径
    pub fn get(&self, element: &str) -> Result<f64> {
        self.radii
            .get(element)
            .copied()
            .ok_or_else(|| SqsError::UnknownElement {
                element: element.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.radii.len()
    }
}
