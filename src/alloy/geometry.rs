//! # 晶格几何估算
//!
//! 由代表性原子半径估算立方晶格常数。
//!
//! ## 公式
//! - FCC: `a = r·√2`
//! - BCC: `a = 2r/√3`
//!
//! ## 依赖关系
//! - 被 `alloy/supercell.rs` 调用
//! - 使用 `models/elements.rs` 的半径表

use crate::error::Result;
use crate::models::{Composition, CrystalType, RadiusTable};

/// 由原子半径估算晶格常数
pub fn estimate_lattice_parameter(radius: f64, crystal: CrystalType) -> f64 {
    match crystal {
        CrystalType::Fcc => radius * 2f64.sqrt(),
        CrystalType::Bcc => 2.0 * radius / 3f64.sqrt(),
    }
}

/// 成分加权平均原子半径 `Σ f·r`
pub fn weighted_average_radius(composition: &Composition, radii: &RadiusTable) -> Result<f64> {
    let mut radius = 0.0;
    for (el, f) in composition.iter() {
        radius += f * radii.get(el)?;
    }
    Ok(radius)
}

/// 原子分数最大的元素（并列时取首个）
pub fn dominant_element(composition: &Composition) -> &str {
    let mut best: Option<(&str, f64)> = None;
    for (el, f) in composition.iter() {
        match best {
            Some((_, best_f)) if f <= best_f => {}
            _ => best = Some((el, f)),
        }
    }
    // Composition 保证非空
    best.map(|(el, _)| el).unwrap_or_default()
}

/// 原子半径最大的元素及其半径（并列时取首个）
pub fn largest_element<'a>(
    composition: &'a Composition,
    radii: &RadiusTable,
) -> Result<(&'a str, f64)> {
    let mut best: Option<(&str, f64)> = None;
    for el in composition.elements() {
        let r = radii.get(el)?;
        match best {
            Some((_, best_r)) if r <= best_r => {}
            _ => best = Some((el, r)),
        }
    }
    Ok(best.unwrap_or(("", 0.0)))
}

/// 构建单一元素参考晶格时使用哪个半径
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RadiusReference {
    /// 原子分数最大元素的半径
    #[default]
    Dominant,
    /// 成分加权平均半径
    Weighted,
    /// 最大原子半径
    Largest,
}

impl RadiusReference {
    /// 按策略取代表性半径
    pub fn radius(&self, composition: &Composition, radii: &RadiusTable) -> Result<f64> {
        match self {
            RadiusReference::Dominant => radii.get(dominant_element(composition)),
            RadiusReference::Weighted => weighted_average_radius(composition, radii),
            RadiusReference::Largest => largest_element(composition, radii).map(|(_, r)| r),
        }
    }
}

impl std::fmt::Display for RadiusReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RadiusReference::Dominant => write!(f, "dominant"),
            RadiusReference::Weighted => write!(f, "weighted"),
            RadiusReference::Largest => write!(f, "largest"),
        }
    }
}
