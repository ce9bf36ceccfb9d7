//! # 合金成分数据模型
//!
//! - `RawCoefficients`: 化学式解析得到的原始系数（保留化学式中的顺序）
//! - `Composition`: 归一化后的原子分数，是“每种元素有多少”的规范表示
//!
//! ## 依赖关系
//! - 被 `parsers/formula.rs` 构造
//! - 被 `alloy/` 和 `sqs/` 使用

use crate::error::{Result, SqsError};
use serde::{Deserialize, Serialize};

/// 原子分数求和容差
pub const FRACTION_TOLERANCE: f64 = 1e-6;

/// 化学式中的单个元素系数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCoefficient {
    /// 元素符号
    pub symbol: String,
    /// 系数（省略时为 1.0）
    pub value: f64,
    /// 化学式中是否显式写出了数字
    pub explicit: bool,
}

impl RawCoefficient {
    pub fn new(symbol: impl Into<String>, value: f64, explicit: bool) -> Self {
        RawCoefficient {
            symbol: symbol.into(),
            value,
            explicit,
        }
    }

    /// 系数是否为整数
    pub fn is_integral(&self) -> bool {
        self.value.fract() == 0.0
    }
}

/// 有序的原始系数表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCoefficients {
    /// 来源化学式
    pub formula: String,
    entries: Vec<RawCoefficient>,
}

impl RawCoefficients {
    pub fn new(formula: impl Into<String>) -> Self {
        RawCoefficients {
            formula: formula.into(),
            entries: Vec::new(),
        }
    }

    /// 插入系数；重复的元素覆盖之前的值，但保留首次出现的位置
    pub fn insert(&mut self, coefficient: RawCoefficient) {
        match self
            .entries
            .iter_mut()
            .find(|e| e.symbol == coefficient.symbol)
        {
            Some(existing) => *existing = coefficient,
            None => self.entries.push(coefficient),
        }
    }

    pub fn get(&self, symbol: &str) -> Option<&RawCoefficient> {
        self.entries.iter().find(|e| e.symbol == symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RawCoefficient> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 所有系数均为整数（包括省略的 1）
    pub fn is_stoichiometric(&self) -> bool {
        self.entries.iter().all(RawCoefficient::is_integral)
    }
}

/// 归一化成分：元素 -> 原子分数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    /// 来源化学式（用于错误信息）
    pub formula: String,
    fractions: Vec<(String, f64)>,
}

impl Composition {
    /// 创建并校验成分：键唯一、0 < f <= 1、总和为 1
    pub fn new(formula: impl Into<String>, fractions: Vec<(String, f64)>) -> Result<Self> {
        let formula = formula.into();
        let invalid = |reason: String| SqsError::CompositionError {
            formula: formula.clone(),
            reason,
        };

        if fractions.is_empty() {
            return Err(invalid("composition has no elements".to_string()));
        }

        for (i, (el, f)) in fractions.iter().enumerate() {
            if fractions[..i].iter().any(|(other, _)| other == el) {
                return Err(invalid(format!("element '{}' appears twice", el)));
            }
            if !f.is_finite() || *f <= 0.0 || *f > 1.0 + FRACTION_TOLERANCE {
                return Err(invalid(format!(
                    "fraction of '{}' is {}, expected 0 < f <= 1",
                    el, f
                )));
            }
        }

        let sum: f64 = fractions.iter().map(|(_, f)| f).sum();
        if (sum - 1.0).abs() > FRACTION_TOLERANCE {
            return Err(invalid(format!(
                "fractions sum to {:.6}, expected 1.0",
                sum
            )));
        }

        Ok(Composition { formula, fractions })
    }

    /// 从化学式直接解析并归一化
    pub fn from_formula(formula: &str) -> Result<Self> {
        let raw = crate::parsers::formula::parse_formula(formula)?;
        crate::alloy::normalize(&raw)
    }

    /// 获取元素的原子分数
    pub fn fraction(&self, element: &str) -> Option<f64> {
        self.fractions
            .iter()
            .find(|(el, _)| el == element)
            .map(|(_, f)| *f)
    }

    pub fn elements(&self) -> impl Iterator<Item = &str> {
        self.fractions.iter().map(|(el, _)| el.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.fractions.iter().map(|(el, f)| (el.as_str(), *f))
    }

    pub fn len(&self) -> usize {
        self.fractions.len()
    }

    /// 紧凑标签，如 `Al0.875Co0.03125Cr0.03125`
    pub fn label(&self) -> String {
        self.fractions
            .iter()
            .map(|(el, f)| format!("{}{}", el, format_fraction(*f)))
            .collect::<Vec<_>>()
            .join("")
    }
}

impl std::fmt::Display for Composition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .fractions
            .iter()
            .map(|(el, frac)| format!("{}: {}", el, format_fraction(*frac)))
            .collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

/// 去掉多余尾零的分数格式
fn format_fraction(value: f64) -> String {
    let text = format!("{:.6}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, f64)]) -> Vec<(String, f64)> {
        items.iter().map(|(e, f)| (e.to_string(), *f)).collect()
    }

    #[test]
    fn test_raw_insert_last_write_wins() {
        let mut raw = RawCoefficients::new("FeNiFe2");
        raw.insert(RawCoefficient::new("Fe", 1.0, false));
        raw.insert(RawCoefficient::new("Ni", 1.0, false));
        raw.insert(RawCoefficient::new("Fe", 2.0, true));

        assert_eq!(raw.len(), 2);
        let symbols: Vec<&str> = raw.iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["Fe", "Ni"]);
        assert_eq!(raw.get("Fe").unwrap().value, 2.0);
        assert!(raw.get("Fe").unwrap().explicit);
    }

    #[test]
    fn test_is_stoichiometric() {
        let mut raw = RawCoefficients::new("Al4Co");
        raw.insert(RawCoefficient::new("Al", 4.0, true));
        raw.insert(RawCoefficient::new("Co", 1.0, false));
        assert!(raw.is_stoichiometric());

        raw.insert(RawCoefficient::new("Ni", 0.5, true));
        assert!(!raw.is_stoichiometric());
    }

    #[test]
    fn test_composition_rejects_bad_sum() {
        let err = Composition::new("AlCo", pairs(&[("Al", 0.5), ("Co", 0.4)])).unwrap_err();
        assert!(matches!(err, SqsError::CompositionError { .. }));
        assert!(err.to_string().contains("AlCo"));
    }

    #[test]
    fn test_composition_rejects_duplicate_and_zero() {
        assert!(Composition::new("x", pairs(&[("Al", 0.5), ("Al", 0.5)])).is_err());
        assert!(Composition::new("x", pairs(&[("Al", 1.0), ("Co", 0.0)])).is_err());
        assert!(Composition::new("x", vec![]).is_err());
    }

    #[test]
    fn test_composition_accessors() {
        let comp = Composition::new("CoNi", pairs(&[("Co", 0.5), ("Ni", 0.5)])).unwrap();
        assert_eq!(comp.len(), 2);
        assert_eq!(comp.fraction("Ni"), Some(0.5));
        assert_eq!(comp.fraction("Fe"), None);
        assert_eq!(comp.label(), "Co0.5Ni0.5");
        assert_eq!(comp.to_string(), "{Co: 0.5, Ni: 0.5}");
    }
}
