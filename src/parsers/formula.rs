//! # 合金化学式解析器
//!
//! 将 `Al0.875CoCrFeNi` 这类化学式拆分为有序的 (元素, 系数) 记录。
//!
//! ## 语法
//! ```text
//! formula := token+
//! token   := [A-Z][a-z]? number?
//! number  := 十进制非负数（省略时系数为 1，且标记为非显式）
//! ```
//! 同一元素重复出现时，后出现的值覆盖前者。
//!
//! ## 依赖关系
//! - 被 `models/composition.rs` 和 `commands/` 使用
//! - 使用 `regex` 进行分词

use crate::error::{Result, SqsError};
use crate::models::{RawCoefficient, RawCoefficients};

use regex::Regex;
use std::sync::OnceLock;

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"([A-Z][a-z]?)([0-9.]*)").unwrap())
}

/// 解析合金化学式
pub fn parse_formula(formula: &str) -> Result<RawCoefficients> {
    let text = formula.trim();
    let fail = |reason: String| SqsError::ParseError {
        formula: formula.to_string(),
        reason,
    };

    let mut raw = RawCoefficients::new(text);
    let mut cursor = 0;

    for caps in token_pattern().captures_iter(text) {
        let whole = caps.get(0).map(|m| (m.start(), m.end())).unwrap_or((cursor, cursor));
        check_gap(&text[cursor..whole.0], cursor).map_err(&fail)?;
        cursor = whole.1;

        let symbol = &caps[1];
        let number = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        let coefficient = if number.is_empty() {
            RawCoefficient::new(symbol, 1.0, false)
        } else {
            let value: f64 = number
                .parse()
                .map_err(|_| fail(format!("invalid coefficient '{}' for {}", number, symbol)))?;
            if !value.is_finite() || value < 0.0 {
                return Err(fail(format!(
                    "coefficient '{}' for {} is not a finite non-negative number",
                    number, symbol
                )));
            }
            RawCoefficient::new(symbol, value, true)
        };

        raw.insert(coefficient);
    }

    check_gap(&text[cursor..], cursor).map_err(&fail)?;

    if raw.is_empty() {
        return Err(fail("no element symbol found".to_string()));
    }

    Ok(raw)
}

/// 两个 token 之间只允许空白
fn check_gap(gap: &str, offset: usize) -> std::result::Result<(), String> {
    match gap.char_indices().find(|(_, c)| !c.is_whitespace()) {
        Some((i, c)) => Err(format!(
            "unexpected character '{}' at position {}",
            c,
            offset + i
        )),
        None => Ok(()),
    }
}
