//! # 成分归一化
//!
//! 将原始系数转换为原子分数，处理“化学计量”与“混合等原子”两种写法：
//!
//! - 化学计量：所有系数都是整数（含省略的 1），`f = c / Σc`。
//!   例：`Al4CoCrFeNi` -> Al 0.5，其余各 0.125。
//! - 混合：至少一个系数为非整数。显式写出的系数直接作为原子分数，
//!   未写数字的元素平分剩余的 `1 - S`。
//!   例：`Al0.875CoCrFeNi` -> Al 0.875，其余各 0.03125。
//!
//! 显式写出的 `1`（如 `Co1`）在混合写法中视为指定分数，而非等原子余量。
//!
//! ## 依赖关系
//! - 被 `commands/` 和 `models/composition.rs` 使用
//! - 使用 `models/composition.rs`

use crate::error::{Result, SqsError};
use crate::models::{Composition, RawCoefficients};

/// 归一化原始系数
pub fn normalize(raw: &RawCoefficients) -> Result<Composition> {
    let invalid = |reason: String| SqsError::CompositionError {
        formula: raw.formula.clone(),
        reason,
    };

    if raw.is_empty() {
        return Err(invalid("no elements".to_string()));
    }

    if let Some(zero) = raw.iter().find(|e| e.value == 0.0) {
        return Err(invalid(format!("coefficient of {} is zero", zero.symbol)));
    }

    let fractions = if raw.is_stoichiometric() {
        let total: f64 = raw.iter().map(|e| e.value).sum();
        raw.iter()
            .map(|e| (e.symbol.clone(), e.value / total))
            .collect()
    } else {
        let specified: f64 = raw.iter().filter(|e| e.explicit).map(|e| e.value).sum();
        let remainder_count = raw.iter().filter(|e| !e.explicit).count();

        let share = if remainder_count > 0 {
            let remaining = 1.0 - specified;
            if remaining <= 0.0 {
                let mut reason = format!(
                    "explicit fractions sum to {:.6}, leaving nothing for {} equiatomic element(s)",
                    specified, remainder_count
                );
                if let Some(one) = raw.iter().find(|e| e.explicit && e.value == 1.0) {
                    reason.push_str(&format!(
                        " ({} is written with an explicit coefficient of 1; write it as '{}' to share the remainder equally)",
                        one.symbol, one.symbol
                    ));
                }
                return Err(invalid(reason));
            }
            remaining / remainder_count as f64
        } else {
            0.0
        };

        raw.iter()
            .map(|e| {
                let f = if e.explicit { e.value } else { share };
                (e.symbol.clone(), f)
            })
            .collect()
    };

    Composition::new(raw.formula.clone(), fractions)
}
