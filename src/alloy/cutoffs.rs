//! # 团簇截断距离建议
//!
//! - FCC: 二体 = 最近邻 `a/√2`，三体 = 次近邻 `a`
//! - BCC: 二体 = 最近邻 `a·√3/2`，三体 = 次近邻 `a`
//!
//! ## 依赖关系
//! - 被 `commands/` 调用，结果交给 `sqs/`
//! - 使用 `models/cutoffs.rs`

use crate::models::{CrystalType, CutoffSet};
use std::collections::BTreeMap;

/// 由晶格常数给出二体/三体截断距离
pub fn propose_cutoffs(lattice_parameter: f64, crystal: CrystalType) -> CutoffSet {
    let nearest = match crystal {
        CrystalType::Fcc => lattice_parameter / 2f64.sqrt(),
        CrystalType::Bcc => lattice_parameter * 3f64.sqrt() / 2.0,
    };

    let mut cutoffs = BTreeMap::new();
    cutoffs.insert(2, nearest);
    cutoffs.insert(3, lattice_parameter);
    CutoffSet::new(cutoffs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fcc_cutoffs() {
        let cutoffs = propose_cutoffs(3.58, CrystalType::Fcc);
        assert!((cutoffs.pair().unwrap() - 2.531).abs() < 1e-3);
        assert_eq!(cutoffs.triplet(), Some(3.58));
    }

    #[test]
    fn test_bcc_cutoffs() {
        let cutoffs = propose_cutoffs(2.87, CrystalType::Bcc);
        assert!((cutoffs.pair().unwrap() - 2.4855).abs() < 1e-4);
        assert_eq!(cutoffs.triplet(), Some(2.87));
    }

    #[test]
    fn test_pair_shorter_than_triplet() {
        for a in [0.1, 1.0, 2.5, 3.58, 10.0, 123.4] {
            for crystal in [CrystalType::Fcc, CrystalType::Bcc] {
                let cutoffs = propose_cutoffs(a, crystal);
                assert!(cutoffs.pair().unwrap() < cutoffs.triplet().unwrap());
            }
        }
    }

    #[test]
    fn test_override_and_order() {
        let cutoffs = propose_cutoffs(3.58, CrystalType::Fcc)
            .with_override(2, 7.0)
            .with_override(4, 4.0);
        let orders: Vec<u32> = cutoffs.iter().map(|(k, _)| k).collect();
        assert_eq!(orders, vec![2, 3, 4]);
        assert_eq!(cutoffs.pair(), Some(7.0));
        assert_eq!(cutoffs.to_string(), "{2: 7.0000, 3: 3.5800, 4: 4.0000}");
    }
}
