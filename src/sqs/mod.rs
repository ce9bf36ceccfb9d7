//! # SQS 搜索接口
//!
//! 外部 SQS 搜索（模拟退火/Monte-Carlo）作为可替换的能力注入：
//! 输入超胞结构与截断集合，输出按得分排序的候选结构。
//! 核心模块不依赖任何具体后端。
//!
//! ## 子模块
//! - `atat`: ATAT 输入/输出文件格式
//! - `mcsqs`: 以子进程调用 ATAT `corrdump` + `mcsqs` 的后端
//!
//! ## 依赖关系
//! - 被 `commands/search.rs` 使用
//! - 使用 `models/`

pub mod atat;
pub mod mcsqs;

use crate::error::Result;
use crate::models::{CutoffSet, Structure, SupercellStructure};

pub use mcsqs::{McsqsConfig, McsqsSearch};

/// 搜索得到的候选结构
#[derive(Debug, Clone)]
pub struct SqsCandidate {
    /// 候选结构
    pub structure: Structure,
    /// 相关函数偏差得分，越低越好；完全匹配为负无穷
    pub score: f64,
}

/// SQS 搜索后端
pub trait SqsSearch {
    /// 返回按得分升序排列的候选结构
    fn search(&self, supercell: &SupercellStructure, cutoffs: &CutoffSet)
        -> Result<Vec<SqsCandidate>>;
}

/// 按得分升序排序候选结构
pub fn rank_candidates(mut candidates: Vec<SqsCandidate>) -> Vec<SqsCandidate> {
    candidates.sort_by(|a, b| a.score.total_cmp(&b.score));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Lattice;

    fn candidate(score: f64) -> SqsCandidate {
        SqsCandidate {
            structure: Structure::new(format!("{}", score), Lattice::cubic(1.0), vec![]),
            score,
        }
    }

    #[test]
    fn test_rank_candidates() {
        let ranked = rank_candidates(vec![
            candidate(0.5),
            candidate(f64::NEG_INFINITY),
            candidate(-0.2),
        ]);
        let scores: Vec<f64> = ranked.iter().map(|c| c.score).collect();
        assert_eq!(scores, vec![f64::NEG_INFINITY, -0.2, 0.5]);
    }
}
