//! # 无序超胞构建器
//!
//! 按目标原子数构建立方超胞，并随机分配元素使位点计数实现目标成分。
//!
//! ## 算法概述
//! 1. 以代表性半径（默认：原子分数最大的元素）估算晶格常数
//! 2. 计算立方缩放因子 (n, n, n)，生成 `n³ × 每胞原子数` 个位点
//! 3. 按 `round(f × N)` 计算各元素原子数，并把舍入偏差归到分数最大的元素
//! 4. 展平元素标签并用调用方提供的随机数发生器打乱
//! 5. 标签依次赋给前 N 个位点，多余的尾部位点删除
//!
//! ## 位点顺序
//! `i (x) → j (y) → k (z) → 基元原子`，截断时按此顺序的逆序丢弃。
//!
//! ## 依赖关系
//! - 被 `commands/` 调用
//! - 使用 `alloy/geometry.rs`
//! - 使用 `rand` 打乱元素标签

use crate::alloy::geometry::{estimate_lattice_parameter, RadiusReference};
use crate::error::{Result, SqsError};
use crate::models::{Composition, CrystalType, Lattice, RadiusTable, Site, Structure, SupercellStructure};

use rand::seq::SliceRandom;
use rand::Rng;
use std::cmp::Ordering;

/// 计算容纳目标原子数所需的立方缩放因子
pub fn scaling_factors(target_atom_count: usize, crystal: CrystalType) -> Result<(usize, usize, usize)> {
    if target_atom_count == 0 {
        return Err(SqsError::InvalidArgument(
            "target atom count must be positive".to_string(),
        ));
    }

    let cells = target_atom_count.div_ceil(crystal.atoms_per_cell());

    let mut n = 1;
    while n * n * n < cells {
        n += 1;
    }

    Ok((n, n, n))
}

/// 各元素的整数原子数（按成分顺序），总和恰为目标原子数
pub fn atom_counts(composition: &Composition, target_atom_count: usize) -> Vec<(String, usize)> {
    let fractions: Vec<(&str, f64)> = composition.iter().collect();
    let mut counts: Vec<i64> = fractions
        .iter()
        .map(|(_, f)| (f * target_atom_count as f64).round_ties_even() as i64)
        .collect();

    // 分数从大到小，并列时保持成分顺序
    let mut order: Vec<usize> = (0..fractions.len()).collect();
    order.sort_by(|&a, &b| {
        fractions[b]
            .1
            .partial_cmp(&fractions[a].1)
            .unwrap_or(Ordering::Equal)
    });

    let drift = target_atom_count as i64 - counts.iter().sum::<i64>();
    if drift > 0 {
        counts[order[0]] += drift;
    } else if drift < 0 {
        let mut deficit = -drift;
        for &idx in &order {
            let take = deficit.min(counts[idx]);
            counts[idx] -= take;
            deficit -= take;
            if deficit == 0 {
                break;
            }
        }
    }

    fractions
        .iter()
        .zip(counts)
        .map(|((el, _), n)| (el.to_string(), n as usize))
        .collect()
}

/// 超胞中全部位点的分数坐标（位点顺序见模块文档）
pub fn lattice_sites(crystal: CrystalType, n: usize) -> Vec<[f64; 3]> {
    let scale = n as f64;
    let mut positions = Vec::with_capacity(n * n * n * crystal.atoms_per_cell());

    for i in 0..n {
        for j in 0..n {
            for k in 0..n {
                for b in crystal.basis() {
                    positions.push([
                        (i as f64 + b[0]) / scale,
                        (j as f64 + b[1]) / scale,
                        (k as f64 + b[2]) / scale,
                    ]);
                }
            }
        }
    }

    positions
}

/// 无序超胞构建器
pub struct SupercellBuilder<'a> {
    /// 原子半径表
    radii: &'a RadiusTable,
    /// 代表性半径策略
    reference: RadiusReference,
}

impl<'a> SupercellBuilder<'a> {
    pub fn new(radii: &'a RadiusTable) -> Self {
        Self {
            radii,
            reference: RadiusReference::default(),
        }
    }

    /// 设置代表性半径策略
    pub fn with_reference(mut self, reference: RadiusReference) -> Self {
        self.reference = reference;
        self
    }

    /// 参考晶格的晶格常数
    pub fn lattice_parameter(&self, composition: &Composition, crystal: CrystalType) -> Result<f64> {
        let radius = self.reference.radius(composition, self.radii)?;
        Ok(estimate_lattice_parameter(radius, crystal))
    }

    /// 构建恰含 `target_atom_count` 个位点的无序超胞
    pub fn build<R: Rng + ?Sized>(
        &self,
        composition: &Composition,
        crystal: CrystalType,
        target_atom_count: usize,
        rng: &mut R,
    ) -> Result<SupercellStructure> {
        let a = self.lattice_parameter(composition, crystal)?;
        let scaling = scaling_factors(target_atom_count, crystal)?;
        let (n, _, _) = scaling;

        let positions = lattice_sites(crystal, n);
        debug_assert!(positions.len() >= target_atom_count);

        let mut labels: Vec<String> = atom_counts(composition, target_atom_count)
            .into_iter()
            .flat_map(|(el, count)| std::iter::repeat(el).take(count))
            .collect();
        labels.shuffle(rng);

        // 多余的尾部位点在 zip 中被丢弃
        let sites: Vec<Site> = positions
            .into_iter()
            .zip(labels)
            .map(|(position, element)| Site::new(element, position))
            .collect();

        let name = format!(
            "{}_{}",
            composition.formula.split_whitespace().collect::<String>(),
            crystal
        );
        let structure = Structure::new(name, Lattice::cubic(a * n as f64), sites);

        Ok(SupercellStructure::new(crystal, a, scaling, structure))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn count_of(structure: &SupercellStructure, element: &str) -> usize {
        structure
            .sites()
            .iter()
            .filter(|s| s.element == element)
            .count()
    }

    #[test]
    fn test_scaling_factors_cover_target() {
        for n_atoms in 1..=300 {
            let (n, ny, nz) = scaling_factors(n_atoms, CrystalType::Fcc).unwrap();
            assert_eq!((n, n), (ny, nz));
            assert!(4 * n * n * n >= n_atoms);
            assert!(n == 1 || 4 * (n - 1).pow(3) < n_atoms);

            let (m, _, _) = scaling_factors(n_atoms, CrystalType::Bcc).unwrap();
            assert!(2 * m * m * m >= n_atoms);
            assert!(m == 1 || 2 * (m - 1).pow(3) < n_atoms);
        }
    }

    #[test]
    fn test_scaling_factors_exact_cubes() {
        assert_eq!(scaling_factors(32, CrystalType::Fcc).unwrap(), (2, 2, 2));
        assert_eq!(scaling_factors(33, CrystalType::Fcc).unwrap(), (3, 3, 3));
        assert_eq!(scaling_factors(16, CrystalType::Bcc).unwrap(), (2, 2, 2));
        assert_eq!(scaling_factors(100, CrystalType::Fcc).unwrap(), (3, 3, 3));
    }

    #[test]
    fn test_scaling_factors_rejects_zero() {
        assert!(matches!(
            scaling_factors(0, CrystalType::Bcc),
            Err(SqsError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_atom_counts_exact() {
        let comp = Composition::from_formula("Al0.875CoCrFeNi").unwrap();
        let counts = atom_counts(&comp, 32);
        assert_eq!(
            counts,
            vec![
                ("Al".to_string(), 28),
                ("Co".to_string(), 1),
                ("Cr".to_string(), 1),
                ("Fe".to_string(), 1),
                ("Ni".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_atom_counts_positive_drift_goes_to_largest() {
        // 5 × 6.4 -> 6 each, 2 missing
        let comp = Composition::from_formula("AlCoCrFeNi").unwrap();
        let counts = atom_counts(&comp, 32);
        assert_eq!(counts[0], ("Al".to_string(), 8));
        assert!(counts[1..].iter().all(|(_, n)| *n == 6));
    }

    #[test]
    fn test_atom_counts_negative_drift_cascades() {
        // 7 × 0.571 -> 1 each = 7, three too many
        let comp = Composition::from_formula("AlCoCrFeNiCuTi").unwrap();
        let counts = atom_counts(&comp, 4);
        let values: Vec<usize> = counts.iter().map(|(_, n)| *n).collect();
        assert_eq!(values, vec![0, 0, 0, 1, 1, 1, 1]);
    }

    #[test]
    fn test_atom_counts_always_sum_to_target() {
        for formula in ["CoCrFeNi", "Al0.875CoCrFeNi", "Al4CoCrFeNi", "AlFe0.2CrCuCo", "AlFeTiVZrCuNiC"] {
            let comp = Composition::from_formula(formula).unwrap();
            for target in 1..=128 {
                let total: usize = atom_counts(&comp, target).iter().map(|(_, n)| n).sum();
                assert_eq!(total, target, "{} at {}", formula, target);
            }
        }
    }

    #[test]
    fn test_build_equiatomic_fcc_32() {
        let radii = RadiusTable::builtin();
        let comp = Composition::from_formula("CoCrFeNi").unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let structure = SupercellBuilder::new(&radii)
            .build(&comp, CrystalType::Fcc, 32, &mut rng)
            .unwrap();

        assert_eq!(structure.num_sites(), 32);
        for el in ["Co", "Cr", "Fe", "Ni"] {
            assert_eq!(count_of(&structure, el), 8);
        }
        assert_eq!(structure.scaling(), (2, 2, 2));
        assert_eq!(structure.structure().name, "CoCrFeNi_FCC");

        // 并列时参考元素取 Co (r = 1.35)
        let a = 1.35 * 2f64.sqrt();
        assert!((structure.lattice_parameter() - a).abs() < 1e-12);
        let (cell, _, _, _, _, _) = structure.structure().lattice.parameters();
        assert!((cell - 2.0 * a).abs() < 1e-9);
    }

    #[test]
    fn test_build_matches_reconciled_counts() {
        let radii = RadiusTable::builtin();
        let mut rng = StdRng::seed_from_u64(11);

        for formula in ["Al0.875CoCrFeNi", "Al4CoCrFeNi", "AlFeTiVZrCuNiC"] {
            let comp = Composition::from_formula(formula).unwrap();
            for crystal in [CrystalType::Fcc, CrystalType::Bcc] {
                for target in [1, 7, 30, 36, 54, 100] {
                    let structure = SupercellBuilder::new(&radii)
                        .build(&comp, crystal, target, &mut rng)
                        .unwrap();
                    assert_eq!(structure.num_sites(), target);
                    for (el, n) in atom_counts(&comp, target) {
                        assert_eq!(count_of(&structure, &el), n, "{} {} {}", formula, crystal, target);
                    }
                }
            }
        }
    }

    #[test]
    fn test_build_trims_trailing_sites() {
        let radii = RadiusTable::builtin();
        let comp = Composition::from_formula("CoNi").unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        let structure = SupercellBuilder::new(&radii)
            .build(&comp, CrystalType::Bcc, 10, &mut rng)
            .unwrap();

        // 2 × 2³ = 16 个位点，保留前 10 个
        let expected = lattice_sites(CrystalType::Bcc, 2);
        let kept: Vec<[f64; 3]> = structure.sites().iter().map(|s| s.position).collect();
        assert_eq!(kept, expected[..10].to_vec());
    }

    #[test]
    fn test_build_is_reproducible_with_seed() {
        let radii = RadiusTable::builtin();
        let comp = Composition::from_formula("AlCoCrFeNi").unwrap();
        let builder = SupercellBuilder::new(&radii);

        let a = builder
            .build(&comp, CrystalType::Fcc, 64, &mut StdRng::seed_from_u64(42))
            .unwrap();
        let b = builder
            .build(&comp, CrystalType::Fcc, 64, &mut StdRng::seed_from_u64(42))
            .unwrap();
        let c = builder
            .build(&comp, CrystalType::Fcc, 64, &mut StdRng::seed_from_u64(43))
            .unwrap();

        assert_eq!(a, b);
        assert_ne!(a.sites(), c.sites());
    }

    #[test]
    fn test_build_with_weighted_reference() {
        let radii = RadiusTable::builtin();
        let comp = Composition::from_formula("Al0.5CoNi").unwrap();
        let builder = SupercellBuilder::new(&radii).with_reference(RadiusReference::Weighted);

        let a = builder.lattice_parameter(&comp, CrystalType::Bcc).unwrap();
        assert!((a - 2.0 * 1.30 / 3f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_build_unknown_element_radius() {
        let radii = RadiusTable::new();
        let comp = Composition::from_formula("CoNi").unwrap();
        let result = SupercellBuilder::new(&radii).build(
            &comp,
            CrystalType::Fcc,
            8,
            &mut StdRng::seed_from_u64(0),
        );
        assert!(matches!(result, Err(SqsError::UnknownElement { .. })));
    }
}
