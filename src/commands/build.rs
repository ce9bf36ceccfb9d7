//! # build 命令实现
//!
//! 由化学式构建无序 FCC/BCC 超胞，写出 POSCAR，并给出截断距离建议。
//!
//! ## 功能
//! - 载入原子半径表（内置 + 可选 CSV 覆盖）
//! - 构建超胞并报告晶格常数、缩放因子、实际原子数
//! - 按 `--cutoff` 覆盖截断距离
//!
//! ## 依赖关系
//! - 使用 `cli/build.rs` 定义的参数
//! - 使用 `alloy/`, `parsers/poscar.rs`, `parsers/radii.rs`
//! - 被 `commands/search.rs` 复用（`prepare_supercell`, `resolve_cutoffs`, `report_supercell`）

use crate::alloy::{propose_cutoffs, SupercellBuilder};
use crate::cli::build::{BuildArgs, StructureOptions};
use crate::error::Result;
use crate::models::{Composition, CrystalType, CutoffSet, SupercellStructure};
use crate::parsers::{poscar, radii};
use crate::utils::output;

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tabled::{Table, Tabled};

/// 原子数表行
#[derive(Debug, Clone, Tabled)]
struct CountRow {
    #[tabled(rename = "Element")]
    element: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Atoms")]
    atoms: usize,
    #[tabled(rename = "Realized")]
    realized: String,
}

/// 执行 build 命令
pub fn execute(args: BuildArgs) -> Result<()> {
    output::print_header("Disordered Supercell Construction");

    let (composition, supercell) = prepare_supercell(&args.formula, &args.structure)?;
    let cutoffs = resolve_cutoffs(&supercell, &args.cutoffs);

    report_supercell(&composition, &supercell, &cutoffs);

    let path = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("{}.vasp", supercell.structure().name)));
    poscar::write_poscar_file(supercell.structure(), &path)?;

    output::print_success(&format!(
        "Wrote {} atoms to '{}'",
        supercell.num_sites(),
        path.display()
    ));

    Ok(())
}

/// 按种子创建随机数发生器；无种子时取系统熵
pub(crate) fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// 解析化学式并构建超胞
pub(crate) fn prepare_supercell(
    formula: &str,
    options: &StructureOptions,
) -> Result<(Composition, SupercellStructure)> {
    let crystal: CrystalType = options.crystal.parse()?;

    let radii = radii::load_radius_table(options.radii.as_deref())?;
    if let Some(path) = &options.radii {
        output::print_info(&format!(
            "Using radius overrides from '{}' ({} elements known)",
            path.display(),
            radii.len()
        ));
    }

    let composition = Composition::from_formula(formula)?;
    let mut rng = make_rng(options.seed);

    let supercell = SupercellBuilder::new(&radii)
        .with_reference(options.reference.into())
        .build(&composition, crystal, options.atoms, &mut rng)?;

    Ok((composition, supercell))
}

/// 建议截断距离，再应用用户覆盖
pub(crate) fn resolve_cutoffs(
    supercell: &SupercellStructure,
    overrides: &[(u32, f64)],
) -> CutoffSet {
    overrides.iter().fold(
        propose_cutoffs(supercell.lattice_parameter(), supercell.crystal()),
        |set, &(order, distance)| set.with_override(order, distance),
    )
}

/// 成分中分配到 0 个原子的元素
pub(crate) fn missing_elements(
    composition: &Composition,
    supercell: &SupercellStructure,
) -> Vec<String> {
    let counts = supercell.element_counts();
    composition
        .elements()
        .filter(|el| !counts.iter().any(|(c, _)| c == el))
        .map(str::to_string)
        .collect()
}

fn count_rows(composition: &Composition, supercell: &SupercellStructure) -> Vec<CountRow> {
    let counts = supercell.element_counts();
    let total = supercell.num_sites() as f64;

    composition
        .iter()
        .map(|(element, fraction)| {
            let atoms = counts
                .iter()
                .find(|(el, _)| el == element)
                .map(|(_, n)| *n)
                .unwrap_or(0);
            CountRow {
                element: element.to_string(),
                target: format!("{:.6}", fraction),
                atoms,
                realized: format!("{:.6}", atoms as f64 / total),
            }
        })
        .collect()
}

/// 打印超胞摘要
pub(crate) fn report_supercell(
    composition: &Composition,
    supercell: &SupercellStructure,
    cutoffs: &CutoffSet,
) {
    let (nx, ny, nz) = supercell.scaling();

    output::print_info(&format!(
        "Composition: {} ({} elements)",
        composition,
        composition.len()
    ));
    output::print_field(
        "Lattice",
        &format!(
            "{} ({}, #{})",
            supercell.crystal(),
            supercell.crystal().space_group(),
            supercell.crystal().space_group_number()
        ),
    );
    output::print_field(
        "Lattice parameter",
        &format!("{:.4} Å", supercell.lattice_parameter()),
    );
    output::print_field("Scaling", &format!("{}x{}x{}", nx, ny, nz));
    output::print_field("Atoms", &supercell.num_sites().to_string());
    output::print_field("Cutoffs", &cutoffs.to_string());
    println!();

    println!("{}", Table::new(count_rows(composition, supercell)));

    for element in missing_elements(composition, supercell) {
        output::print_warning(&format!(
            "{} received no atoms at {} sites; increase --atoms to represent it",
            element,
            supercell.num_sites()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::build::ReferenceRadius;

    fn options(crystal: &str, atoms: usize) -> StructureOptions {
        StructureOptions {
            crystal: crystal.to_string(),
            atoms,
            radii: None,
            reference: ReferenceRadius::Dominant,
            seed: Some(42),
        }
    }

    #[test]
    fn test_prepare_supercell() {
        let (composition, supercell) =
            prepare_supercell("Al0.875CoCrFeNi", &options("FCC", 32)).unwrap();

        assert_eq!(composition.len(), 5);
        assert_eq!(supercell.num_sites(), 32);
        assert_eq!(supercell.structure().name, "Al0.875CoCrFeNi_FCC");
        assert!(missing_elements(&composition, &supercell).is_empty());
    }

    #[test]
    fn test_prepare_supercell_rejects_crystal() {
        assert!(prepare_supercell("CoNi", &options("hcp", 32)).is_err());
    }

    #[test]
    fn test_missing_elements_for_small_cell() {
        let (composition, supercell) =
            prepare_supercell("Al0.875CoCrFeNi", &options("bcc", 8)).unwrap();
        // 8 × 0.03125 = 0.25 -> 0 个原子
        assert_eq!(
            missing_elements(&composition, &supercell),
            vec!["Co", "Cr", "Fe", "Ni"]
        );
    }

    #[test]
    fn test_resolve_cutoffs_with_override() {
        let (_, supercell) = prepare_supercell("CoCrFeNi", &options("fcc", 32)).unwrap();
        let cutoffs = resolve_cutoffs(&supercell, &[(2, 7.0)]);

        assert_eq!(cutoffs.pair(), Some(7.0));
        let expected = propose_cutoffs(supercell.lattice_parameter(), supercell.crystal());
        assert_eq!(cutoffs.triplet(), expected.triplet());
    }

    #[test]
    fn test_count_rows() {
        let (composition, supercell) = prepare_supercell("Fe3Al", &options("bcc", 16)).unwrap();
        let rows = count_rows(&composition, &supercell);
        assert_eq!(rows[0].atoms, 12);
        assert_eq!(rows[1].atoms, 4);
        assert_eq!(rows[1].realized, "0.250000");
    }
}
