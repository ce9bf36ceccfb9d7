//! # composition 命令实现
//!
//! 解析合金化学式，显示原始系数、归一化后的原子分数，
//! 以及可选的超胞整数原子数。
//!
//! ## 依赖关系
//! - 使用 `cli/composition.rs` 定义的参数
//! - 使用 `parsers/formula.rs`, `alloy/normalize.rs`, `alloy/supercell.rs`
//! - 使用 `utils/output.rs`

use crate::alloy::{normalize, supercell::atom_counts};
use crate::cli::composition::CompositionArgs;
use crate::error::{Result, SqsError};
use crate::models::{Composition, RawCoefficients};
use crate::parsers::parse_formula;
use crate::utils::output;

use tabled::{Table, Tabled};

/// 成分表行
#[derive(Debug, Clone, Tabled)]
struct CompositionRow {
    #[tabled(rename = "Element")]
    element: String,
    #[tabled(rename = "Coefficient")]
    coefficient: String,
    #[tabled(rename = "Fraction")]
    fraction: String,
    #[tabled(rename = "Atoms")]
    atoms: String,
}

/// 执行 composition 命令
pub fn execute(args: CompositionArgs) -> Result<()> {
    output::print_header("Alloy Composition");

    let mut failed = 0;

    for formula in &args.formulas {
        match analyze_formula(formula) {
            Ok((raw, composition)) => {
                print_composition(&raw, &composition, args.atoms);
            }
            Err(e) => {
                output::print_error(&format!("{}", e));
                failed += 1;
            }
        }
    }

    output::print_separator();
    if failed > 0 {
        return Err(SqsError::Other(format!(
            "{} of {} formulas could not be normalized",
            failed,
            args.formulas.len()
        )));
    }

    output::print_done(&format!("Normalized {} formulas", args.formulas.len()));
    Ok(())
}

fn analyze_formula(formula: &str) -> Result<(RawCoefficients, Composition)> {
    let raw = parse_formula(formula)?;
    let composition = normalize(&raw)?;
    Ok((raw, composition))
}

fn build_rows(
    raw: &RawCoefficients,
    composition: &Composition,
    atoms: Option<usize>,
) -> Vec<CompositionRow> {
    let counts = atoms.map(|n| atom_counts(composition, n));

    composition
        .iter()
        .enumerate()
        .map(|(i, (element, fraction))| CompositionRow {
            element: element.to_string(),
            coefficient: match raw.get(element) {
                Some(c) if c.explicit => format!("{}", c.value),
                _ => "-".to_string(),
            },
            fraction: format!("{:.6}", fraction),
            atoms: counts
                .as_ref()
                .map(|c| c[i].1.to_string())
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect()
}

fn print_composition(raw: &RawCoefficients, composition: &Composition, atoms: Option<usize>) {
    let mode = if raw.is_stoichiometric() {
        "stoichiometric"
    } else {
        "mixed"
    };
    output::print_info(&format!(
        "{} ({}, {} elements) -> {}",
        raw.formula,
        mode,
        raw.len(),
        composition.label()
    ));

    let rows = build_rows(raw, composition, atoms);
    println!("{}", Table::new(&rows));
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_rows_mixed_formula() {
        let (raw, composition) = analyze_formula("Al0.875CoCrFeNi").unwrap();
        let rows = build_rows(&raw, &composition, Some(32));

        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].element, "Al");
        assert_eq!(rows[0].coefficient, "0.875");
        assert_eq!(rows[0].fraction, "0.875000");
        assert_eq!(rows[0].atoms, "28");
        assert_eq!(rows[1].coefficient, "-");
        assert_eq!(rows[1].atoms, "1");
    }

    #[test]
    fn test_build_rows_without_atoms() {
        let (raw, composition) = analyze_formula("Fe3Al").unwrap();
        let rows = build_rows(&raw, &composition, None);
        assert_eq!(rows[0].fraction, "0.750000");
        assert_eq!(rows[1].atoms, "-");
    }

    #[test]
    fn test_analyze_formula_errors() {
        assert!(matches!(
            analyze_formula("al0.5"),
            Err(SqsError::ParseError { .. })
        ));
        assert!(matches!(
            analyze_formula("Al0.6Co0.6Ni"),
            Err(SqsError::CompositionError { .. })
        ));
    }
}
