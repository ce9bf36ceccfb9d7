//! # inspect 命令实现
//!
//! 统计 POSCAR / `bestsqs.out` 结构的元素组成，可选与目标化学式对比。
//!
//! ## 依赖关系
//! - 使用 `cli/inspect.rs` 定义的参数
//! - 使用 `batch/collector.rs` 收集文件
//! - 使用 `parsers/poscar.rs`, `sqs/atat.rs`

use crate::batch::FileCollector;
use crate::cli::inspect::InspectArgs;
use crate::error::{Result, SqsError};
use crate::models::{Composition, Structure};
use crate::parsers::poscar;
use crate::sqs::atat;
use crate::utils::output;

use std::fs;
use std::path::Path;
use tabled::{Table, Tabled};

/// 元素统计表行
#[derive(Debug, Clone, Tabled)]
struct InspectRow {
    #[tabled(rename = "Element")]
    element: String,
    #[tabled(rename = "Atoms")]
    atoms: usize,
    #[tabled(rename = "Fraction")]
    fraction: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Deviation")]
    deviation: String,
}

/// 执行 inspect 命令
pub fn execute(args: InspectArgs) -> Result<()> {
    output::print_header("Structure Composition Report");

    if !args.input.exists() {
        return Err(SqsError::FileNotFound {
            path: args.input.display().to_string(),
        });
    }

    let target = args
        .formula
        .as_deref()
        .map(Composition::from_formula)
        .transpose()?;

    let files = FileCollector::new(args.input.clone())
        .with_pattern(&args.pattern)
        .recursive(args.recursive)
        .collect();

    if files.is_empty() {
        output::print_warning(&format!(
            "No matching files found with pattern '{}'",
            args.pattern
        ));
        return Ok(());
    }

    let mut failed = 0;
    for file in &files {
        match read_structure(file) {
            Ok(structure) => print_report(file, &structure, target.as_ref()),
            Err(e) => {
                output::print_error(&format!("{}", e));
                failed += 1;
            }
        }
    }

    output::print_separator();
    output::print_done(&format!(
        "Inspected {} files, {} failed",
        files.len(),
        failed
    ));

    Ok(())
}

/// 读取结构文件；`bestsqs*` 按 ATAT 格式解析，其余按 POSCAR
fn read_structure(path: &Path) -> Result<Structure> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    if file_name.starts_with("bestsqs") {
        let content = fs::read_to_string(path).map_err(|e| SqsError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        atat::parse_bestsqs(&content, &path.display().to_string())
    } else {
        poscar::parse_poscar_file(path)
    }
}

fn build_rows(structure: &Structure, target: Option<&Composition>) -> Vec<InspectRow> {
    let total = structure.sites.len() as f64;
    let counts = structure.element_counts();

    let mut rows: Vec<InspectRow> = counts
        .iter()
        .map(|(element, atoms)| {
            let fraction = *atoms as f64 / total;
            let goal = target.map(|t| t.fraction(element).unwrap_or(0.0));
            InspectRow {
                element: element.clone(),
                atoms: *atoms,
                fraction: format!("{:.6}", fraction),
                target: goal.map(|g| format!("{:.6}", g)).unwrap_or_else(|| "-".to_string()),
                deviation: goal
                    .map(|g| format!("{:+.6}", fraction - g))
                    .unwrap_or_else(|| "-".to_string()),
            }
        })
        .collect();

    // 目标成分中存在但结构中缺失的元素
    if let Some(target) = target {
        for (element, goal) in target.iter() {
            if !counts.iter().any(|(el, _)| el == element) {
                rows.push(InspectRow {
                    element: element.to_string(),
                    atoms: 0,
                    fraction: format!("{:.6}", 0.0),
                    target: format!("{:.6}", goal),
                    deviation: format!("{:+.6}", -goal),
                });
            }
        }
    }

    rows
}

fn print_report(path: &Path, structure: &Structure, target: Option<&Composition>) {
    let (a, b, c, alpha, beta, gamma) = structure.lattice.parameters();

    output::print_info(&format!("{}", path.display()));
    output::print_field("Formula", &structure.formula());
    output::print_field("Atoms", &structure.sites.len().to_string());
    output::print_field(
        "Cell",
        &format!(
            "{:.4} {:.4} {:.4} Å, {:.2} {:.2} {:.2}°",
            a, b, c, alpha, beta, gamma
        ),
    );
    output::print_field("Volume", &format!("{:.4} Å³", structure.lattice.volume()));

    println!("{}", Table::new(build_rows(structure, target)));
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Lattice, Site};

    fn structure() -> Structure {
        Structure::new(
            "test",
            Lattice::cubic(3.5),
            vec![
                Site::new("Co", [0.0, 0.0, 0.0]),
                Site::new("Co", [0.5, 0.5, 0.0]),
                Site::new("Ni", [0.5, 0.0, 0.5]),
                Site::new("Co", [0.0, 0.5, 0.5]),
            ],
        )
    }

    #[test]
    fn test_rows_without_target() {
        let rows = build_rows(&structure(), None);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].element, "Co");
        assert_eq!(rows[0].atoms, 3);
        assert_eq!(rows[0].fraction, "0.750000");
        assert_eq!(rows[1].target, "-");
    }

    #[test]
    fn test_rows_with_target() {
        let target = Composition::from_formula("CoNiFe").unwrap();
        let rows = build_rows(&structure(), Some(&target));

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].element, "Ni");
        assert_eq!(rows[1].deviation, "-0.083333");
        assert_eq!(rows[2].element, "Fe");
        assert_eq!(rows[2].atoms, 0);
        assert_eq!(rows[2].deviation, "-0.333333");
    }

    #[test]
    fn test_read_structure_dispatch() {
        let dir = std::env::temp_dir().join(format!("hea_sqs_inspect_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let bestsqs = dir.join("bestsqs.out");
        fs::write(
            &bestsqs,
            "1 0 0\n0 1 0\n0 0 1\n3.5 0 0\n0 3.5 0\n0 0 3.5\n0 0 0 Co\n1.75 1.75 0 Ni\n",
        )
        .unwrap();
        assert_eq!(read_structure(&bestsqs).unwrap().sites.len(), 2);

        let vasp = dir.join("CoNi.vasp");
        poscar::write_poscar_file(&structure(), &vasp).unwrap();
        assert_eq!(read_structure(&vasp).unwrap().formula(), "Co3Ni");

        fs::remove_dir_all(&dir).ok();
    }
}
