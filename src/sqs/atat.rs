//! # ATAT 文件格式
//!
//! `mcsqs` 的输入 `rndstr.in` 以及输出 `bestsqs.out` / `bestcorr.out`。
//!
//! ## rndstr.in
//! ```text
//! a a a 90 90 90          # 坐标系（立方，单位 Å）
//! 0.0 0.5 0.5             # 原胞向量（以坐标系为单位）
//! 0.5 0.0 0.5
//! 0.5 0.5 0.0
//! 0 0 0 Al=0.875,Co=0.03125,...
//! ```
//!
//! ## bestsqs.out
//! ```text
//! 3 行坐标系（或 1 行 a b c alpha beta gamma）
//! 3 行超胞向量（以坐标系为单位）
//! x y z Element           # 以坐标系为单位的笛卡尔坐标
//! ```
//! 笛卡尔坐标 = 行向量 · 坐标系矩阵。
//!
//! ## 依赖关系
//! - 被 `sqs/mcsqs.rs` 使用
//! - 使用 `models/structure.rs`
//! - 使用 `regex` 提取目标函数值

use crate::error::{Result, SqsError};
use crate::models::{CutoffSet, Lattice, Site, Structure, SupercellStructure};

use regex::Regex;

/// 生成 `rndstr.in`：所选晶格的原胞，唯一位点占据率等于超胞实际成分
pub fn rndstr_string(supercell: &SupercellStructure) -> String {
    let a = supercell.lattice_parameter();
    let total = supercell.num_sites() as f64;

    let mut result = String::new();
    result.push_str(&format!("{:.6} {:.6} {:.6} 90 90 90\n", a, a, a));

    for row in supercell.crystal().primitive_vectors() {
        result.push_str(&format!("{:.6} {:.6} {:.6}\n", row[0], row[1], row[2]));
    }

    let occupancy: Vec<String> = supercell
        .element_counts()
        .iter()
        .map(|(el, n)| format!("{}={:.6}", el, *n as f64 / total))
        .collect();
    result.push_str(&format!(
        "{:.6} {:.6} {:.6} {}\n",
        0.0,
        0.0,
        0.0,
        occupancy.join(",")
    ));

    result
}

/// `corrdump` 参数：按截断集合生成 `-2=`, `-3=`, ...
pub fn corrdump_args(cutoffs: &CutoffSet) -> Vec<String> {
    let mut args: Vec<String> = ["-l=rndstr.in", "-ro", "-noe", "-nop", "-clus"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    args.extend(cutoffs.iter().map(|(order, d)| format!("-{}={:.4}", order, d)));
    args
}

fn parse_row(line: &str, expected: usize) -> Option<Vec<f64>> {
    let values: Vec<f64> = line
        .split_whitespace()
        .take(expected)
        .map(|s| s.parse().ok())
        .collect::<Option<_>>()?;
    (values.len() == expected).then_some(values)
}

/// 解析 `bestsqs.out`
pub fn parse_bestsqs(content: &str, name: &str) -> Result<Structure> {
    let fail = |reason: String| SqsError::FileFormatError {
        format: "bestsqs.out".to_string(),
        path: name.to_string(),
        reason,
    };

    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    // 坐标系：a b c alpha beta gamma 或 3 行向量
    let (coord_system, mut idx) = match lines.first().and_then(|l| parse_row(l, 6)) {
        Some(p) if lines[0].split_whitespace().count() == 6 => (
            Lattice::from_parameters(p[0], p[1], p[2], p[3], p[4], p[5]).matrix,
            1,
        ),
        _ => {
            let mut m = [[0.0; 3]; 3];
            for (i, row) in m.iter_mut().enumerate() {
                let v = lines
                    .get(i)
                    .and_then(|l| parse_row(l, 3))
                    .ok_or_else(|| fail(format!("invalid coordinate system at row {}", i + 1)))?;
                *row = [v[0], v[1], v[2]];
            }
            (m, 3)
        }
    };
    let coord_system = Lattice::from_vectors(coord_system);

    let mut cell = [[0.0; 3]; 3];
    for (i, row) in cell.iter_mut().enumerate() {
        let v = lines
            .get(idx)
            .and_then(|l| parse_row(l, 3))
            .ok_or_else(|| fail(format!("invalid lattice vector {}", i + 1)))?;
        *row = coord_system.to_cartesian([v[0], v[1], v[2]]);
        idx += 1;
    }
    let lattice = Lattice::from_vectors(cell);

    let mut sites = Vec::new();
    for line in &lines[idx..] {
        let v = parse_row(line, 3).ok_or_else(|| fail(format!("invalid atom line '{}'", line)))?;
        let element = line
            .split_whitespace()
            .nth(3)
            .map(|s| s.split('=').next().unwrap_or(s))
            .ok_or_else(|| fail(format!("missing species in '{}'", line)))?;

        let cart = coord_system.to_cartesian([v[0], v[1], v[2]]);
        let frac = lattice
            .to_fractional(cart)
            .ok_or_else(|| fail("degenerate supercell".to_string()))?;
        let wrapped = frac.map(|x| {
            let w = x.rem_euclid(1.0);
            if (1.0 - w) < 1e-8 {
                0.0
            } else {
                w
            }
        });
        sites.push(Site::new(element, wrapped));
    }

    if sites.is_empty() {
        return Err(fail("no atoms".to_string()));
    }

    Ok(Structure::new(name, lattice, sites))
}

/// 解析 `bestcorr.out` 的目标函数；`Perfect_match` 记为负无穷
pub fn parse_objective(content: &str) -> Result<f64> {
    let pattern = Regex::new(r"Objective_function\s*=\s*(\S+)").unwrap();

    let value = pattern
        .captures_iter(content)
        .last()
        .map(|c| c[1].to_string())
        .ok_or_else(|| SqsError::FileFormatError {
            format: "bestcorr.out".to_string(),
            path: "bestcorr.out".to_string(),
            reason: "no Objective_function line".to_string(),
        })?;

    if value.eq_ignore_ascii_case("perfect_match") {
        return Ok(f64::NEG_INFINITY);
    }

    value.parse().map_err(|_| SqsError::FileFormatError {
        format: "bestcorr.out".to_string(),
        path: "bestcorr.out".to_string(),
        reason: format!("invalid objective value '{}'", value),
    })
}
