//! # VASP POSCAR 格式读写
//!
//! 写出构建好的无序超胞 / SQS 结构，并读回以检查成分。
//!
//! ## POSCAR 格式说明
//! ```text
//! Comment line (structure name)
//! 1.0                    # scaling factor
//! a1 a2 a3               # lattice vector a
//! b1 b2 b3               # lattice vector b
//! c1 c2 c3               # lattice vector c
//! Element1 Element2 ...  # element symbols (VASP 5+)
//! n1 n2 ...              # number of atoms per element
//! Selective dynamics     # optional
//! Direct/Cartesian       # coordinate type
//! x1 y1 z1               # atom positions
//! ...
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/structure.rs`

use crate::error::{Result, SqsError};
use crate::models::{Lattice, Site, Structure};
use std::fs;
use std::path::Path;

/// 解析 POSCAR/CONTCAR 文件
pub fn parse_poscar_file(path: &Path) -> Result<Structure> {
    let content = fs::read_to_string(path).map_err(|e| SqsError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_poscar_content(
        &content,
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown"),
    )
}

/// 从字符串内容解析 POSCAR 格式
pub fn parse_poscar_content(content: &str, default_name: &str) -> Result<Structure> {
    let lines: Vec<&str> = content.lines().collect();
    let fail = |reason: String| SqsError::FileFormatError {
        format: "poscar".to_string(),
        path: default_name.to_string(),
        reason,
    };

    if lines.len() < 8 {
        return Err(fail("File too short".to_string()));
    }

    // Line 0: Comment/name
    let name = lines[0].trim().to_string();
    let name = if name.is_empty() {
        default_name.to_string()
    } else {
        name
    };

    // Line 1: Scaling factor
    let scale: f64 = lines[1].trim().parse().unwrap_or(1.0);

    // Lines 2-4: Lattice vectors
    let mut matrix = [[0.0; 3]; 3];
    for i in 0..3 {
        let parts: Vec<f64> = lines[2 + i]
            .split_whitespace()
            .filter_map(|s| s.parse().ok())
            .collect();
        if parts.len() < 3 {
            return Err(fail(format!("Invalid lattice vector at line {}", 3 + i)));
        }
        matrix[i] = [parts[0] * scale, parts[1] * scale, parts[2] * scale];
    }
    let lattice = Lattice::from_vectors(matrix);

    // Line 5: Element symbols (VASP 5+)；VASP 4 无元素行，无法检查成分
    let elements: Vec<String> = lines[5].split_whitespace().map(|s| s.to_string()).collect();
    if elements.is_empty() || elements[0].parse::<f64>().is_ok() {
        return Err(fail("Missing element symbol line (VASP 4 format)".to_string()));
    }
    let counts: Vec<usize> = lines[6]
        .split_whitespace()
        .filter_map(|s| s.parse().ok())
        .collect();
    if counts.len() != elements.len() {
        return Err(fail(format!(
            "{} element symbols but {} counts",
            elements.len(),
            counts.len()
        )));
    }

    // Check for "Selective dynamics" line
    let mut coord_line = 7;
    if lines[coord_line]
        .trim()
        .to_lowercase()
        .starts_with("selective")
    {
        coord_line += 1;
    }

    if lines.len() <= coord_line {
        return Err(fail("Missing coordinate type line".to_string()));
    }

    let coord_type = lines[coord_line].trim().to_lowercase();
    let is_cartesian = coord_type.starts_with('c') || coord_type.starts_with('k');

    // Parse atom positions
    let mut sites: Vec<Site> = Vec::new();
    let mut line_idx = coord_line + 1;

    for (elem, &count) in elements.iter().zip(counts.iter()) {
        for _ in 0..count {
            let parts: Vec<f64> = lines
                .get(line_idx)
                .map(|l| {
                    l.split_whitespace()
                        .take(3)
                        .filter_map(|s| s.parse().ok())
                        .collect()
                })
                .unwrap_or_default();

            if parts.len() < 3 {
                return Err(fail(format!("Invalid atom position at line {}", line_idx + 1)));
            }

            let position = if is_cartesian {
                let cart = [parts[0] * scale, parts[1] * scale, parts[2] * scale];
                lattice
                    .to_fractional(cart)
                    .ok_or_else(|| fail("Degenerate lattice".to_string()))?
            } else {
                [parts[0], parts[1], parts[2]]
            };
            sites.push(Site::new(elem.clone(), position));
            line_idx += 1;
        }
    }

    Ok(Structure::new(name, lattice, sites))
}

/// 将结构转换为 POSCAR 格式字符串（按元素首次出现顺序分组）
pub fn to_poscar_string(structure: &Structure) -> String {
    let order = structure.species_order();

    let mut result = String::new();

    // Line 0: Comment
    result.push_str(&format!("{}\n", structure.name));

    // Line 1: Scale
    result.push_str("1.0\n");

    // Lines 2-4: Lattice
    for row in &structure.lattice.matrix {
        result.push_str(&format!(
            "  {:16.10}  {:16.10}  {:16.10}\n",
            row[0], row[1], row[2]
        ));
    }

    // Line 5: Elements
    result.push_str(&format!("   {}\n", order.join("   ")));

    // Line 6: Counts
    let counts: Vec<String> = structure
        .element_counts()
        .iter()
        .map(|(_, n)| n.to_string())
        .collect();
    result.push_str(&format!("   {}\n", counts.join("   ")));

    // Coordinate type
    result.push_str("Direct\n");

    // Atom positions
    for elem in &order {
        for site in structure.sites.iter().filter(|s| s.element == *elem) {
            result.push_str(&format!(
                "  {:16.10}  {:16.10}  {:16.10}\n",
                site.position[0], site.position[1], site.position[2]
            ));
        }
    }

    result
}

/// 写出 POSCAR 文件
pub fn write_poscar_file(structure: &Structure, path: &Path) -> Result<()> {
    fs::write(path, to_poscar_string(structure)).map_err(|e| SqsError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_poscar_vasp5() {
        let content = r#"CoNi
1.0
3.52 0.0 0.0
0.0 3.52 0.0
0.0 0.0 3.52
Co Ni
2 2
Direct
0.0 0.0 0.0
0.5 0.5 0.0
0.5 0.0 0.5
0.0 0.5 0.5
"#;
        let structure = parse_poscar_content(content, "CoNi").unwrap();
        assert_eq!(structure.name, "CoNi");
        assert_eq!(structure.sites.len(), 4);
        assert_eq!(
            structure.element_counts(),
            vec![("Co".to_string(), 2), ("Ni".to_string(), 2)]
        );
    }

    #[test]
    fn test_parse_poscar_cartesian_with_scale() {
        let content = r#"Fe
2.0
1.435 0.0 0.0
0.0 1.435 0.0
0.0 0.0 1.435
Fe
2
Cartesian
0.0 0.0 0.0
0.7175 0.7175 0.7175
"#;
        let structure = parse_poscar_content(content, "Fe").unwrap();
        let (a, _, _, _, _, _) = structure.lattice.parameters();
        assert!((a - 2.87).abs() < 1e-9);
        for x in structure.sites[1].position {
            assert!((x - 0.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_parse_poscar_selective_dynamics() {
        let content = r#"Fe with selective
1.0
2.87 0.0 0.0
0.0 2.87 0.0
0.0 0.0 2.87
Fe
2
Selective dynamics
Direct
0.0 0.0 0.0 T T T
0.5 0.5 0.5 F F F
"#;
        let structure = parse_poscar_content(content, "Fe").unwrap();
        assert_eq!(structure.sites.len(), 2);
    }

    #[test]
    fn test_parse_poscar_rejects_missing_atoms() {
        let content = "x\n1.0\n1 0 0\n0 1 0\n0 0 1\nFe\n3\nDirect\n0 0 0\n0.5 0.5 0.5\n";
        assert!(matches!(
            parse_poscar_content(content, "x"),
            Err(SqsError::FileFormatError { .. })
        ));
    }

    #[test]
    fn test_poscar_groups_interleaved_species() {
        let sites = vec![
            Site::new("Fe", [0.0, 0.0, 0.0]),
            Site::new("Al", [0.5, 0.5, 0.0]),
            Site::new("Fe", [0.5, 0.0, 0.5]),
        ];
        let structure = Structure::new("AlFe2", Lattice::cubic(3.6), sites);

        let text = to_poscar_string(&structure);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[5].split_whitespace().collect::<Vec<_>>(), vec!["Fe", "Al"]);
        assert_eq!(lines[6].split_whitespace().collect::<Vec<_>>(), vec!["2", "1"]);
        assert_eq!(lines[7], "Direct");
        assert_eq!(lines.len(), 8 + 3);

        let parsed = parse_poscar_content(&text, "AlFe2").unwrap();
        assert_eq!(parsed.formula(), "AlFe2");
        assert!((parsed.sites[1].position[2] - 0.5).abs() < 1e-9);
    }
}
