//! # 原子半径 CSV 读取
//!
//! ```text
//! element,radius
//! Al,1.43
//! Co,1.25
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `csv` + `serde` 反序列化

use crate::error::{Result, SqsError};
use crate::models::RadiusTable;

use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RadiusRow {
    element: String,
    radius: f64,
}

/// 读取半径 CSV 文件
pub fn read_radius_file(path: &Path) -> Result<RadiusTable> {
    let file = File::open(path).map_err(|e| SqsError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    read_radius_csv(file, &path.display().to_string())
}

/// 从任意 reader 读取半径表
pub fn read_radius_csv<R: Read>(reader: R, source_name: &str) -> Result<RadiusTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut table = RadiusTable::new();
    for row in rdr.deserialize() {
        let row: RadiusRow = row?;
        if !row.radius.is_finite() || row.radius <= 0.0 {
            return Err(SqsError::FileFormatError {
                format: "radius csv".to_string(),
                path: source_name.to_string(),
                reason: format!("radius of '{}' must be positive", row.element),
            });
        }
        table.insert(row.element, row.radius);
    }

    Ok(table)
}

/// 内置表叠加可选的 CSV 覆盖
pub fn load_radius_table(path: Option<&Path>) -> Result<RadiusTable> {
    let builtin = RadiusTable::builtin();
    match path {
        Some(p) => Ok(builtin.merge(read_radius_file(p)?)),
        None => Ok(builtin),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_radius_csv() {
        let content = "element,radius\n# metallic radii\nAl, 1.43\nCo,1.25\n";
        let table = read_radius_csv(content.as_bytes(), "radii.csv").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("Al").unwrap(), 1.43);
        assert_eq!(table.get("Co").unwrap(), 1.25);
    }

    #[test]
    fn test_rejects_non_positive_radius() {
        let content = "element,radius\nAl,-1.0\n";
        let err = read_radius_csv(content.as_bytes(), "radii.csv").unwrap_err();
        assert!(matches!(err, SqsError::FileFormatError { .. }));
    }

    #[test]
    fn test_rejects_malformed_row() {
        let content = "element,radius\nAl,big\n";
        let err = read_radius_csv(content.as_bytes(), "radii.csv").unwrap_err();
        assert!(matches!(err, SqsError::CsvError(_)));
    }

    #[test]
    fn test_load_without_override_is_builtin() {
        let table = load_radius_table(None).unwrap();
        assert_eq!(table.get("Ni").unwrap(), 1.35);
    }
}
