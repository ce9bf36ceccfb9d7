//! # build 子命令 CLI 定义
//!
//! 构建无序超胞。`StructureOptions` 与截断距离覆盖也被
//! `batch`, `search` 子命令复用。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/build.rs`

use crate::alloy::RadiusReference;

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 代表性半径策略
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ReferenceRadius {
    /// Radius of the element with the largest atomic fraction
    Dominant,
    /// Fraction-weighted average radius
    Weighted,
    /// Largest radius among the constituents
    Largest,
}

impl From<ReferenceRadius> for RadiusReference {
    fn from(value: ReferenceRadius) -> Self {
        match value {
            ReferenceRadius::Dominant => RadiusReference::Dominant,
            ReferenceRadius::Weighted => RadiusReference::Weighted,
            ReferenceRadius::Largest => RadiusReference::Largest,
        }
    }
}

/// 超胞构建公共参数
#[derive(Args, Debug, Clone)]
pub struct StructureOptions {
    /// Lattice type (fcc or bcc, case-insensitive)
    #[arg(short, long, default_value = "fcc")]
    pub crystal: String,

    /// Target number of atoms in the supercell
    #[arg(short = 'n', long, default_value_t = 32)]
    pub atoms: usize,

    /// CSV file with `element,radius` rows overriding the built-in radii (Å)
    #[arg(long, env = "HEASQS_RADII")]
    pub radii: Option<PathBuf>,

    /// Which radius sets the lattice parameter
    #[arg(long, value_enum, default_value = "dominant")]
    pub reference: ReferenceRadius,

    /// Random seed for the site assignment (entropy when omitted)
    #[arg(long)]
    pub seed: Option<u64>,
}

/// build 子命令参数
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Alloy formula, e.g. 'Al0.875CoCrFeNi'
    pub formula: String,

    #[command(flatten)]
    pub structure: StructureOptions,

    /// Override a cluster cutoff, e.g. '--cutoff 2=7.0' (repeatable)
    #[arg(long = "cutoff", value_parser = parse_cutoff)]
    pub cutoffs: Vec<(u32, f64)>,

    /// Output POSCAR path (default: '<formula>_<crystal>.vasp')
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// 解析 `order=distance` 形式的截断距离
pub fn parse_cutoff(s: &str) -> Result<(u32, f64), String> {
    let (order, distance) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ORDER=DISTANCE, got '{}'", s))?;

    let order: u32 = order
        .trim()
        .parse()
        .map_err(|_| format!("invalid cluster order '{}'", order.trim()))?;
    if order < 2 {
        return Err(format!("cluster order must be at least 2, got {}", order));
    }

    let distance: f64 = distance
        .trim()
        .parse()
        .map_err(|_| format!("invalid cutoff distance '{}'", distance.trim()))?;
    if !distance.is_finite() || distance <= 0.0 {
        return Err(format!("cutoff distance must be positive, got {}", distance));
    }

    Ok((order, distance))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cutoff() {
        assert_eq!(parse_cutoff("2=7.0"), Ok((2, 7.0)));
        assert_eq!(parse_cutoff(" 3 = 4.5 "), Ok((3, 4.5)));
        assert!(parse_cutoff("7.0").is_err());
        assert!(parse_cutoff("1=3.0").is_err());
        assert!(parse_cutoff("2=-1").is_err());
        assert!(parse_cutoff("x=3").is_err());
    }

    #[test]
    fn test_reference_mapping() {
        assert_eq!(
            RadiusReference::from(ReferenceRadius::Weighted),
            RadiusReference::Weighted
        );
        assert_eq!(
            RadiusReference::from(ReferenceRadius::Dominant),
            RadiusReference::default()
        );
    }
}
