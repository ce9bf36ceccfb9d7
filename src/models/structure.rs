//! # 晶体结构数据模型
//!
//! 定义周期性结构、晶体类型（FCC/BCC）以及超胞结构。
//!
//! ## 依赖关系
//! - 被 `alloy/`, `parsers/poscar.rs`, `sqs/` 使用
//! - 无外部模块依赖

use crate::error::SqsError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// 晶格参数表示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lattice {
    /// 晶格向量矩阵 (3x3)，行向量表示 a, b, c
    /// [[a1, a2, a3], [b1, b2, b3], [c1, c2, c3]]
    pub matrix: [[f64; 3]; 3],
}

impl Lattice {
    /// 立方晶格
    pub fn cubic(a: f64) -> Self {
        Lattice {
            matrix: [[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]],
        }
    }

    /// 从晶格参数 (a, b, c, alpha, beta, gamma) 创建晶格
    /// 角度单位：度
    pub fn from_parameters(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Self {
        let cos_alpha = alpha.to_radians().cos();
        let cos_beta = beta.to_radians().cos();
        let cos_gamma = gamma.to_radians().cos();
        let sin_gamma = gamma.to_radians().sin();

        let a_vec = [a, 0.0, 0.0];
        let b_vec = [b * cos_gamma, b * sin_gamma, 0.0];

        let c1 = c * cos_beta;
        let c2 = c * (cos_alpha - cos_beta * cos_gamma) / sin_gamma;
        let c3 = (c * c - c1 * c1 - c2 * c2).sqrt();

        Lattice {
            matrix: [a_vec, b_vec, [c1, c2, c3]],
        }
    }

    /// 从晶格向量矩阵创建
    pub fn from_vectors(matrix: [[f64; 3]; 3]) -> Self {
        Lattice { matrix }
    }

    /// 获取晶格参数 (a, b, c, alpha, beta, gamma)
    pub fn parameters(&self) -> (f64, f64, f64, f64, f64, f64) {
        let [a_vec, b_vec, c_vec] = self.matrix;

        let norm = |v: [f64; 3]| (v[0].powi(2) + v[1].powi(2) + v[2].powi(2)).sqrt();
        let dot = |u: [f64; 3], v: [f64; 3]| u[0] * v[0] + u[1] * v[1] + u[2] * v[2];

        let a = norm(a_vec);
        let b = norm(b_vec);
        let c = norm(c_vec);

        let alpha = (dot(b_vec, c_vec) / (b * c)).acos().to_degrees();
        let beta = (dot(a_vec, c_vec) / (a * c)).acos().to_degrees();
        let gamma = (dot(a_vec, b_vec) / (a * b)).acos().to_degrees();

        (a, b, c, alpha, beta, gamma)
    }

    /// 计算晶格体积
    pub fn volume(&self) -> f64 {
        let [a, b, c] = self.matrix;

        // 行列式计算
        a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0])
            + a[2] * (b[0] * c[1] - b[1] * c[0])
    }

    /// 分数坐标转笛卡尔坐标
    pub fn to_cartesian(&self, frac: [f64; 3]) -> [f64; 3] {
        let m = self.matrix;
        [
            frac[0] * m[0][0] + frac[1] * m[1][0] + frac[2] * m[2][0],
            frac[0] * m[0][1] + frac[1] * m[1][1] + frac[2] * m[2][1],
            frac[0] * m[0][2] + frac[1] * m[1][2] + frac[2] * m[2][2],
        ]
    }

    /// 笛卡尔坐标转分数坐标；退化晶格返回 None
    pub fn to_fractional(&self, cart: [f64; 3]) -> Option<[f64; 3]> {
        let m = self.matrix;
        let det = self.volume();

        if det.abs() < 1e-10 {
            return None;
        }

        let inv = [
            [
                (m[1][1] * m[2][2] - m[1][2] * m[2][1]) / det,
                (m[0][2] * m[2][1] - m[0][1] * m[2][2]) / det,
                (m[0][1] * m[1][2] - m[0][2] * m[1][1]) / det,
            ],
            [
                (m[1][2] * m[2][0] - m[1][0] * m[2][2]) / det,
                (m[0][0] * m[2][2] - m[0][2] * m[2][0]) / det,
                (m[0][2] * m[1][0] - m[0][0] * m[1][2]) / det,
            ],
            [
                (m[1][0] * m[2][1] - m[1][1] * m[2][0]) / det,
                (m[0][1] * m[2][0] - m[0][0] * m[2][1]) / det,
                (m[0][0] * m[1][1] - m[0][1] * m[1][0]) / det,
            ],
        ];

        // 行向量约定：cart = frac · M，故 frac = cart · M⁻¹
        Some([
            cart[0] * inv[0][0] + cart[1] * inv[1][0] + cart[2] * inv[2][0],
            cart[0] * inv[0][1] + cart[1] * inv[1][1] + cart[2] * inv[2][1],
            cart[0] * inv[0][2] + cart[1] * inv[1][2] + cart[2] * inv[2][2],
        ])
    }
}

/// 晶格位点：元素 + 分数坐标
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// 元素符号
    pub element: String,

    /// 分数坐标 [x, y, z]
    pub position: [f64; 3],
}

impl Site {
    pub fn new(element: impl Into<String>, position: [f64; 3]) -> Self {
        Site {
            element: element.into(),
            position,
        }
    }
}

/// 通用周期性结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    /// 结构名称
    pub name: String,

    /// 晶格
    pub lattice: Lattice,

    /// 位点列表
    pub sites: Vec<Site>,
}

impl Structure {
    pub fn new(name: impl Into<String>, lattice: Lattice, sites: Vec<Site>) -> Self {
        Structure {
            name: name.into(),
            lattice,
            sites,
        }
    }

    /// 元素出现顺序（首次出现）
    pub fn species_order(&self) -> Vec<&str> {
        let mut order: Vec<&str> = Vec::new();
        for site in &self.sites {
            if !order.contains(&site.element.as_str()) {
                order.push(site.element.as_str());
            }
        }
        order
    }

    /// 按出现顺序统计各元素位点数
    pub fn element_counts(&self) -> Vec<(String, usize)> {
        self.species_order()
            .into_iter()
            .map(|el| {
                let n = self.sites.iter().filter(|s| s.element == el).count();
                (el.to_string(), n)
            })
            .collect()
    }

    /// 计算化学式
    pub fn formula(&self) -> String {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

        for site in &self.sites {
            *counts.entry(site.element.as_str()).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .map(|(el, count)| {
                if count == 1 {
                    el.to_string()
                } else {
                    format!("{}{}", el, count)
                }
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

/// 晶体类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrystalType {
    Fcc,
    Bcc,
}

const FCC_BASIS: [[f64; 3]; 4] = [
    [0.0, 0.0, 0.0],
    [0.0, 0.5, 0.5],
    [0.5, 0.0, 0.5],
    [0.5, 0.5, 0.0],
];

const BCC_BASIS: [[f64; 3]; 2] = [[0.0, 0.0, 0.0], [0.5, 0.5, 0.5]];

impl CrystalType {
    /// 惯用晶胞中的原子数
    pub fn atoms_per_cell(&self) -> usize {
        match self {
            CrystalType::Fcc => 4,
            CrystalType::Bcc => 2,
        }
    }

    /// 惯用晶胞的基元（分数坐标）
    pub fn basis(&self) -> &'static [[f64; 3]] {
        match self {
            CrystalType::Fcc => &FCC_BASIS,
            CrystalType::Bcc => &BCC_BASIS,
        }
    }

    /// 原胞向量，以立方晶格常数为单位
    pub fn primitive_vectors(&self) -> [[f64; 3]; 3] {
        match self {
            CrystalType::Fcc => [[0.0, 0.5, 0.5], [0.5, 0.0, 0.5], [0.5, 0.5, 0.0]],
            CrystalType::Bcc => [[-0.5, 0.5, 0.5], [0.5, -0.5, 0.5], [0.5, 0.5, -0.5]],
        }
    }

    /// Hermann-Mauguin 空间群符号
    pub fn space_group(&self) -> &'static str {
        match self {
            CrystalType::Fcc => "Fm-3m",
            CrystalType::Bcc => "Im-3m",
        }
    }

    pub fn space_group_number(&self) -> u32 {
        match self {
            CrystalType::Fcc => 225,
            CrystalType::Bcc => 229,
        }
    }
}

impl FromStr for CrystalType {
    type Err = SqsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fcc" => Ok(CrystalType::Fcc),
            "bcc" => Ok(CrystalType::Bcc),
            _ => Err(SqsError::UnsupportedCrystalType(s.to_string())),
        }
    }
}

impl std::fmt::Display for CrystalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CrystalType::Fcc => write!(f, "FCC"),
            CrystalType::Bcc => write!(f, "BCC"),
        }
    }
}

/// 无序超胞结构
///
/// 位点数在构造时确定，之后不再改变；只通过访问器暴露。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupercellStructure {
    crystal: CrystalType,
    lattice_parameter: f64,
    scaling: (usize, usize, usize),
    structure: Structure,
}

impl SupercellStructure {
    pub(crate) fn new(
        crystal: CrystalType,
        lattice_parameter: f64,
        scaling: (usize, usize, usize),
        structure: Structure,
    ) -> Self {
        SupercellStructure {
            crystal,
            lattice_parameter,
            scaling,
            structure,
        }
    }

    pub fn crystal(&self) -> CrystalType {
        self.crystal
    }

    /// 单胞（惯用胞）晶格常数 a
    pub fn lattice_parameter(&self) -> f64 {
        self.lattice_parameter
    }

    pub fn scaling(&self) -> (usize, usize, usize) {
        self.scaling
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    pub fn sites(&self) -> &[Site] {
        &self.structure.sites
    }

    pub fn num_sites(&self) -> usize {
        self.sites().len()
    }

    pub fn element_counts(&self) -> Vec<(String, usize)> {
        self.structure.element_counts()
    }
}
