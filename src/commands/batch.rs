//! # batch 命令实现
//!
//! 对合金列表 × 晶体类型并行构建无序超胞。
//!
//! ## 功能
//! - 读取合金列表（首列；跳过 `#` 注释和表头）
//! - 每个任务独立的随机数种子 `seed + index`
//! - 单个合金失败不影响其他合金
//! - 写出 POSCAR 与汇总 CSV
//!
//! ## 依赖关系
//! - 使用 `cli/batch.rs` 定义的参数
//! - 使用 `batch/runner.rs` 并行执行
//! - 使用 `alloy/`, `parsers/poscar.rs`, `parsers/radii.rs`

use crate::alloy::{propose_cutoffs, RadiusReference, SupercellBuilder};
use crate::batch::{BatchRunner, ProcessResult};
use crate::cli::batch::BatchArgs;
use crate::commands::build::make_rng;
use crate::error::{Result, SqsError};
use crate::models::{Composition, CrystalType, RadiusTable};
use crate::parsers::{poscar, radii};
use crate::utils::output;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// 汇总 CSV 的一行
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    pub formula: String,
    pub crystal: String,
    pub atoms: usize,
    pub lattice_parameter: String,
    pub scaling: String,
    pub pair_cutoff: String,
    pub triplet_cutoff: String,
    pub composition: String,
    pub output: String,
}

/// 单个构建任务的共享配置
struct BatchConfig {
    radii: RadiusTable,
    reference: RadiusReference,
    atoms: usize,
    seed: Option<u64>,
    output_dir: PathBuf,
    overwrite: bool,
}

/// 执行 batch 命令
pub fn execute(args: BatchArgs) -> Result<()> {
    output::print_header("Batch Supercell Construction");

    if !args.input.exists() {
        return Err(SqsError::FileNotFound {
            path: args.input.display().to_string(),
        });
    }

    let content = fs::read_to_string(&args.input).map_err(|e| SqsError::FileReadError {
        path: args.input.display().to_string(),
        source: e,
    })?;
    let formulas = parse_formula_list(&content);
    if formulas.is_empty() {
        output::print_warning(&format!("No formulas found in '{}'", args.input.display()));
        return Ok(());
    }

    let crystals = args
        .crystals
        .iter()
        .map(|c| c.parse::<CrystalType>())
        .collect::<Result<Vec<_>>>()?;

    output::print_info(&format!(
        "Loaded {} formulas × {} lattice types",
        formulas.len(),
        crystals.len()
    ));

    fs::create_dir_all(&args.output).map_err(|e| SqsError::FileWriteError {
        path: args.output.display().to_string(),
        source: e,
    })?;

    let config = BatchConfig {
        radii: radii::load_radius_table(args.radii.as_deref())?,
        reference: args.reference.into(),
        atoms: args.atoms,
        seed: args.seed,
        output_dir: args.output.clone(),
        overwrite: args.overwrite,
    };

    let tasks: Vec<(String, CrystalType)> = formulas
        .iter()
        .flat_map(|f| crystals.iter().map(move |c| (f.clone(), *c)))
        .collect();

    let runner = BatchRunner::new(args.jobs);
    output::print_info(&format!("Running {} tasks on {} threads", tasks.len(), runner.jobs()));

    let (result, rows) = runner.run(tasks, |index, (formula, crystal)| {
        process_alloy(index, formula, *crystal, &config)
    });

    let summary_path = args
        .summary
        .clone()
        .unwrap_or_else(|| args.output.join("summary.csv"));
    write_summary(&rows, &summary_path)?;

    // 打印统计
    output::print_separator();
    output::print_success(&format!(
        "Batch complete: {} tasks, {} success, {} skipped, {} failed",
        result.total(),
        result.success,
        result.skipped,
        result.failed
    ));
    output::print_success(&format!("Summary saved to '{}'", summary_path.display()));

    if !result.failures.is_empty() {
        output::print_warning("Failed alloys:");
        for (item, err) in result.failures.iter().take(10) {
            output::print_error(&format!("  {}: {}", item, err));
        }
        if result.failures.len() > 10 {
            output::print_warning(&format!("  ... and {} more", result.failures.len() - 10));
        }
    }

    Ok(())
}

/// 解析合金列表：取每行逗号分隔的首列（整格，允许内部空白），跳过空行、`#` 注释以及首行表头
pub fn parse_formula_list(content: &str) -> Vec<String> {
    let mut formulas = Vec::new();
    let mut first_line = true;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if first_line {
            first_line = false;
            let lower = line.to_lowercase();
            if lower.contains("formula") || lower.contains("alloy") {
                continue;
            }
        }

        let first = line.split(',').next().unwrap_or("").trim();
        if !first.is_empty() {
            formulas.push(first.to_string());
        }
    }

    formulas
}

/// 构建单个合金的超胞
fn process_alloy(
    index: usize,
    formula: &str,
    crystal: CrystalType,
    config: &BatchConfig,
) -> (ProcessResult, Option<SummaryRow>) {
    let label = format!("{} ({})", formula, crystal);

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
        None => make_rng(None),
    };

    let supercell = match Composition::from_formula(formula).and_then(|composition| {
        SupercellBuilder::new(&config.radii)
            .with_reference(config.reference)
            .build(&composition, crystal, config.atoms, &mut rng)
    }) {
        Ok(s) => s,
        Err(e) => return (ProcessResult::Failed(label, e.to_string()), None),
    };

    let path = config
        .output_dir
        .join(format!("{}.vasp", supercell.structure().name));

    if path.exists() && !config.overwrite {
        return (
            ProcessResult::Skipped(format!("{} exists", path.display())),
            None,
        );
    }

    if let Err(e) = poscar::write_poscar_file(supercell.structure(), &path) {
        return (ProcessResult::Failed(label, e.to_string()), None);
    }

    let cutoffs = propose_cutoffs(supercell.lattice_parameter(), crystal);
    let (nx, ny, nz) = supercell.scaling();
    let fmt_cutoff = |d: Option<f64>| d.map(|d| format!("{:.4}", d)).unwrap_or_default();

    let row = SummaryRow {
        formula: formula.to_string(),
        crystal: crystal.to_string(),
        atoms: supercell.num_sites(),
        lattice_parameter: format!("{:.4}", supercell.lattice_parameter()),
        scaling: format!("{}x{}x{}", nx, ny, nz),
        pair_cutoff: fmt_cutoff(cutoffs.pair()),
        triplet_cutoff: fmt_cutoff(cutoffs.triplet()),
        composition: supercell
            .structure()
            .element_counts()
            .iter()
            .map(|(el, n)| format!("{}{}", el, n))
            .collect::<Vec<_>>()
            .join(" "),
        output: path.display().to_string(),
    };

    (ProcessResult::Success(label), Some(row))
}

/// 写出汇总 CSV
fn write_summary(rows: &[SummaryRow], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    for row in rows {
        wtr.serialize(row)?;
    }

    wtr.flush().map_err(|e| SqsError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}
