//! # search 命令实现
//!
//! 构建无序超胞后交给 ATAT `mcsqs` 搜索 SQS。
//!
//! ## 功能
//! - 本地运行：`corrdump` + 限时 `mcsqs`，收集并排序候选结构，写出 POSCAR
//! - 集群运行：在工作目录写出 `rndstr.in` 与 sbatch 脚本，可选自动提交
//!
//! ## 依赖关系
//! - 使用 `cli/search.rs` 定义的参数
//! - 使用 `commands/build.rs` 的超胞构建与报告
//! - 使用 `sqs/`, `utils/slurm.rs`, `utils/progress.rs`

use crate::cli::search::SearchArgs;
use crate::commands::build::{prepare_supercell, report_supercell, resolve_cutoffs};
use crate::error::{Result, SqsError};
use crate::models::{CutoffSet, SupercellStructure};
use crate::parsers::poscar;
use crate::sqs::{rank_candidates, McsqsConfig, McsqsSearch, SqsCandidate, SqsSearch};
use crate::utils::slurm::{generate_sbatch_script, parse_modules, wall_time, SlurmConfig};
use crate::utils::{output, progress};

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

/// 执行 search 命令
pub fn execute(args: SearchArgs) -> Result<()> {
    output::print_header("Special Quasirandom Structure Search");

    let (composition, supercell) = prepare_supercell(&args.formula, &args.structure)?;
    let cutoffs = resolve_cutoffs(&supercell, &args.cutoffs);
    report_supercell(&composition, &supercell, &cutoffs);

    let search = McsqsSearch::new(McsqsConfig {
        corrdump: args.corrdump.clone(),
        mcsqs: args.mcsqs.clone(),
        workdir: args.workdir.clone(),
        time_limit: Duration::from_secs(args.time_limit),
        ..McsqsConfig::default()
    });

    if args.sbatch {
        prepare_job(&args, &search, &supercell, &cutoffs)
    } else {
        run_local(&search, &supercell, &cutoffs)
    }
}

/// 本地运行 mcsqs
fn run_local(
    search: &McsqsSearch,
    supercell: &SupercellStructure,
    cutoffs: &CutoffSet,
) -> Result<()> {
    let budget = search.config().time_limit.as_secs();
    let spinner = progress::create_spinner(&format!(
        "Running mcsqs -n={} for {} s in '{}'",
        supercell.num_sites(),
        budget,
        search.config().workdir.display()
    ));

    let candidates = search.search(supercell, cutoffs);
    spinner.finish_and_clear();

    let candidates = rank_candidates(candidates?);
    if candidates.is_empty() {
        output::print_warning("mcsqs produced no candidate structures");
        return Ok(());
    }

    for (i, candidate) in candidates.iter().enumerate() {
        let path = candidate_path(&search.config().workdir, candidate, i);
        poscar::write_poscar_file(&candidate.structure, &path)?;
        output::print_success(&format!(
            "Candidate {} (score {}) -> '{}'",
            i + 1,
            format_score(candidate.score),
            path.display()
        ));
    }

    output::print_done(&format!("Best SQS: {}", candidates[0].structure.formula()));
    Ok(())
}

/// 生成 Slurm 作业
fn prepare_job(
    args: &SearchArgs,
    search: &McsqsSearch,
    supercell: &SupercellStructure,
    cutoffs: &CutoffSet,
) -> Result<()> {
    let workdir = search.prepare_workdir(supercell)?;
    fs::create_dir_all(workdir.join("slurm_logs")).map_err(|e| SqsError::FileWriteError {
        path: workdir.join("slurm_logs").display().to_string(),
        source: e,
    })?;

    // 初始无序结构，便于对比
    poscar::write_poscar_file(supercell.structure(), &workdir.join("POSCAR.random"))?;

    let config = SlurmConfig {
        job_name: supercell.structure().name.clone(),
        partition: args.partition.clone(),
        constraint: args.constraint.clone(),
        mem_per_cpu: args.mem_per_cpu.clone(),
        time_limit: wall_time(search.config().time_limit),
        modules: parse_modules(&args.modules),
        ..SlurmConfig::default()
    };

    let absolute = fs::canonicalize(&workdir).unwrap_or_else(|_| workdir.clone());
    let script = generate_sbatch_script(
        &config,
        &absolute,
        &search.shell_command(supercell, cutoffs),
    );

    let sbatch_path = workdir.join("submit.sbatch");
    fs::write(&sbatch_path, script).map_err(|e| SqsError::FileWriteError {
        path: sbatch_path.display().to_string(),
        source: e,
    })?;
    output::print_success(&format!("Job script written to '{}'", sbatch_path.display()));

    if !args.submit {
        output::print_info(&format!("[DRY] Generated job: {}", workdir.display()));
        return Ok(());
    }

    let out = Command::new("sbatch")
        .arg("submit.sbatch")
        .current_dir(&workdir)
        .output()
        .map_err(|_| SqsError::CommandNotFound {
            command: "sbatch".to_string(),
        })?;

    if !out.status.success() {
        return Err(SqsError::CommandFailed {
            command: "sbatch submit.sbatch".to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).to_string(),
        });
    }

    output::print_success(&format!(
        "Submitted: {} - {}",
        config.job_name,
        String::from_utf8_lossy(&out.stdout).trim()
    ));
    Ok(())
}

fn candidate_path(workdir: &Path, candidate: &SqsCandidate, index: usize) -> PathBuf {
    if index == 0 {
        workdir.join(format!("{}.vasp", candidate.structure.name))
    } else {
        workdir.join(format!("{}_{}.vasp", candidate.structure.name, index + 1))
    }
}

fn format_score(score: f64) -> String {
    if score == f64::NEG_INFINITY {
        "perfect match".to_string()
    } else {
        format!("{:.6}", score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Lattice, Structure};

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(f64::NEG_INFINITY), "perfect match");
        assert_eq!(format_score(-0.5), "-0.500000");
    }

    #[test]
    fn test_candidate_path() {
        let candidate = SqsCandidate {
            structure: Structure::new("CoNi_FCC_sqs", Lattice::cubic(3.5), vec![]),
            score: 0.0,
        };
        let dir = Path::new("work");
        assert_eq!(
            candidate_path(dir, &candidate, 0),
            PathBuf::from("work/CoNi_FCC_sqs.vasp")
        );
        assert_eq!(
            candidate_path(dir, &candidate, 2),
            PathBuf::from("work/CoNi_FCC_sqs_3.vasp")
        );
    }
}
