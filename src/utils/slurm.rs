//! # Slurm 脚本生成工具
//!
//! 为长时间运行的 mcsqs 搜索生成 sbatch 提交脚本。
//!
//! ## 依赖关系
//! - 被 `commands/search.rs` 使用
//! - 无外部模块依赖

use std::path::Path;
use std::time::Duration;

/// Slurm 作业配置
#[derive(Debug, Clone)]
pub struct SlurmConfig {
    pub job_name: String,
    pub partition: String,
    /// 节点约束，为空时不写入 `--constraint`
    pub constraint: String,
    pub nodes: u32,
    pub ntasks: u32,
    pub cpus_per_task: u32,
    pub mem_per_cpu: String,
    pub time_limit: String,
    pub modules: Vec<String>,
}

impl Default for SlurmConfig {
    fn default() -> Self {
        SlurmConfig {
            job_name: "sqs".to_string(),
            partition: "cpu".to_string(),
            constraint: String::new(),
            nodes: 1,
            ntasks: 1,
            cpus_per_task: 1,
            mem_per_cpu: "2G".to_string(),
            time_limit: "24:00:00".to_string(),
            modules: vec![],
        }
    }
}

/// 把搜索时间预算换算为 Slurm 时间限制，额外留出 10 分钟收尾
pub fn wall_time(budget: Duration) -> String {
    let total = budget.as_secs() + 600;
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// 解析逗号分隔的 module 列表
pub fn parse_modules(list: &str) -> Vec<String> {
    list.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// 生成 sbatch 脚本内容
pub fn generate_sbatch_script(config: &SlurmConfig, workdir: &Path, exec_cmd: &str) -> String {
    let constraint = if config.constraint.is_empty() {
        String::new()
    } else {
        format!("#SBATCH --constraint \"{}\"\n", config.constraint)
    };

    let module_loads = config
        .modules
        .iter()
        .map(|m| format!("module load {}", m))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"#!/bin/bash
{}#SBATCH --partition {}
#SBATCH --nodes={}
#SBATCH --mem-per-cpu {}
#SBATCH --time {}
#SBATCH -c {}
#SBATCH -n {}
#SBATCH -J {}
#SBATCH -o slurm_logs/%x.out
#SBATCH -e slurm_logs/%x.err

set -uo pipefail

module purge 2>&1
{}

cd "{}"
echo "PWD=$(pwd)"
{}

echo "Timings:"
sacct -o JobID,Submit,Start,End,CPUTime,State -j $SLURM_JOBID
"#,
        constraint,
        config.partition,
        config.nodes,
        config.mem_per_cpu,
        config.time_limit,
        config.cpus_per_task,
        config.ntasks,
        config.job_name,
        module_loads,
        workdir.display(),
        exec_cmd,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_time() {
        assert_eq!(wall_time(Duration::from_secs(3600)), "01:10:00");
        assert_eq!(wall_time(Duration::from_secs(0)), "00:10:00");
        assert_eq!(wall_time(Duration::from_secs(86_400)), "24:10:00");
    }

    #[test]
    fn test_parse_modules() {
        assert_eq!(parse_modules("atat/3.36, gcc"), vec!["atat/3.36", "gcc"]);
        assert!(parse_modules(" , ").is_empty());
    }

    #[test]
    fn test_generate_sbatch_script() {
        let config = SlurmConfig {
            job_name: "CoCrFeNi_FCC".to_string(),
            modules: vec!["atat".to_string()],
            ..SlurmConfig::default()
        };
        let script = generate_sbatch_script(
            &config,
            Path::new("/scratch/sqs"),
            "corrdump -l=rndstr.in\ntimeout 60 mcsqs -n=32 || true",
        );

        assert!(script.starts_with("#!/bin/bash\n#SBATCH --partition cpu\n"));
        assert!(!script.contains("--constraint"));
        assert!(script.contains("#SBATCH -J CoCrFeNi_FCC"));
        assert!(script.contains("module load atat"));
        assert!(script.contains("cd \"/scratch/sqs\""));
        assert!(script.contains("timeout 60 mcsqs -n=32 || true"));
    }

    #[test]
    fn test_constraint_line() {
        let config = SlurmConfig {
            constraint: "neoverse_v2".to_string(),
            ..SlurmConfig::default()
        };
        let script = generate_sbatch_script(&config, Path::new("."), "true");
        assert!(script.contains("#SBATCH --constraint \"neoverse_v2\"\n#SBATCH --partition"));
    }
}
