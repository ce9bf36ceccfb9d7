//! # ATAT mcsqs 搜索后端
//!
//! 以子进程方式调用 ATAT：
//! 1. 在工作目录写出 `rndstr.in`
//! 2. `corrdump -l=rndstr.in -ro -noe -nop -clus -2=.. -3=..` 生成 `clusters.out`
//! 3. `mcsqs -n=N` 持续运行（stdout/stderr 写入 `mcsqs.stdout`/`mcsqs.stderr`），超出时间预算后终止
//! 4. 读取 `bestsqs.out` 与 `bestcorr.out`
//!
//! `mcsqs` 不会自行结束，时间预算即搜索长度；长时间搜索可改用
//! `utils/slurm.rs` 生成的作业脚本提交到集群。
//!
//! ## 依赖关系
//! - 实现 `sqs::SqsSearch`
//! - 使用 `sqs/atat.rs` 读写文件

use crate::error::{Result, SqsError};
use crate::models::{CutoffSet, SupercellStructure};
use crate::sqs::{atat, SqsCandidate, SqsSearch};

use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// mcsqs 运行配置
#[derive(Debug, Clone)]
pub struct McsqsConfig {
    /// corrdump 可执行文件
    pub corrdump: String,
    /// mcsqs 可执行文件
    pub mcsqs: String,
    /// 工作目录
    pub workdir: PathBuf,
    /// mcsqs 运行时间预算
    pub time_limit: Duration,
    /// 轮询子进程状态的间隔
    pub poll_interval: Duration,
}

impl Default for McsqsConfig {
    fn default() -> Self {
        McsqsConfig {
            corrdump: "corrdump".to_string(),
            mcsqs: "mcsqs".to_string(),
            workdir: PathBuf::from("sqs_work"),
            time_limit: Duration::from_secs(60),
            poll_interval: Duration::from_millis(200),
        }
    }
}

/// ATAT mcsqs 后端
pub struct McsqsSearch {
    config: McsqsConfig,
}

impl McsqsSearch {
    pub fn new(config: McsqsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &McsqsConfig {
        &self.config
    }

    /// 创建工作目录并写出 `rndstr.in`，清除上次运行的输出
    pub fn prepare_workdir(&self, supercell: &SupercellStructure) -> Result<PathBuf> {
        let dir = &self.config.workdir;
        fs::create_dir_all(dir).map_err(|e| SqsError::FileWriteError {
            path: dir.display().to_string(),
            source: e,
        })?;

        for stale in ["bestsqs.out", "bestcorr.out", "clusters.out"] {
            let path = dir.join(stale);
            if let Err(e) = fs::remove_file(&path) {
                if e.kind() != ErrorKind::NotFound {
                    return Err(SqsError::FileWriteError {
                        path: path.display().to_string(),
                        source: e,
                    });
                }
            }
        }

        let rndstr = dir.join("rndstr.in");
        fs::write(&rndstr, atat::rndstr_string(supercell)).map_err(|e| {
            SqsError::FileWriteError {
                path: rndstr.display().to_string(),
                source: e,
            }
        })?;

        Ok(dir.clone())
    }

    /// 作业脚本中使用的 shell 命令（`timeout` 结束 mcsqs 后仍视为成功）
    pub fn shell_command(&self, supercell: &SupercellStructure, cutoffs: &CutoffSet) -> String {
        format!(
            "{} {}\ntimeout {} {} -n={} || true",
            self.config.corrdump,
            atat::corrdump_args(cutoffs).join(" "),
            self.config.time_limit.as_secs(),
            self.config.mcsqs,
            supercell.num_sites()
        )
    }

    fn run_corrdump(&self, dir: &Path, cutoffs: &CutoffSet) -> Result<()> {
        let output = Command::new(&self.config.corrdump)
            .args(atat::corrdump_args(cutoffs))
            .current_dir(dir)
            .output()
            .map_err(|e| spawn_error(&self.config.corrdump, e))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(SqsError::CommandFailed {
                command: self.config.corrdump.clone(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            })
        }
    }

    fn run_mcsqs(&self, dir: &Path, num_sites: usize) -> Result<()> {
        // 输出直接写入文件，轮询期间不会因管道写满而阻塞
        let create_log = |name: &str| {
            let path = dir.join(name);
            File::create(&path).map_err(|e| SqsError::FileWriteError {
                path: path.display().to_string(),
                source: e,
            })
        };
        let stdout_log = create_log("mcsqs.stdout")?;
        let stderr_log = create_log("mcsqs.stderr")?;

        let mut child = Command::new(&self.config.mcsqs)
            .arg(format!("-n={}", num_sites))
            .current_dir(dir)
            .stdout(Stdio::from(stdout_log))
            .stderr(Stdio::from(stderr_log))
            .spawn()
            .map_err(|e| spawn_error(&self.config.mcsqs, e))?;

        let start = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    // 提前退出：只有留下了结果才算成功
                    if status.success() || dir.join("bestsqs.out").exists() {
                        return Ok(());
                    }
                    return Err(SqsError::CommandFailed {
                        command: format!("{} -n={}", self.config.mcsqs, num_sites),
                        stderr: fs::read_to_string(dir.join("mcsqs.stderr")).unwrap_or_default(),
                    });
                }
                Ok(None) if start.elapsed() >= self.config.time_limit => {
                    child.kill().ok();
                    child.wait().ok();
                    return Ok(());
                }
                Ok(None) => thread::sleep(self.config.poll_interval),
                Err(e) => {
                    child.kill().ok();
                    return Err(SqsError::CommandFailed {
                        command: self.config.mcsqs.clone(),
                        stderr: e.to_string(),
                    });
                }
            }
        }
    }

    /// 读取工作目录中的最优结构与得分
    pub fn collect(&self, dir: &Path, name: &str) -> Result<SqsCandidate> {
        let read = |file: &str| {
            let path = dir.join(file);
            fs::read_to_string(&path).map_err(|e| SqsError::FileReadError {
                path: path.display().to_string(),
                source: e,
            })
        };

        let structure = atat::parse_bestsqs(&read("bestsqs.out")?, name)?;
        let score = atat::parse_objective(&read("bestcorr.out")?)?;

        Ok(SqsCandidate { structure, score })
    }
}

impl SqsSearch for McsqsSearch {
    fn search(
        &self,
        supercell: &SupercellStructure,
        cutoffs: &CutoffSet,
    ) -> Result<Vec<SqsCandidate>> {
        let dir = self.prepare_workdir(supercell)?;
        self.run_corrdump(&dir, cutoffs)?;
        self.run_mcsqs(&dir, supercell.num_sites())?;

        let name = format!("{}_sqs", supercell.structure().name);
        Ok(vec![self.collect(&dir, &name)?])
    }
}

fn spawn_error(command: &str, e: std::io::Error) -> SqsError {
    if e.kind() == ErrorKind::NotFound {
        SqsError::CommandNotFound {
            command: command.to_string(),
        }
    } else {
        SqsError::CommandFailed {
            command: command.to_string(),
            stderr: e.to_string(),
        }
    }
}
