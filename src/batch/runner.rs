//! # 批量执行器
//!
//! 并行执行批量处理任务。
//!
//! ## 功能
//! - 基于 rayon 的并行迭代，专用线程池
//! - 进度条显示
//! - 错误收集与汇总报告；单个任务失败不影响其他任务
//!
//! ## 依赖关系
//! - 被 `commands/batch.rs` 调用
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行计算

use crate::utils::progress;

use rayon::prelude::*;

/// 单个任务处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessResult {
    /// 处理成功
    Success(String),
    /// 跳过（如输出文件已存在）
    Skipped(String),
    /// 处理失败
    Failed(String, String), // (任务标识, 错误信息)
}

/// 批量处理结果统计
#[derive(Debug, Default)]
pub struct BatchResult {
    /// 成功数量
    pub success: usize,
    /// 跳过数量
    pub skipped: usize,
    /// 失败数量
    pub failed: usize,
    /// 失败详情
    pub failures: Vec<(String, String)>,
}

impl BatchResult {
    /// 合并处理结果
    pub fn merge(&mut self, result: ProcessResult) {
        match result {
            ProcessResult::Success(_) => self.success += 1,
            ProcessResult::Skipped(_) => self.skipped += 1,
            ProcessResult::Failed(item, err) => {
                self.failed += 1;
                self.failures.push((item, err));
            }
        }
    }

    /// 总处理数量
    pub fn total(&self) -> usize {
        self.success + self.skipped + self.failed
    }
}

/// 批量执行器
pub struct BatchRunner {
    /// 并行作业数
    jobs: usize,
}

impl BatchRunner {
    /// 创建新的批量执行器；`jobs == 0` 时使用全部 CPU
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self { jobs }
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// 并行处理任务列表
    ///
    /// `processor` 接收任务序号与任务本身，返回处理结果和可选的输出记录。
    /// 输出记录按任务顺序返回。
    pub fn run<T, R, F>(&self, items: Vec<T>, processor: F) -> (BatchResult, Vec<R>)
    where
        T: Sync,
        R: Send,
        F: Fn(usize, &T) -> (ProcessResult, Option<R>) + Sync + Send,
    {
        let pb = progress::create_progress_bar(items.len() as u64, "Processing");

        let work = || -> Vec<(ProcessResult, Option<R>)> {
            items
                .par_iter()
                .enumerate()
                .map(|(index, item)| {
                    let outcome = processor(index, item);
                    pb.inc(1);
                    outcome
                })
                .collect()
        };

        // 配置 rayon 线程池；构建失败时退回全局线程池
        let results = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
        {
            Ok(pool) => pool.install(work),
            Err(_) => work(),
        };

        pb.finish_and_clear();

        // 汇总结果
        let mut batch_result = BatchResult::default();
        let mut records = Vec::new();
        for (result, record) in results {
            batch_result.merge(result);
            records.extend(record);
        }

        (batch_result, records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_result_merge() {
        let mut result = BatchResult::default();
        result.merge(ProcessResult::Success("a".to_string()));
        result.merge(ProcessResult::Skipped("b".to_string()));
        result.merge(ProcessResult::Failed("c".to_string(), "boom".to_string()));
        result.merge(ProcessResult::Success("d".to_string()));

        assert_eq!(result.success, 2);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.failed, 1);
        assert_eq!(result.total(), 4);
        assert_eq!(result.failures, vec![("c".to_string(), "boom".to_string())]);
    }

    #[test]
    fn test_runner_keeps_order_and_isolates_failures() {
        let runner = BatchRunner::new(2);
        let items: Vec<i32> = (0..20).collect();

        let (result, records) = runner.run(items, |index, item| {
            if item % 5 == 4 {
                (ProcessResult::Failed(item.to_string(), "bad".to_string()), None)
            } else {
                (ProcessResult::Success(item.to_string()), Some(index * 10))
            }
        });

        assert_eq!(result.success, 16);
        assert_eq!(result.failed, 4);
        assert_eq!(records.len(), 16);
        assert!(records.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_zero_jobs_uses_all_cpus() {
        assert_eq!(BatchRunner::new(0).jobs(), num_cpus::get());
        assert_eq!(BatchRunner::new(3).jobs(), 3);
    }
}
