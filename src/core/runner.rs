//! # Matrix Runner Module / 矩阵运行模块
//!
//! Fans the planned jobs out as independent tokio tasks and folds their
//! results into one [`RunOutcome`]. There is no fail-fast: a failing axis
//! never cancels or delays a sibling, and every axis runs to completion.
//!
//! 将计划好的任务作为独立的 tokio 任务并发执行，并将结果汇总为一个 [`RunOutcome`]。
//! 没有快速失败机制：失败的轴不会取消或延迟其他轴，所有轴都会运行到结束。

use futures::{StreamExt, stream};
use std::sync::Arc;

use crate::core::execution::JobExecutor;
use crate::core::models::{JobResult, JobSpec, RunOutcome};

pub struct MatrixRunner {
    executor: Arc<JobExecutor>,
    max_parallel: usize,
}

impl MatrixRunner {
    /// `max_parallel` bounds how many axes run at once; zero is treated as one.
    pub fn new(executor: JobExecutor, max_parallel: usize) -> Self {
        Self {
            executor: Arc::new(executor),
            max_parallel: max_parallel.max(1),
        }
    }

    pub fn max_parallel(&self) -> usize {
        self.max_parallel
    }

    /// Runs every job and returns all results in declaration order.
    ///
    /// A job task that panics is recorded as a failure of that axis only.
    pub async fn run(&self, jobs: Vec<JobSpec>) -> RunOutcome {
        let results: Vec<JobResult> = stream::iter(jobs.into_iter().map(|spec| {
            let executor = Arc::clone(&self.executor);
            async move {
                let fallback = spec.clone();
                let handle = tokio::spawn(async move { executor.execute(&spec).await });
                match handle.await {
                    Ok(result) => result,
                    Err(e) => JobResult::aborted(
                        &fallback,
                        format!("Critical error during job execution: {e}"),
                    ),
                }
            }
        }))
        .buffer_unordered(self.max_parallel)
        .collect()
        .await;

        RunOutcome::new(results)
    }
}
