//! # Matrix Planner Module / 矩阵计划模块
//!
//! Expands the declared list of environment axes into one independent
//! [`JobSpec`] per axis, and optionally splits the list across several CI
//! runners.
//!
//! 将声明的环境轴列表展开为每个轴一个独立的 [`JobSpec`]，
//! 并可选地将列表分配到多个 CI 运行器上。

use anyhow::{Result, bail};
use std::collections::HashMap;

use crate::core::config::MatrixConfig;
use crate::core::models::{EnvironmentAxis, JobSpec, TestInvocation};

/// Represents the complete execution plan for one runner.
/// 表示单个运行器的完整执行计划。
#[derive(Debug)]
pub struct ExecutionPlan {
    /// Jobs this runner must execute, in declaration order.
    pub jobs: Vec<JobSpec>,
    /// Number of axes declared in the configuration.
    pub declared_axes: usize,
    /// Whether the axes are split across multiple runners.
    pub is_distributed: bool,
    /// Artifact keys shared by distinct declared axes, e.g. `("win-arm", "3.12")`
    /// and `("win", "arm-3.12")`. Their archived logs would overwrite each other.
    pub colliding_keys: Vec<String>,
}

/// Finds artifact keys produced by more than one distinct axis. Repeated
/// identical axes are not reported.
///
/// 查找由多个不同轴产生的相同产物键。完全相同的重复轴不计入。
pub fn find_key_collisions(axes: &[EnvironmentAxis]) -> Vec<String> {
    let mut seen: HashMap<String, &EnvironmentAxis> = HashMap::new();
    let mut collisions = Vec::new();
    for axis in axes {
        let key = axis.key();
        match seen.get(&key) {
            Some(first) if *first != axis => {
                if !collisions.contains(&key) {
                    collisions.push(key);
                }
            }
            Some(_) => {}
            None => {
                seen.insert(key, axis);
            }
        }
    }
    collisions
}

/// Substitutes `{os}`, `{runtime}` and `{requirements}` in a command template.
pub fn render_template(template: &str, axis: &EnvironmentAxis, requirements: &str) -> String {
    template
        .replace("{os}", &axis.os)
        .replace("{runtime}", &axis.runtime)
        .replace("{requirements}", requirements)
}

/// Builds the job for a single axis.
pub fn expand_axis(matrix: &MatrixConfig, index: usize, axis: &EnvironmentAxis, test_jobs: usize) -> JobSpec {
    let requirements = matrix.requirements.to_string_lossy();
    let render = |template: &Option<String>| {
        template
            .as_deref()
            .map(|t| render_template(t, axis, &requirements))
    };

    JobSpec {
        index,
        axis: axis.clone(),
        provision: render(&matrix.provision),
        install_runtime: render(&matrix.install_runtime),
        install_dependencies: render(&matrix.install_dependencies),
        requirements: matrix.requirements.clone(),
        test: TestInvocation::new(
            render_template(&matrix.test_command, axis, &requirements),
            test_jobs.max(1),
        ),
        failure_log: matrix.failure_log.clone(),
        isolate: matrix.isolate,
        timeout_secs: matrix.timeout_secs,
    }
}

/// Creates the execution plan for the given matrix.
///
/// Every axis becomes exactly one job; duplicates are kept. When both
/// `total_runners` and `runner_index` are given, only the axes at positions
/// `p` with `p % total_runners == runner_index` are kept.
///
/// # Arguments
/// * `matrix` - The matrix declaration
/// * `test_jobs` - Optional override of the test command concurrency degree
/// * `total_runners` - Optional total number of runners for distributed execution
/// * `runner_index` - Optional index of this runner (0-based)
pub fn plan_matrix(
    matrix: &MatrixConfig,
    test_jobs: Option<usize>,
    total_runners: Option<usize>,
    runner_index: Option<usize>,
) -> Result<ExecutionPlan> {
    let test_jobs = test_jobs.unwrap_or(matrix.jobs);
    let jobs: Vec<JobSpec> = matrix
        .axes
        .iter()
        .enumerate()
        .map(|(index, axis)| expand_axis(matrix, index, axis, test_jobs))
        .collect();

    let (jobs, is_distributed) = match (total_runners, runner_index) {
        (Some(total), Some(index)) => {
            if total == 0 || index >= total {
                bail!("Runner index must be less than total runners.");
            }
            let shard = jobs
                .into_iter()
                .filter(|job| job.index % total == index)
                .collect();
            (shard, true)
        }
        (None, None) => (jobs, false),
        _ => bail!("Both --total-runners and --runner-index must be provided."),
    };

    Ok(ExecutionPlan {
        jobs,
        declared_axes: matrix.axes.len(),
        is_distributed,
        colliding_keys: find_key_collisions(&matrix.axes),
    })
}
