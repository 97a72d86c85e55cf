//! # Data Models Module / 数据模型模块
//!
//! This module defines the data structures shared by the matrix planner, the
//! job executor and the failure archiver: environment axes, job specifications,
//! per-axis results and the aggregate run outcome.
//!
//! 此模块定义矩阵计划器、任务执行器和失败归档器共享的数据结构：
//! 环境轴、任务规格、单轴结果以及整体运行结果。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Default concurrency degree handed to the test command through `--jobs=N`.
pub const DEFAULT_TEST_JOBS: usize = 4;

/// Default fixed relative path of the diagnostic log written by the test runner.
pub const DEFAULT_FAILURE_LOG: &str = "failed_tests.log";

/// One `(operating system, runtime version)` pairing under test.
/// 测试中的一个（操作系统，运行时版本）组合。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnvironmentAxis {
    pub os: String,
    pub runtime: String,
}

impl EnvironmentAxis {
    pub fn new(os: impl Into<String>, runtime: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            runtime: runtime.into(),
        }
    }

    /// The `{os}-{runtime}` key used to namespace anything produced by this axis.
    pub fn key(&self) -> String {
        format!("{}-{}", self.os, self.runtime)
    }

    /// Artifact name for this axis' diagnostic log: `{os}-{runtime}-failed-tests`.
    pub fn artifact_name(&self) -> String {
        format!("{}-failed-tests", self.key())
    }
}

impl fmt::Display for EnvironmentAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.os, self.runtime)
    }
}

/// The sequential steps of a single job, in execution order.
/// 单个任务的顺序执行步骤。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    Provision,
    InstallRuntime,
    InstallDependencies,
    Test,
}

impl Stage {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Provision => "provision",
            Self::InstallRuntime => "install-runtime",
            Self::InstallDependencies => "install-dependencies",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Invocation of the external test runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestInvocation {
    /// Base command, e.g. `python runtest.py`.
    pub command: String,
    /// Select the full suite (`--all`).
    pub all: bool,
    /// Emit timing data (`--time`).
    pub time: bool,
    /// Concurrency degree (`--jobs=N`).
    pub jobs: usize,
}

impl TestInvocation {
    pub fn new(command: impl Into<String>, jobs: usize) -> Self {
        Self {
            command: command.into(),
            all: true,
            time: true,
            jobs,
        }
    }

    /// The complete command line including the suite selection flags.
    pub fn command_line(&self) -> String {
        let mut line = self.command.trim().to_string();
        if self.all {
            line.push_str(" --all");
        }
        if self.time {
            line.push_str(" --time");
        }
        line.push_str(&format!(" --jobs={}", self.jobs));
        line
    }
}

/// Everything needed to execute one axis. Commands are already expanded for the axis.
/// 执行单个轴所需的一切。命令已针对该轴展开。
#[derive(Debug, Clone, Serialize)]
pub struct JobSpec {
    /// Position of the axis in the declared list, used to keep reports in order.
    pub index: usize,
    pub axis: EnvironmentAxis,
    pub provision: Option<String>,
    pub install_runtime: Option<String>,
    pub install_dependencies: Option<String>,
    pub requirements: PathBuf,
    pub test: TestInvocation,
    /// Relative path of the diagnostic log the test runner writes on failure.
    pub failure_log: PathBuf,
    /// Copy the project into a private workspace before running.
    pub isolate: bool,
    pub timeout_secs: Option<u64>,
}

impl JobSpec {
    /// The steps to run in order, skipping the ones without a command.
    pub fn steps(&self) -> Vec<(Stage, String)> {
        let mut steps = Vec::with_capacity(4);
        let optional = [
            (Stage::Provision, &self.provision),
            (Stage::InstallRuntime, &self.install_runtime),
            (Stage::InstallDependencies, &self.install_dependencies),
        ];
        for (stage, command) in optional {
            if let Some(command) = command.as_deref().filter(|c| !c.trim().is_empty()) {
                steps.push((stage, command.to_string()));
            }
        }
        steps.push((Stage::Test, self.test.command_line()));
        steps
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    Pass,
    Fail,
}

/// The outcome of one axis.
///
/// `log_artifact_path` is only ever set on a failing result, and may still be
/// absent on one when the test runner produced no diagnostic log.
///
/// 单个轴的结果。`log_artifact_path` 仅在失败时可能存在。
#[derive(Debug, Clone, Serialize)]
pub struct JobResult {
    pub index: usize,
    pub axis: EnvironmentAxis,
    pub status: JobStatus,
    pub failed_stage: Option<Stage>,
    pub exit_code: Option<i32>,
    pub timed_out: bool,
    /// Combined output of every stage that ran.
    pub output: String,
    pub duration: Duration,
    /// Location of the diagnostic log inside the job's workspace, found after a failure.
    #[serde(skip)]
    pub diagnostic_log: Option<PathBuf>,
    pub log_artifact_path: Option<PathBuf>,
}

impl JobResult {
    pub fn passed(spec: &JobSpec, output: String, duration: Duration) -> Self {
        Self {
            index: spec.index,
            axis: spec.axis.clone(),
            status: JobStatus::Pass,
            failed_stage: None,
            exit_code: Some(0),
            timed_out: false,
            output,
            duration,
            diagnostic_log: None,
            log_artifact_path: None,
        }
    }

    pub fn failed(
        spec: &JobSpec,
        stage: Stage,
        exit_code: Option<i32>,
        output: String,
        duration: Duration,
    ) -> Self {
        Self {
            index: spec.index,
            axis: spec.axis.clone(),
            status: JobStatus::Fail,
            failed_stage: Some(stage),
            exit_code,
            timed_out: false,
            output,
            duration,
            diagnostic_log: None,
            log_artifact_path: None,
        }
    }

    /// A failure that happened outside any stage, e.g. a panicked job task.
    pub fn aborted(spec: &JobSpec, output: String) -> Self {
        Self {
            index: spec.index,
            axis: spec.axis.clone(),
            status: JobStatus::Fail,
            failed_stage: None,
            exit_code: None,
            timed_out: false,
            output,
            duration: Duration::ZERO,
            diagnostic_log: None,
            log_artifact_path: None,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.status == JobStatus::Fail
    }
}

/// All results of one matrix run, in declaration order.
/// 一次矩阵运行的全部结果，按声明顺序排列。
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunOutcome {
    pub results: Vec<JobResult>,
}

impl RunOutcome {
    pub fn new(mut results: Vec<JobResult>) -> Self {
        results.sort_by_key(|r| r.index);
        Self { results }
    }

    /// `Fail` if any axis failed, else `Pass`. An empty run passes.
    pub fn status(&self) -> JobStatus {
        if self.results.iter().any(JobResult::is_failure) {
            JobStatus::Fail
        } else {
            JobStatus::Pass
        }
    }

    pub fn failures(&self) -> Vec<&JobResult> {
        self.results.iter().filter(|r| r.is_failure()).collect()
    }

    pub fn passed_count(&self) -> usize {
        self.results.len() - self.failures().len()
    }
}
