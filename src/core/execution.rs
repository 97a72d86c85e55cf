//! # Job Execution Module / 任务执行模块
//!
//! Runs a single axis end to end: provision, install the runtime, install the
//! declared dependencies, run the test command. The first stage that exits
//! nonzero ends the chain and fails the job. On failure the fixed-path
//! diagnostic log is looked up and handed to the [`FailureArchiver`].
//!
//! 端到端地运行单个轴：准备环境、安装运行时、安装声明的依赖、运行测试命令。
//! 第一个以非零状态退出的阶段会终止流程并使任务失败。
//! 失败时会查找固定路径的诊断日志并交给 [`FailureArchiver`]。

use colored::*;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::Instant;

use crate::{
    core::{
        archive::FailureArchiver,
        models::{JobResult, JobSpec, Stage},
    },
    infra::{command, fs, t},
};

pub struct JobExecutor {
    project_root: PathBuf,
    archiver: FailureArchiver,
    /// Top-level project entries never copied into an isolated workspace.
    workspace_exclude: Vec<PathBuf>,
}

impl JobExecutor {
    pub fn new(project_root: impl Into<PathBuf>, archiver: FailureArchiver) -> Self {
        Self {
            project_root: project_root.into(),
            archiver,
            workspace_exclude: vec![],
        }
    }

    /// Excludes top-level project entries from workspace copies, e.g. the
    /// artifact directory.
    pub fn with_workspace_exclude(mut self, names: Vec<PathBuf>) -> Self {
        self.workspace_exclude = names;
        self
    }

    /// Executes one job and reports its result. Every problem, including a
    /// workspace that cannot be prepared, is reported as a failing result so
    /// that sibling axes are never affected.
    ///
    /// 执行一个任务并返回结果。所有问题都以失败结果的形式报告，不影响其他轴。
    pub async fn execute(&self, spec: &JobSpec) -> JobResult {
        let start = Instant::now();
        println!("{}", t!("run.axis_started", axis = &spec.axis).blue());

        let (workdir, _workspace_guard) = if spec.isolate {
            let mut exclude = self.workspace_exclude.clone();
            exclude.push(spec.failure_log.clone());
            match fs::create_workspace(&self.project_root, &spec.axis.key(), &exclude) {
                Ok((path, guard)) => (path, Some(guard)),
                Err(e) => {
                    let result =
                        JobResult::failed(spec, Stage::Provision, None, format!("{e:#}\n"), start.elapsed());
                    self.report(&result);
                    return result;
                }
            }
        } else {
            (self.project_root.clone(), None)
        };

        // Only a log written by this run counts as its diagnostic log.
        let log = workdir.join(&spec.failure_log);
        let leftover_log = fs::modified_time(&log);

        let mut result = self.run_steps(spec, &workdir, start).await;

        if result.is_failure() {
            result.diagnostic_log = fs::written_since(&log, leftover_log);
            match self.archiver.archive(&result) {
                Ok(Some(path)) => {
                    println!(
                        "{}",
                        t!("run.log_archived", axis = &spec.axis, path = path.display()).yellow()
                    );
                    result.log_artifact_path = Some(path);
                }
                Ok(None) => {
                    println!("{}", t!("run.log_missing", axis = &spec.axis).dimmed());
                }
                Err(e) => {
                    eprintln!(
                        "{}",
                        t!("run.archive_failed", axis = &spec.axis, error = format!("{e:#}")).yellow()
                    );
                }
            }
        }

        self.report(&result);
        result
    }

    async fn run_steps(&self, spec: &JobSpec, workdir: &Path, start: Instant) -> JobResult {
        let deadline = spec
            .timeout_secs
            .map(|secs| start + Duration::from_secs(secs));
        let vars = [
            ("MATRIX_OS", spec.axis.os.as_str()),
            ("MATRIX_RUNTIME", spec.axis.runtime.as_str()),
        ];
        let mut output = String::new();

        for (stage, line) in spec.steps() {
            let command_line = match command::parse_command_line(&line, &vars) {
                Ok(c) => c,
                Err(e) => {
                    output.push_str(&format!("{e:#}\n"));
                    return JobResult::failed(spec, stage, None, output, start.elapsed());
                }
            };

            println!(
                "{}",
                t!("run.stage_started", axis = &spec.axis, stage = stage, command = &command_line.display).blue()
            );
            output.push_str(&format!("{} {}\n", t!("run.command_prefix"), command_line.display));

            let mut cmd = command_line.to_command();
            cmd.current_dir(workdir).envs(vars);

            let status = match deadline {
                Some(deadline) => {
                    let timed = tokio::time::timeout_at(deadline, command::spawn_into(cmd, &mut output)).await;
                    match timed {
                        Ok(status) => status,
                        Err(_) => {
                            output.push_str(&format!("{}\n", t!("run.timeout_message")));
                            let mut result = JobResult::failed(spec, stage, None, output, start.elapsed());
                            result.timed_out = true;
                            return result;
                        }
                    }
                }
                None => command::spawn_into(cmd, &mut output).await,
            };

            match status {
                Ok(status) if status.success() => {}
                Ok(status) => {
                    return JobResult::failed(spec, stage, status.code(), output, start.elapsed());
                }
                Err(e) => {
                    output.push_str(&format!(
                        "{}\n",
                        t!("run.spawn_failed", command = &command_line.program, error = e)
                    ));
                    return JobResult::failed(spec, stage, None, output, start.elapsed());
                }
            }
        }

        JobResult::passed(spec, output, start.elapsed())
    }

    fn report(&self, result: &JobResult) {
        let duration = format!("{:.2}", result.duration.as_secs_f64());
        if result.is_failure() {
            let stage = result
                .failed_stage
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{}",
                t!("run.axis_failed", axis = &result.axis, stage = stage, duration = duration).red()
            );
        } else {
            println!(
                "{}",
                t!("run.axis_passed", axis = &result.axis, duration = duration).green()
            );
        }
    }
}
