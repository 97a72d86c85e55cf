//! # Run Command Module / 运行命令模块
//!
//! This module implements the `run` command, which executes the declared
//! environment matrix and reports one aggregate pass/fail outcome.
//!
//! 此模块实现 `run` 命令，执行声明的环境矩阵并报告一个整体的通过/失败结果。

use anyhow::{Context, Result};
use colored::*;
use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use crate::{
    core::{
        archive::FailureArchiver,
        config::{self, ProjectConfig},
        execution::JobExecutor,
        models::JobStatus,
        planner,
        runner::MatrixRunner,
        trigger::{self, TriggerEvent},
    },
    infra::t,
    reporting::{generate_html_report, print_failure_details, print_summary},
};

/// Arguments of the `run` command.
#[derive(Debug, Clone)]
pub struct RunArgs {
    pub config: PathBuf,
    pub project_dir: PathBuf,
    /// Maximum number of axes running at once. Defaults to the number of CPUs.
    pub max_parallel: Option<usize>,
    /// Overrides the test command concurrency degree from the config file.
    pub jobs: Option<usize>,
    pub total_runners: Option<usize>,
    pub runner_index: Option<usize>,
    pub event: TriggerEvent,
    pub html: Option<PathBuf>,
    /// Language given on the command line; takes precedence over the config file.
    pub language: Option<String>,
}

/// Executes the run command with the provided arguments.
///
/// # Returns
/// `Ok(())` when every axis passed, the event was not accepted, or there was
/// nothing to run. An error when at least one axis failed.
pub async fn execute(args: RunArgs) -> Result<()> {
    let (project, config_path) = setup_and_parse_config(&args.config)?;
    let locale = args
        .language
        .as_deref()
        .map(crate::resolve_locale)
        .unwrap_or_else(|| crate::resolve_locale(&project.language));
    rust_i18n::set_locale(&locale);

    let project_root = fs::canonicalize(&args.project_dir).with_context(|| {
        t!("project_dir_not_found", locale = locale, path = args.project_dir.display()).to_string()
    })?;

    println!(
        "{}",
        t!("loading_config", locale = locale, path = config_path.display())
    );
    println!(
        "{}",
        t!("project_root_detected", locale = locale, path = project_root.display())
    );
    println!(
        "{}",
        t!(
            "validating_release",
            locale = locale,
            version = project.release.version_tuple.display_string().yellow()
        )
    );

    if !trigger::is_accepted(project.triggers.as_ref(), &args.event) {
        println!(
            "{}",
            t!("trigger_not_accepted", locale = locale, event = &args.event).yellow()
        );
        return Ok(());
    }
    println!(
        "{}",
        t!("trigger_accepted", locale = locale, event = &args.event).cyan()
    );

    let plan = planner::plan_matrix(
        &project.matrix,
        args.jobs,
        args.total_runners,
        args.runner_index,
    )?;

    if let (Some(total), Some(index)) = (args.total_runners, args.runner_index) {
        println!(
            "{}",
            t!(
                "running_as_split_runner",
                locale = locale,
                index = index + 1,
                total = total,
                count = plan.jobs.len(),
                declared = plan.declared_axes
            )
            .bold()
        );
    } else {
        println!(
            "{}",
            t!("running_as_single_runner", locale = locale, count = plan.jobs.len()).bold()
        );
    }

    for key in &plan.colliding_keys {
        eprintln!(
            "{}",
            t!("run.artifact_key_collision", locale = locale, key = key).yellow()
        );
    }

    if plan.jobs.is_empty() {
        println!("{}", t!("no_axes_to_run", locale = locale).green());
        return Ok(());
    }

    let artifact_root = resolve_artifact_root(&project_root, &project);
    let executor = JobExecutor::new(&project_root, FailureArchiver::local(&artifact_root))
        .with_workspace_exclude(workspace_exclusions(&project.matrix.artifact_dir));
    let runner = MatrixRunner::new(executor, args.max_parallel.unwrap_or_else(num_cpus::get));

    let outcome = runner.run(plan.jobs).await;

    print_summary(&outcome, &locale);

    if let Some(report_path) = &args.html {
        println!(
            "\n{}",
            t!("html_report_generating", locale = locale, path = report_path.display())
        );
        if let Err(e) = generate_html_report(&outcome, report_path, &locale) {
            eprintln!(
                "{} {:#}",
                t!("html_report_failed", locale = locale).red(),
                e
            );
        }
    }

    match outcome.status() {
        JobStatus::Pass => {
            println!("\n{}", t!("all_axes_passed", locale = locale).green().bold());
            Ok(())
        }
        JobStatus::Fail => {
            print_failure_details(&outcome, &locale);
            anyhow::bail!(
                t!(
                    "matrix_failed",
                    locale = locale,
                    failed = outcome.failures().len(),
                    total = outcome.results.len()
                )
                .to_string()
            );
        }
    }
}

/// Sets up and parses the project configuration file.
fn setup_and_parse_config(config_path_arg: &Path) -> Result<(ProjectConfig, PathBuf)> {
    let config_path = fs::canonicalize(config_path_arg).with_context(|| {
        t!("config_read_failed_path", path = config_path_arg.display()).to_string()
    })?;

    let project = config::load_project_config(&config_path)
        .with_context(|| t!("config_parse_failed").to_string())?;

    Ok((project, config_path))
}

fn resolve_artifact_root(project_root: &Path, project: &ProjectConfig) -> PathBuf {
    let dir = &project.matrix.artifact_dir;
    if dir.is_absolute() {
        dir.clone()
    } else {
        project_root.join(dir)
    }
}

/// A relative artifact directory lives inside the project, so its top-level
/// entry must not be copied into workspaces.
fn workspace_exclusions(artifact_dir: &Path) -> Vec<PathBuf> {
    match artifact_dir.components().next() {
        Some(Component::Normal(first)) if artifact_dir.is_relative() => vec![PathBuf::from(first)],
        _ => vec![],
    }
}
