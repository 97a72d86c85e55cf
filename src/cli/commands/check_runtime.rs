//! # Check Runtime Command / 运行时检查命令
//!
//! Classifies a runtime version against the thresholds of the configured
//! release. The version is either given on the command line or read from the
//! output of a probe command such as `python --version`.
//!
//! 根据配置的发布阈值对运行时版本进行分类。版本可以直接在命令行给出，
//! 也可以从探测命令（如 `python --version`）的输出中读取。

use anyhow::{Context, Result, anyhow};
use colored::*;
use std::path::Path;

use crate::core::compat::{CompatibilityGate, CompatibilityThresholds, RuntimeVersion, Verdict};
use crate::core::config;
use crate::core::error::CompatibilityError;
use crate::infra::command::{parse_command_line, spawn_and_capture};
use crate::infra::t;

/// Executes the `check-runtime` command.
///
/// Exits with an error only for a `Fatal` verdict. A `Deprecated` verdict
/// prints a warning unless `suppress_warnings` is set.
pub async fn execute(
    config_path: &Path,
    version: Option<&str>,
    probe: Option<&str>,
    suppress_warnings: bool,
    locale: &str,
) -> Result<()> {
    let project = config::load_project_config(config_path)
        .with_context(|| t!("config_parse_failed", locale = locale).to_string())?;

    let found = match (version, probe) {
        (Some(text), _) => text.parse::<RuntimeVersion>()?,
        (None, Some(command)) => probe_runtime(command, locale).await?,
        (None, None) => return Err(anyhow!(t!("runtime.no_version", locale = locale).to_string())),
    };

    let gate = CompatibilityGate::new(project.release.thresholds);
    let verdict = gate.evaluate(found);
    enforce(verdict, found, gate.thresholds(), suppress_warnings, locale)?;

    if verdict == Verdict::Ok {
        println!(
            "{}",
            t!("runtime.supported", locale = locale, version = found).green()
        );
    }
    Ok(())
}

/// Turns a verdict into the host's reaction: `Fatal` becomes an error,
/// `Deprecated` prints a warning to stderr unless suppressed.
///
/// 将检查结果转换为宿主的处理：`Fatal` 返回错误，`Deprecated` 打印警告（除非被抑制）。
pub fn enforce(
    verdict: Verdict,
    found: RuntimeVersion,
    thresholds: &CompatibilityThresholds,
    suppress_warnings: bool,
    locale: &str,
) -> Result<Verdict, CompatibilityError> {
    match verdict {
        Verdict::Fatal => Err(CompatibilityError::Unsupported {
            found,
            minimum: thresholds.unsupported,
        }),
        Verdict::Deprecated => {
            if !suppress_warnings {
                eprintln!(
                    "{} {}",
                    t!("runtime.warning_prefix", locale = locale).yellow().bold(),
                    t!(
                        "runtime.deprecated",
                        locale = locale,
                        version = found,
                        recommended = thresholds.deprecated
                    )
                    .yellow()
                );
            }
            Ok(verdict)
        }
        Verdict::Ok => Ok(verdict),
    }
}

/// Runs `command` and parses the first version number in its output.
async fn probe_runtime(command: &str, locale: &str) -> Result<RuntimeVersion> {
    let line = parse_command_line(command, &[])?;
    let (status, output) = spawn_and_capture(line.to_command()).await;
    let status = status.with_context(|| {
        t!("runtime.probe_failed", locale = locale, command = &line.display).to_string()
    })?;
    if !status.success() {
        return Err(anyhow!(
            t!("runtime.probe_failed", locale = locale, command = &line.display).to_string()
        ));
    }
    Ok(output.parse::<RuntimeVersion>()?)
}
