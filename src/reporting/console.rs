//! # Console Reporting Module / 控制台报告模块
//!
//! Prints the summary table of a matrix run and the captured output of the
//! failing axes.
//!
//! 打印矩阵运行的摘要表格以及失败轴的捕获输出。

use colored::*;

use crate::core::models::{JobResult, JobStatus, RunOutcome};
use crate::infra::t;

/// Status label for one result, localized.
pub fn status_label(result: &JobResult, locale: &str) -> String {
    match result.status {
        JobStatus::Pass => t!("report.status_passed", locale = locale).to_string(),
        JobStatus::Fail if result.timed_out => t!("report.status_timeout", locale = locale).to_string(),
        JobStatus::Fail => t!("report.status_failed", locale = locale).to_string(),
    }
}

/// Prints a formatted summary of the run.
///
/// 在控制台打印格式化的运行摘要。
///
/// # Output Format / 输出格式
/// ```text
/// --- Matrix Summary ---
///   - Status   | Axis                           | Duration | Stage                | Artifact
///   - Passed   | ubuntu-24.04 / 3.13            |    41.20s |                      |
///   - Failed   | ubuntu-22.04 / 3.7             |    12.03s | test                 | matrix-artifacts/...
/// ```
pub fn print_summary(outcome: &RunOutcome, locale: &str) {
    println!("\n{}", t!("report.summary_banner", locale = locale).bold());

    for result in &outcome.results {
        let label = status_label(result, locale);
        let status = if result.is_failure() {
            label.red()
        } else {
            label.green()
        };
        let stage = result
            .failed_stage
            .map(|s| s.to_string())
            .unwrap_or_default();
        let artifact = result
            .log_artifact_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        println!(
            "  - {:<10} | {:<30} | {:>9} | {:<20} | {}",
            status,
            result.axis.to_string(),
            format!("{:.2}s", result.duration.as_secs_f64()),
            stage,
            artifact
        );
    }

    println!(
        "\n{}",
        t!(
            "report.totals",
            locale = locale,
            total = outcome.results.len(),
            passed = outcome.passed_count(),
            failed = outcome.failures().len()
        )
    );
}

/// Prints the captured output of every failing axis.
///
/// 打印每个失败轴的捕获输出。
pub fn print_failure_details(outcome: &RunOutcome, locale: &str) {
    let failures = outcome.failures();
    if failures.is_empty() {
        return;
    }

    println!("\n{}", t!("report.failure_banner", locale = locale).red().bold());
    println!("{}", "-".repeat(80));

    for (i, result) in failures.iter().enumerate() {
        println!(
            "[{}/{}] {} '{}'",
            i + 1,
            failures.len(),
            t!("report.failure_header", locale = locale).red(),
            result.axis.to_string().cyan()
        );
        if let Some(stage) = result.failed_stage {
            println!("{}", t!("report.failed_stage", locale = locale, stage = stage));
        }
        if let Some(code) = result.exit_code {
            println!("{}", t!("report.exit_code", locale = locale, code = code));
        }
        println!("\n--- {} ---\n", t!("report.output_log", locale = locale).yellow());
        println!("{}", result.output.trim_end());
        println!("\n{}", "-".repeat(80));
    }
}
