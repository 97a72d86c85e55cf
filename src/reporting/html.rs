//! # HTML Reporting Module / HTML 报告模块
//!
//! Renders a self-contained HTML page for a matrix run: summary counts and one
//! row per axis with its status, failed stage, duration and archived log.
//!
//! 为矩阵运行渲染独立的 HTML 页面：汇总统计以及每个轴一行的详细信息。

use anyhow::{Context, Result};
use maud::{DOCTYPE, Markup, html};
use std::fs;
use std::path::Path;

use crate::core::models::{JobStatus, RunOutcome};
use crate::infra::t;
use crate::reporting::console::status_label;

const REPORT_STYLE: &str = r#"
body { font-family: sans-serif; margin: 2em; color: #222; }
table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid #ccc; padding: 6px 10px; text-align: left; vertical-align: top; }
th { background: #f2f2f2; }
.status-Pass { color: #1a7f37; font-weight: bold; }
.status-Fail { color: #cf222e; font-weight: bold; }
.summary span { margin-right: 1.5em; }
pre { max-height: 20em; overflow: auto; background: #f7f7f7; padding: 8px; }
"#;

/// Builds the report markup.
pub fn render_report(outcome: &RunOutcome, locale: &str) -> Markup {
    let overall = match outcome.status() {
        JobStatus::Pass => t!("report.overall_passed", locale = locale).to_string(),
        JobStatus::Fail => t!("report.overall_failed", locale = locale).to_string(),
    };
    let totals = t!(
        "report.totals",
        locale = locale,
        total = outcome.results.len(),
        passed = outcome.passed_count(),
        failed = outcome.failures().len()
    )
    .to_string();

    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (t!("html_report.title", locale = locale).to_string()) }
                style { (REPORT_STYLE) }
            }
            body {
                h1 { (t!("html_report.main_header", locale = locale).to_string()) }
                p.summary {
                    span { (overall) }
                    span { (totals) }
                }
                table {
                    thead {
                        tr {
                            th { (t!("html_report.col_status", locale = locale).to_string()) }
                            th { (t!("html_report.col_axis", locale = locale).to_string()) }
                            th { (t!("html_report.col_stage", locale = locale).to_string()) }
                            th { (t!("html_report.col_duration", locale = locale).to_string()) }
                            th { (t!("html_report.col_artifact", locale = locale).to_string()) }
                            th { (t!("html_report.col_output", locale = locale).to_string()) }
                        }
                    }
                    tbody {
                        @for result in &outcome.results {
                            tr {
                                td class=(format!("status-{:?}", result.status)) { (status_label(result, locale)) }
                                td { (result.axis.to_string()) }
                                td {
                                    @if let Some(stage) = result.failed_stage { (stage.as_str()) }
                                }
                                td { (format!("{:.2}s", result.duration.as_secs_f64())) }
                                td {
                                    @if let Some(path) = &result.log_artifact_path { (path.display().to_string()) }
                                }
                                td {
                                    @if result.is_failure() {
                                        details {
                                            summary { (t!("report.output_log", locale = locale).to_string()) }
                                            pre { (result.output) }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Writes the HTML report for `outcome` to `output_path`.
///
/// 将 `outcome` 的 HTML 报告写入 `output_path`。
pub fn generate_html_report(outcome: &RunOutcome, output_path: &Path, locale: &str) -> Result<()> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create report directory: {}", parent.display()))?;
    }
    fs::write(output_path, render_report(outcome, locale).into_string())
        .with_context(|| format!("Failed to write HTML report: {}", output_path.display()))
}
