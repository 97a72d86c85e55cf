//! # Release Info Command / 发布信息命令
//!
//! Prints every value derived from the release identity: display string,
//! release date, month/year label, copyright span and the runtime thresholds.
//!
//! 打印由发布标识派生的所有值。

use anyhow::{Context, Result};
use colored::*;
use std::path::Path;

use crate::core::config;
use crate::core::release::{ReleaseInfo, SystemClock};
use crate::infra::t;

/// Executes the `release-info` command.
///
/// * `stamp` - replace a pre-release's sentinel patchlevel with the release date stamp.
/// * `check` - fail when the version still carries the sentinel patchlevel.
/// * `json` - print one JSON object instead of labelled lines.
pub fn execute(config_path: &Path, stamp: bool, check: bool, json: bool, locale: &str) -> Result<()> {
    let project = config::load_project_config(config_path)
        .with_context(|| t!("config_parse_failed", locale = locale).to_string())?;

    let mut info = ReleaseInfo::derive(&project.release, &SystemClock);
    if stamp {
        info = info.stamp();
    }
    if check {
        info.check_publishable()?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    print_info(&info, locale);
    if check {
        println!("\n{}", t!("release.publishable", locale = locale).green().bold());
    }
    Ok(())
}

fn print_info(info: &ReleaseInfo, locale: &str) {
    let rows = [
        (t!("release.version", locale = locale), info.version.clone()),
        (
            t!("release.release_date", locale = locale),
            info.release_date.format("%Y-%m-%d %H:%M:%S").to_string(),
        ),
        (t!("release.month_year", locale = locale), info.month_year.clone()),
        (t!("release.copyright", locale = locale), info.copyright_years.clone()),
        (
            t!("release.unsupported_runtime", locale = locale),
            info.unsupported_python_version.clone(),
        ),
        (
            t!("release.deprecated_runtime", locale = locale),
            info.deprecated_python_version.clone(),
        ),
    ];

    for (label, value) in rows {
        println!("{:<24} {}", format!("{label}:").bold(), value.cyan());
    }
}
