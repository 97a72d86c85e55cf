//! # Init Command Module / 初始化命令模块
//!
//! Creates a `ReleaseMatrix.toml` in the current directory, either through an
//! interactive wizard or directly from defaults with `--non-interactive`.
//!
//! 在当前目录中创建 `ReleaseMatrix.toml`，可以通过交互式向导，
//! 也可以使用 `--non-interactive` 直接写入默认配置。

use anyhow::{Context, Result};
use colored::*;
use dialoguer::{Confirm, Input, MultiSelect, Select, theme::ColorfulTheme};
use std::fs;
use std::path::Path;

use crate::core::config::DEFAULT_CONFIG_FILE;
use crate::core::models::EnvironmentAxis;
use crate::core::release::{ReleaseType, SENTINEL_PATCHLEVEL, VersionTuple};
use crate::infra::t;

/// Axes offered by the wizard. The flag marks the ones preselected.
const PRESET_AXES: &[(&str, &str, bool)] = &[
    ("ubuntu-22.04", "3.7", true),
    ("ubuntu-24.04", "3.13", true),
    ("windows-latest", "3.12", true),
    ("macos-latest", "3.12", false),
];

const RELEASE_TYPES: [ReleaseType; 4] = [
    ReleaseType::Alpha,
    ReleaseType::Beta,
    ReleaseType::Rc,
    ReleaseType::Final,
];

/// Everything the generated file depends on.
#[derive(Debug, Clone, PartialEq)]
pub struct InitAnswers {
    pub language: String,
    pub version_tuple: VersionTuple,
    pub axes: Vec<EnvironmentAxis>,
}

impl InitAnswers {
    pub fn defaults(language: &str) -> Self {
        Self {
            language: language.to_string(),
            version_tuple: VersionTuple::new(1, 0, 0, ReleaseType::Alpha, SENTINEL_PATCHLEVEL),
            axes: PRESET_AXES
                .iter()
                .filter(|(_, _, selected)| *selected)
                .map(|(os, runtime, _)| EnvironmentAxis::new(*os, *runtime))
                .collect(),
        }
    }
}

/// Renders the project file for `answers`.
///
/// 根据 `answers` 渲染项目文件内容。
pub fn render_config(answers: &InitAnswers) -> String {
    let v = &answers.version_tuple;
    let mut out = format!(
        r#"# Release matrix configuration / 发布矩阵配置

# Output language / 输出语言
language = "{language}"

[release]
# [major, minor, micro, type, patchlevel]; type is alpha, beta, rc or final.
# Pre-releases keep patchlevel 0 in source control and are stamped at build time.
version_tuple = [{major}, {minor}, {micro}, "{release_type}", {patchlevel}]
unsupported_python_version = [3, 6, 0]
deprecated_python_version = [3, 7, 0]
# release_date = "2025-03-01"
# month_year = "March 2025"
# copyright_years = {{ start = 2001, end = 2025 }}

[matrix]
requirements = "requirements.txt"
test_command = "python runtest.py"
jobs = 4
failure_log = "failed_tests.log"
artifact_dir = "matrix-artifacts"
isolate = true
# timeout_secs = 3600
# install_runtime = "uv python install {{runtime}}"
install_dependencies = "python -m pip install -r {{requirements}}"
"#,
        language = answers.language,
        major = v.major,
        minor = v.minor,
        micro = v.micro,
        release_type = v.release_type,
        patchlevel = v.patchlevel,
    );

    for axis in &answers.axes {
        out.push_str(&format!(
            "\n[[matrix.axes]]\nos = \"{}\"\nruntime = \"{}\"\n",
            axis.os, axis.runtime
        ));
    }

    out.push_str(
        r#"
[triggers]
push = ["master"]
pull_request = ["master"]
workflow_dispatch = true
"#,
    );
    out
}

/// Runs the `init` command.
pub fn run_init_wizard(language: &str, non_interactive: bool) -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);

    let answers = if non_interactive {
        if path.exists() {
            println!(
                "{}",
                t!("init.file_exists", locale = language, path = path.display()).yellow()
            );
            return Ok(());
        }
        InitAnswers::defaults(language)
    } else {
        let theme = ColorfulTheme::default();
        println!("\n{}", t!("init.welcome", locale = language).bold().cyan());
        println!("{}\n", t!("init.description", locale = language));

        if !confirm_overwrite(&theme, path, language)? {
            println!("{}", t!("init.aborted", locale = language).yellow());
            return Ok(());
        }
        prompt_answers(&theme, language)?
    };

    fs::write(path, render_config(&answers)).with_context(|| {
        t!("init.write_failed", locale = language, path = path.display()).to_string()
    })?;

    println!(
        "\n{} {}",
        "✔".green(),
        t!("init.success", locale = language, path = path.display()).bold()
    );
    println!("{}", t!("init.usage_hint", locale = language));
    Ok(())
}

fn confirm_overwrite(theme: &ColorfulTheme, path: &Path, language: &str) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    Confirm::with_theme(theme)
        .with_prompt(t!("init.overwrite_prompt", locale = language, path = path.display()).to_string())
        .default(false)
        .interact()
        .with_context(|| t!("init.confirmation_failed", locale = language).to_string())
}

fn prompt_answers(theme: &ColorfulTheme, language: &str) -> Result<InitAnswers> {
    let defaults = InitAnswers::defaults(language);

    let major: u32 = Input::with_theme(theme)
        .with_prompt(t!("init.major_prompt", locale = language).to_string())
        .default(defaults.version_tuple.major)
        .interact_text()?;
    let minor: u32 = Input::with_theme(theme)
        .with_prompt(t!("init.minor_prompt", locale = language).to_string())
        .default(defaults.version_tuple.minor)
        .interact_text()?;
    let micro: u32 = Input::with_theme(theme)
        .with_prompt(t!("init.micro_prompt", locale = language).to_string())
        .default(defaults.version_tuple.micro)
        .interact_text()?;

    let type_labels: Vec<&str> = RELEASE_TYPES.iter().map(|r| r.as_str()).collect();
    let type_index = Select::with_theme(theme)
        .with_prompt(t!("init.release_type_prompt", locale = language).to_string())
        .items(&type_labels)
        .default(0)
        .interact()?;
    let release_type = RELEASE_TYPES
        .get(type_index)
        .copied()
        .unwrap_or(ReleaseType::Alpha);

    let axis_labels: Vec<String> = PRESET_AXES
        .iter()
        .map(|(os, runtime, _)| format!("{os} / {runtime}"))
        .collect();
    let preselected: Vec<bool> = PRESET_AXES.iter().map(|(_, _, s)| *s).collect();
    let selections = MultiSelect::with_theme(theme)
        .with_prompt(t!("init.axes_prompt", locale = language).to_string())
        .items(&axis_labels)
        .defaults(&preselected)
        .interact()?;

    if selections.is_empty() {
        println!("{}", t!("init.no_axes_selected", locale = language).yellow());
    }

    Ok(InitAnswers {
        language: language.to_string(),
        version_tuple: VersionTuple::new(major, minor, micro, release_type, SENTINEL_PATCHLEVEL),
        axes: selections
            .into_iter()
            .filter_map(|i| PRESET_AXES.get(i))
            .map(|(os, runtime, _)| EnvironmentAxis::new(*os, *runtime))
            .collect(),
    })
}
