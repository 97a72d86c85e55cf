//! # Configuration Module / 配置模块
//!
//! Loads the project file (`ReleaseMatrix.toml` by default) into an immutable
//! [`ProjectConfig`]. The file carries the release identity, the CI matrix
//! declaration and the trigger policy.
//!
//! 将项目文件（默认 `ReleaseMatrix.toml`）加载为不可变的 [`ProjectConfig`]。
//! 该文件包含发布标识、CI 矩阵声明以及触发策略。

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::compat::{CompatibilityThresholds, RuntimeVersion};
use crate::core::error::ConfigError;
use crate::core::models::{DEFAULT_FAILURE_LOG, DEFAULT_TEST_JOBS, EnvironmentAxis};
use crate::core::release::{CopyrightYears, ReleaseConfig, ReleaseDate, VersionTuple};
use crate::core::trigger::TriggerPolicy;

/// Default name of the project file.
pub const DEFAULT_CONFIG_FILE: &str = "ReleaseMatrix.toml";

/// The CI matrix declaration and the commands each job runs.
///
/// Command templates may reference `{os}`, `{runtime}` and `{requirements}`.
/// An empty template disables that step.
///
/// CI 矩阵声明以及每个任务运行的命令。命令模板可以引用 `{os}`、`{runtime}` 和 `{requirements}`。
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MatrixConfig {
    /// Explicit list of axes. Duplicates are allowed and produce duplicate jobs.
    pub axes: Vec<EnvironmentAxis>,
    /// Line-oriented dependency declaration consumed by the install step.
    pub requirements: PathBuf,
    pub test_command: String,
    /// Concurrency degree passed to the test command.
    pub jobs: usize,
    /// Fixed relative path of the diagnostic log.
    pub failure_log: PathBuf,
    /// Root directory of the local artifact store, relative to the project root.
    pub artifact_dir: PathBuf,
    pub isolate: bool,
    pub timeout_secs: Option<u64>,
    pub provision: Option<String>,
    pub install_runtime: Option<String>,
    pub install_dependencies: Option<String>,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            axes: vec![],
            requirements: PathBuf::from("requirements.txt"),
            test_command: "python runtest.py".to_string(),
            jobs: DEFAULT_TEST_JOBS,
            failure_log: PathBuf::from(DEFAULT_FAILURE_LOG),
            artifact_dir: PathBuf::from("matrix-artifacts"),
            isolate: true,
            timeout_secs: None,
            provision: None,
            install_runtime: None,
            install_dependencies: Some("python -m pip install -r {requirements}".to_string()),
        }
    }
}

/// The validated project configuration, built once and passed by reference.
/// 经过校验的项目配置，只构建一次并以引用方式传递。
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectConfig {
    /// The language for output messages (e.g. "en", "zh-CN").
    pub language: String,
    pub release: ReleaseConfig,
    pub matrix: MatrixConfig,
    /// `None` when the file has no `[triggers]` section; every event is then accepted.
    pub triggers: Option<TriggerPolicy>,
}

#[derive(Debug, Deserialize)]
struct RawProjectConfig {
    #[serde(default = "default_language")]
    language: String,
    release: Option<RawReleaseSection>,
    #[serde(default)]
    matrix: MatrixConfig,
    triggers: Option<TriggerPolicy>,
}

#[derive(Debug, Deserialize)]
struct RawReleaseSection {
    version_tuple: Option<VersionTuple>,
    unsupported_python_version: Option<RuntimeVersion>,
    deprecated_python_version: Option<RuntimeVersion>,
    release_date: Option<ReleaseDate>,
    month_year: Option<String>,
    copyright_years: Option<CopyrightYears>,
}

impl RawReleaseSection {
    fn validate(self) -> Result<ReleaseConfig, ConfigError> {
        let version_tuple = self.version_tuple.ok_or(ConfigError::MissingVersionTuple)?;
        let unsupported = self
            .unsupported_python_version
            .ok_or(ConfigError::MissingField("unsupported_python_version"))?;
        let deprecated = self
            .deprecated_python_version
            .ok_or(ConfigError::MissingField("deprecated_python_version"))?;

        Ok(ReleaseConfig {
            version_tuple,
            thresholds: CompatibilityThresholds {
                unsupported,
                deprecated,
            },
            release_date: self.release_date,
            month_year: self.month_year,
            copyright_years: self.copyright_years,
        })
    }
}

fn default_language() -> String {
    "en".to_string()
}

/// Parses project configuration text. `origin` is only used in error messages.
pub fn parse_project_config(content: &str, origin: &Path) -> Result<ProjectConfig, ConfigError> {
    let raw: RawProjectConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: origin.to_path_buf(),
        source,
    })?;

    let release = raw
        .release
        .ok_or(ConfigError::MissingVersionTuple)?
        .validate()?;

    Ok(ProjectConfig {
        language: raw.language,
        release,
        matrix: raw.matrix,
        triggers: raw.triggers,
    })
}

/// Reads and validates the project file at `path`.
/// 读取并校验位于 `path` 的项目文件。
pub fn load_project_config(path: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_project_config(&content, path)
}
