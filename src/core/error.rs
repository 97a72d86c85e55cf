//! # Error Types / 错误类型
//!
//! Typed errors raised by the core library. Command handlers wrap these in
//! `anyhow` with additional context before reporting them.
//!
//! 核心库抛出的类型化错误。命令处理器会用 `anyhow` 包装它们并附加上下文。

use std::path::PathBuf;
use thiserror::Error;

use crate::core::compat::RuntimeVersion;

/// Errors raised while loading or validating the project configuration.
/// 加载或校验项目配置时产生的错误。
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The mandatory `version_tuple` field is absent.
    #[error("release configuration is missing the mandatory `version_tuple` field")]
    MissingVersionTuple,

    #[error("release configuration is missing the mandatory `{0}` field")]
    MissingField(&'static str),

    #[error("invalid release date: {0}")]
    InvalidReleaseDate(String),

    #[error("invalid runtime version: `{0}`")]
    InvalidRuntimeVersion(String),

    #[error("failed to read configuration file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Errors raised while preparing release information for publishing.
#[derive(Debug, Error)]
pub enum ReleaseError {
    /// A pre-release still carries the sentinel patchlevel committed in source control.
    #[error("pre-release version {version} still carries the sentinel patchlevel; stamp it before publishing")]
    UnstampedPrerelease { version: String },
}

/// Raised by the host when the gate classifies the running runtime as unusable.
/// 当兼容性检查将运行时判定为不可用时由宿主抛出。
#[derive(Debug, Error)]
pub enum CompatibilityError {
    #[error("runtime {found} is no longer supported; {minimum} or later is required")]
    Unsupported {
        found: RuntimeVersion,
        minimum: RuntimeVersion,
    },
}
