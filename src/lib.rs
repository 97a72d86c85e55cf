//! # Release Matrix Library / Release Matrix 库
//!
//! This library declares and derives a project's canonical release identity
//! (version string, release date, copyright span, runtime compatibility
//! thresholds) and validates the project across a declared matrix of
//! operating-system / runtime combinations, archiving diagnostics of the
//! axes that fail.
//!
//! 此库声明并派生项目的权威发布标识（版本字符串、发布日期、版权年份、运行时兼容性阈值），
//! 并在声明的操作系统/运行时组合矩阵上验证项目，归档失败轴的诊断信息。
//!
//! ## Modules / 模块
//!
//! - `core` - Release model, compatibility gate, configuration and the matrix pipeline
//! - `infra` - Command execution, file system operations and i18n
//! - `reporting` - Console and HTML reports
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 发布模型、兼容性检查、配置和矩阵流水线
//! - `infra` - 命令执行、文件系统操作和国际化
//! - `reporting` - 控制台和 HTML 报告
//! - `cli` - 命令行接口和命令

pub mod cli;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use crate::core::config;
pub use crate::core::models;
pub use crate::core::release;

/// Detects the system locale and maps it onto an available translation.
///
/// It attempts to match the full locale (e.g. "zh-CN"), then just the
/// language code (e.g. "en"), and finally falls back to "en".
pub fn detect_locale() -> String {
    let locale = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
    resolve_locale(&locale)
}

/// Maps a requested locale onto one of the bundled translations.
pub fn resolve_locale(requested: &str) -> String {
    let available = rust_i18n::available_locales!();
    if available.iter().any(|l| *l == requested) {
        return requested.to_string();
    }
    requested
        .split(['-', '_'])
        .next()
        .and_then(|lang| available.iter().find(|l| l.split('-').next() == Some(lang)))
        .map(|l| l.to_string())
        .unwrap_or_else(|| "en".to_string())
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
