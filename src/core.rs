//! # Core Module / 核心模块
//!
//! This module contains the core functionality: the release identity model,
//! the compatibility gate, configuration, and the CI matrix pipeline
//! (planning, execution, archiving).
//!
//! 此模块包含核心功能：发布标识模型、兼容性检查、配置，
//! 以及 CI 矩阵流水线（计划、执行、归档）。

pub mod archive;
pub mod compat;
pub mod config;
pub mod error;
pub mod execution;
pub mod models;
pub mod planner;
pub mod release;
pub mod runner;
pub mod trigger;

// Re-exports
pub use compat::{CompatibilityGate, Verdict};
pub use config::ProjectConfig;
pub use models::{JobResult, RunOutcome};
pub use release::ReleaseInfo;
