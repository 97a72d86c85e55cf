//! # Trigger Policy Module / 触发策略模块
//!
//! Decides whether an incoming CI event starts a matrix run. Every accepted
//! event produces the same full-matrix plan; the event kind never changes
//! which axes run.
//!
//! 判断传入的 CI 事件是否启动矩阵运行。所有被接受的事件都会产生相同的完整矩阵计划。

use serde::Deserialize;
use std::fmt;

/// The event that started a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerEvent {
    Push { branch: String },
    PullRequest { base: String },
    Manual,
}

impl fmt::Display for TriggerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Push { branch } => write!(f, "push to {branch}"),
            Self::PullRequest { base } => write!(f, "pull request into {base}"),
            Self::Manual => f.write_str("manual dispatch"),
        }
    }
}

/// The `[triggers]` section of the project file.
/// 项目文件中的 `[triggers]` 部分。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TriggerPolicy {
    #[serde(default)]
    pub push: Vec<String>,
    #[serde(default)]
    pub pull_request: Vec<String>,
    #[serde(default)]
    pub workflow_dispatch: bool,
}

impl TriggerPolicy {
    pub fn accepts(&self, event: &TriggerEvent) -> bool {
        match event {
            TriggerEvent::Push { branch } => self.push.iter().any(|b| b == branch),
            TriggerEvent::PullRequest { base } => self.pull_request.iter().any(|b| b == base),
            TriggerEvent::Manual => self.workflow_dispatch,
        }
    }
}

/// Evaluates an optional policy; a missing policy accepts everything.
pub fn is_accepted(policy: Option<&TriggerPolicy>, event: &TriggerEvent) -> bool {
    policy.is_none_or(|p| p.accepts(event))
}
