//! # Compatibility Gate Module / 兼容性检查模块
//!
//! Classifies a runtime version against the unsupported and deprecated
//! thresholds of a release. The gate only classifies; deciding whether to
//! abort or continue is left to the host.
//!
//! 根据发布的"不支持"和"已弃用"阈值对运行时版本进行分类。
//! 此检查只负责分类，是否中止由宿主决定。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::error::ConfigError;

/// A `(major, minor, micro)` runtime version, ordered lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "String")]
pub struct RuntimeVersion {
    pub major: u32,
    pub minor: u32,
    pub micro: u32,
}

impl RuntimeVersion {
    pub const fn new(major: u32, minor: u32, micro: u32) -> Self {
        Self { major, minor, micro }
    }

    fn from_components(parts: &[u32]) -> Option<Self> {
        match parts {
            [major] => Some(Self::new(*major, 0, 0)),
            [major, minor] => Some(Self::new(*major, *minor, 0)),
            [major, minor, micro, ..] => Some(Self::new(*major, *minor, *micro)),
            [] => None,
        }
    }
}

impl fmt::Display for RuntimeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)
    }
}

impl From<RuntimeVersion> for String {
    fn from(v: RuntimeVersion) -> Self {
        v.to_string()
    }
}

/// Config arrays must carry two or three components, e.g. `[3, 6]` or `[3, 6, 0]`.
impl TryFrom<Vec<u32>> for RuntimeVersion {
    type Error = ConfigError;

    fn try_from(parts: Vec<u32>) -> Result<Self, Self::Error> {
        if !(2..=3).contains(&parts.len()) {
            return Err(ConfigError::InvalidRuntimeVersion(format!("{parts:?}")));
        }
        Self::from_components(&parts)
            .ok_or_else(|| ConfigError::InvalidRuntimeVersion(format!("{parts:?}")))
    }
}

/// Parses the first dotted numeric run in the input, so both `"3.7"` and the
/// output of `python --version` (`"Python 3.12.1"`) are accepted. Missing
/// components default to zero; components past the third are ignored.
///
/// 解析输入中第一个以点分隔的数字序列。缺失的部分默认为 0。
impl FromStr for RuntimeVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidRuntimeVersion(s.trim().to_string());

        let start = s.find(|c: char| c.is_ascii_digit()).ok_or_else(invalid)?;
        let run: String = s[start..]
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();

        let parts = run
            .split('.')
            .filter(|p| !p.is_empty())
            .take(3)
            .map(|p| p.parse::<u32>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_components(&parts).ok_or_else(invalid)
    }
}

/// The two thresholds a release declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompatibilityThresholds {
    /// Runtimes strictly below this are unusable.
    pub unsupported: RuntimeVersion,
    /// Runtimes strictly below this (and not unsupported) are discouraged.
    pub deprecated: RuntimeVersion,
}

/// Classification of a runtime version.
/// 运行时版本的分类结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Verdict {
    /// The host must refuse to proceed.
    Fatal,
    /// The host should warn and continue.
    Deprecated,
    Ok,
}

#[derive(Debug, Clone, Copy)]
pub struct CompatibilityGate {
    thresholds: CompatibilityThresholds,
}

impl CompatibilityGate {
    pub fn new(thresholds: CompatibilityThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &CompatibilityThresholds {
        &self.thresholds
    }

    /// Strict less-than on both thresholds: a runtime equal to a threshold is
    /// never classified below it.
    pub fn evaluate(&self, runtime: RuntimeVersion) -> Verdict {
        if runtime < self.thresholds.unsupported {
            Verdict::Fatal
        } else if runtime < self.thresholds.deprecated {
            Verdict::Deprecated
        } else {
            Verdict::Ok
        }
    }
}
