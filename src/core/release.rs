//! # Release Identity Module / 发布标识模块
//!
//! This module holds the authoritative version tuple of a release and derives
//! everything else from it: the display string, the resolved release date, the
//! month/year label and the copyright span. Each optional override has an
//! explicit fallback derivation, so an unset field never means "disabled".
//!
//! 此模块保存发布版本的权威版本元组，并由此派生其他所有值：
//! 显示字符串、解析后的发布日期、月份/年份标签以及版权年份跨度。
//! 每个可选覆盖值都有明确的回退派生规则。
//!
//! Nothing in here performs I/O. "Now" is supplied through the [`Clock`] trait.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::compat::CompatibilityThresholds;
use crate::core::error::{ConfigError, ReleaseError};

/// Patchlevel committed in source control for pre-releases. It must be
/// replaced with a build-time date stamp before publishing.
pub const SENTINEL_PATCHLEVEL: u32 = 0;

/// Lifecycle stage of a version.
/// 版本的生命周期阶段。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseType {
    Alpha,
    Beta,
    /// Release candidate. `"candidate"` is accepted when reading configuration.
    #[serde(alias = "candidate")]
    Rc,
    Final,
}

impl ReleaseType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Alpha => "alpha",
            Self::Beta => "beta",
            Self::Rc => "rc",
            Self::Final => "final",
        }
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The structured release identifier `(major, minor, micro, type, patchlevel)`.
///
/// In configuration files it is written as a five element array, for example
/// `[4, 9, 0, "alpha", 0]`.
///
/// 结构化的发布标识符，在配置文件中写作五元素数组。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(
    from = "(u32, u32, u32, ReleaseType, u32)",
    into = "(u32, u32, u32, ReleaseType, u32)"
)]
pub struct VersionTuple {
    pub major: u32,
    pub minor: u32,
    pub micro: u32,
    pub release_type: ReleaseType,
    pub patchlevel: u32,
}

impl From<(u32, u32, u32, ReleaseType, u32)> for VersionTuple {
    fn from((major, minor, micro, release_type, patchlevel): (u32, u32, u32, ReleaseType, u32)) -> Self {
        Self {
            major,
            minor,
            micro,
            release_type,
            patchlevel,
        }
    }
}

impl From<VersionTuple> for (u32, u32, u32, ReleaseType, u32) {
    fn from(v: VersionTuple) -> Self {
        (v.major, v.minor, v.micro, v.release_type, v.patchlevel)
    }
}

impl VersionTuple {
    pub fn new(major: u32, minor: u32, micro: u32, release_type: ReleaseType, patchlevel: u32) -> Self {
        Self {
            major,
            minor,
            micro,
            release_type,
            patchlevel,
        }
    }

    pub fn is_final(&self) -> bool {
        self.release_type == ReleaseType::Final
    }

    /// Renders `major.minor.micro` for final releases and
    /// `major.minor.micro-type+patchlevel` for everything else.
    ///
    /// 对正式版渲染 `major.minor.micro`，其余渲染 `major.minor.micro-type+patchlevel`。
    pub fn display_string(&self) -> String {
        if self.is_final() {
            format!("{}.{}.{}", self.major, self.minor, self.micro)
        } else {
            format!(
                "{}.{}.{}-{}+{}",
                self.major, self.minor, self.micro, self.release_type, self.patchlevel
            )
        }
    }

    /// True for a pre-release whose patchlevel is still the committed sentinel.
    pub fn is_unstamped(&self) -> bool {
        !self.is_final() && self.patchlevel == SENTINEL_PATCHLEVEL
    }

    /// Replaces the patchlevel of a pre-release with the `YYYYMMDD` stamp of `date`.
    /// Final releases are returned unchanged since their patchlevel is never shown.
    pub fn stamped(self, date: NaiveDate) -> Self {
        if self.is_final() {
            return self;
        }
        let year = date.year().max(0) as u32;
        Self {
            patchlevel: year * 10_000 + date.month() * 100 + date.day(),
            ..self
        }
    }
}

impl fmt::Display for VersionTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_string())
    }
}

/// An explicit release date override: either a full timestamp or a date only.
/// 显式的发布日期覆盖值：完整时间戳或仅日期。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawReleaseDate")]
pub enum ReleaseDate {
    Timestamp(NaiveDateTime),
    DateOnly(NaiveDate),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawReleaseDate {
    Text(String),
    Parts(Vec<u32>),
}

impl TryFrom<RawReleaseDate> for ReleaseDate {
    type Error = ConfigError;

    fn try_from(raw: RawReleaseDate) -> Result<Self, Self::Error> {
        match raw {
            RawReleaseDate::Text(text) => ReleaseDate::parse(&text),
            RawReleaseDate::Parts(parts) => ReleaseDate::from_parts(&parts),
        }
    }
}

impl ReleaseDate {
    /// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS` and `YYYY-MM-DD HH:MM:SS`.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let text = text.trim();
        for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
            if let Ok(ts) = NaiveDateTime::parse_from_str(text, format) {
                return Ok(Self::Timestamp(ts));
            }
        }
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(Self::DateOnly)
            .map_err(|_| ConfigError::InvalidReleaseDate(text.to_string()))
    }

    /// Accepts `[year, month, day]` or `[year, month, day, hour, minute, second]`.
    pub fn from_parts(parts: &[u32]) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidReleaseDate(format!("{parts:?}"));
        let date = match parts {
            [y, m, d] | [y, m, d, _, _, _] => {
                NaiveDate::from_ymd_opt(*y as i32, *m, *d).ok_or_else(invalid)?
            }
            _ => return Err(invalid()),
        };
        match parts {
            [_, _, _, h, min, s] => date
                .and_hms_opt(*h, *min, *s)
                .map(Self::Timestamp)
                .ok_or_else(invalid),
            _ => Ok(Self::DateOnly(date)),
        }
    }
}

/// Optional copyright year overrides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct CopyrightYears {
    #[serde(default)]
    pub start: Option<i32>,
    #[serde(default)]
    pub end: Option<i32>,
}

/// A resolved copyright span. Renders `"start - end"`, or just `"end"` when
/// there is no distinct start year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyrightSpan {
    pub start: Option<i32>,
    pub end: i32,
}

impl fmt::Display for CopyrightSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.start {
            Some(start) if start != self.end => write!(f, "{} - {}", start, self.end),
            _ => write!(f, "{}", self.end),
        }
    }
}

/// Source of the current wall-clock time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Reads the local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Explicit timestamp wins, then an explicit date combined with the current
/// time of day, then the current date and time.
///
/// 优先级：显式时间戳 > 显式日期（结合当前时刻）> 当前日期时间。
pub fn resolve_release_date(explicit: Option<&ReleaseDate>, clock: &dyn Clock) -> NaiveDateTime {
    match explicit {
        Some(ReleaseDate::Timestamp(ts)) => *ts,
        Some(ReleaseDate::DateOnly(date)) => date.and_time(clock.now().time()),
        None => clock.now(),
    }
}

/// Explicit label wins, otherwise `"<Month> <Year>"` of the release date.
pub fn resolve_month_year(explicit: Option<&str>, release_date: NaiveDateTime) -> String {
    match explicit {
        Some(label) => label.to_string(),
        None => release_date.format("%B %Y").to_string(),
    }
}

/// Explicit end year wins, otherwise the release date's year.
pub fn resolve_copyright_years(
    explicit: Option<&CopyrightYears>,
    release_date: NaiveDateTime,
) -> CopyrightSpan {
    let years = explicit.copied().unwrap_or_default();
    CopyrightSpan {
        start: years.start,
        end: years.end.unwrap_or_else(|| release_date.year()),
    }
}

/// Validated release configuration. Built once at startup and shared by reference.
/// 经过校验的发布配置。启动时构建一次，并以引用方式共享。
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseConfig {
    pub version_tuple: VersionTuple,
    pub thresholds: CompatibilityThresholds,
    pub release_date: Option<ReleaseDate>,
    pub month_year: Option<String>,
    pub copyright_years: Option<CopyrightYears>,
}

/// Every value derived from a [`ReleaseConfig`], resolved once.
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseInfo {
    pub version_tuple: VersionTuple,
    pub version: String,
    pub release_date: NaiveDateTime,
    pub month_year: String,
    pub copyright_years: String,
    pub unsupported_python_version: String,
    pub deprecated_python_version: String,
}

impl ReleaseInfo {
    pub fn derive(config: &ReleaseConfig, clock: &dyn Clock) -> Self {
        let release_date = resolve_release_date(config.release_date.as_ref(), clock);
        let month_year = resolve_month_year(config.month_year.as_deref(), release_date);
        let copyright = resolve_copyright_years(config.copyright_years.as_ref(), release_date);

        Self {
            version_tuple: config.version_tuple,
            version: config.version_tuple.display_string(),
            release_date,
            month_year,
            copyright_years: copyright.to_string(),
            unsupported_python_version: config.thresholds.unsupported.to_string(),
            deprecated_python_version: config.thresholds.deprecated.to_string(),
        }
    }

    /// Stamps the patchlevel with the resolved release date.
    pub fn stamp(mut self) -> Self {
        self.version_tuple = self.version_tuple.stamped(self.release_date.date());
        self.version = self.version_tuple.display_string();
        self
    }

    pub fn check_publishable(&self) -> Result<(), ReleaseError> {
        if self.version_tuple.is_unstamped() {
            return Err(ReleaseError::UnstampedPrerelease {
                version: self.version.clone(),
            });
        }
        Ok(())
    }
}
