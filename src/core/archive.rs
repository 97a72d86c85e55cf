//! # Failure Archiver Module / 失败归档模块
//!
//! Persists the diagnostic log of a failing job under a key namespaced by the
//! job's axis, so concurrently failing axes never overwrite each other's logs.
//! Passing jobs are never archived.
//!
//! 将失败任务的诊断日志以该任务所在轴命名的键进行保存，
//! 使并发失败的轴不会互相覆盖日志。通过的任务从不归档。

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::models::JobResult;

/// Storage backend for archived logs.
pub trait ArtifactStore: Send + Sync {
    /// Stores `source` under the artifact `name` and returns where it ended up.
    fn store(&self, name: &str, source: &Path) -> Result<PathBuf>;
}

/// Stores artifacts as `<root>/<name>/<file name>` on the local file system.
#[derive(Debug, Clone)]
pub struct LocalArtifactStore {
    root: PathBuf,
}

impl LocalArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ArtifactStore for LocalArtifactStore {
    fn store(&self, name: &str, source: &Path) -> Result<PathBuf> {
        let dir = self.root.join(name);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create artifact directory: {}", dir.display()))?;

        let file_name = source
            .file_name()
            .with_context(|| format!("Artifact source has no file name: {}", source.display()))?;
        let dest = dir.join(file_name);
        fs::copy(source, &dest).with_context(|| {
            format!("Failed to copy {} to {}", source.display(), dest.display())
        })?;
        Ok(dest)
    }
}

pub struct FailureArchiver {
    store: Box<dyn ArtifactStore>,
}

impl FailureArchiver {
    pub fn new(store: impl ArtifactStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Convenience constructor for a [`LocalArtifactStore`] rooted at `root`.
    pub fn local(root: impl Into<PathBuf>) -> Self {
        Self::new(LocalArtifactStore::new(root))
    }

    /// Archives the diagnostic log of `result`.
    ///
    /// Returns `Ok(None)` without touching the store when the job passed, or
    /// when it failed without leaving a log behind.
    ///
    /// 归档 `result` 的诊断日志。任务通过或失败但没有日志时返回 `Ok(None)`。
    pub fn archive(&self, result: &JobResult) -> Result<Option<PathBuf>> {
        if !result.is_failure() {
            return Ok(None);
        }
        let Some(log) = result.diagnostic_log.as_deref().filter(|p| p.is_file()) else {
            return Ok(None);
        };
        self.store
            .store(&result.axis.artifact_name(), log)
            .map(Some)
    }
}
