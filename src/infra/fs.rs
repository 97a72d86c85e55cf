//! # File System Operations Module / 文件系统操作模块
//!
//! Per-axis workspaces and artifact directories.
//!
//! 每个轴的工作区和产物目录。

use anyhow::{Context, Result};
use fs_extra::dir::CopyOptions;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;
use tempfile::TempDir;

/// Replaces everything except ASCII alphanumerics, `-`, `.` and `_` with `_`.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Creates a private temporary workspace for one axis and copies the project
/// into it. Single-component entries in `exclude` are skipped at the top
/// level; longer relative paths are removed from the copy afterwards.
/// Absolute paths and paths containing `..` are ignored.
///
/// The directory is deleted when the returned `TempDir` is dropped.
///
/// 为单个轴创建私有临时工作区并将项目复制进去。`exclude` 中的条目不会出现在工作区中。
/// 返回的 `TempDir` 被丢弃时目录会被删除。
pub fn create_workspace(project_root: &Path, axis_key: &str, exclude: &[PathBuf]) -> Result<(PathBuf, TempDir)> {
    let temp_dir = tempfile::Builder::new()
        .prefix(&format!("release_matrix_{}_", sanitize_name(axis_key)))
        .tempdir()
        .context("Failed to create temporary workspace")?;
    let workspace = temp_dir.path().to_path_buf();

    // Only plain relative paths can name something inside the workspace.
    let (top_level, nested): (Vec<&PathBuf>, Vec<&PathBuf>) = exclude
        .iter()
        .filter(|ex| ex.components().all(|c| matches!(c, Component::Normal(_))))
        .partition(|ex| ex.components().count() == 1);

    let entries: Vec<PathBuf> = fs::read_dir(project_root)
        .with_context(|| format!("Failed to read project directory: {}", project_root.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .is_none_or(|name| !top_level.iter().any(|ex| ex.as_os_str() == name))
        })
        .collect();

    if !entries.is_empty() {
        let mut options = CopyOptions::new();
        options.overwrite = true;
        fs_extra::copy_items(entries.as_slice(), &workspace, &options).with_context(|| {
            format!(
                "Failed to copy {} into workspace {}",
                project_root.display(),
                workspace.display()
            )
        })?;
    }

    for path in nested {
        let target = workspace.join(path);
        let removed = if target.is_dir() {
            fs::remove_dir_all(&target)
        } else {
            fs::remove_file(&target)
        };
        match removed {
            Err(e) if e.kind() != ErrorKind::NotFound => {
                return Err(e).with_context(|| format!("Failed to remove {} from workspace", target.display()));
            }
            _ => {}
        }
    }

    Ok((workspace, temp_dir))
}

/// Last modification time of `path`, if it exists.
pub fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Returns `path` if it is a file that did not exist at `before`, or has been
/// modified since. A leftover file from an earlier run yields `None`.
///
/// 若 `path` 是在 `before` 之后新建或修改过的文件则返回它；之前遗留的文件返回 `None`。
pub fn written_since(path: &Path, before: Option<SystemTime>) -> Option<PathBuf> {
    if !path.is_file() {
        return None;
    }
    match (before, modified_time(path)) {
        (Some(before), Some(now)) if now <= before => None,
        _ => Some(path.to_path_buf()),
    }
}
