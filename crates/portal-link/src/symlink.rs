//! Idempotent directory symlinks, safe to race from several processes.
//!
//! Every attempt is a sequence of independent filesystem calls (read link,
//! remove, create parents, create target, symlink). Another portal process
//! may interleave with any of them, so a failed attempt is retried once
//! after a short pause before the error is reported.
use std::io;
use std::path::Path;

use tokio::fs;

use crate::paths;
use crate::{LinkError, RetryPolicy};

/// What [`SymlinkApplier::ensure`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymlinkOutcome {
    /// The link already pointed at the target; nothing was written.
    Unchanged,
    /// The link was (re)created.
    Created,
}

/// Creates `path -> target` directory symlinks with bounded retry.
#[derive(Debug, Clone, Default)]
pub struct SymlinkApplier {
    retry: RetryPolicy,
}

impl SymlinkApplier {
    pub fn new(retry: RetryPolicy) -> Self {
        Self { retry }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Make `path` a directory symlink to `target`, creating `target` and
    /// `path`'s parent as needed. A no-op if the link is already correct.
    pub async fn ensure(&self, target: &Path, path: &Path) -> Result<SymlinkOutcome, LinkError> {
        self.retry
            .run(|| renew(target, path))
            .await
            .map_err(|source| LinkError::Symlink {
                target: target.to_path_buf(),
                path: path.to_path_buf(),
                source,
            })
    }
}

/// One attempt.
async fn renew(target: &Path, path: &Path) -> io::Result<SymlinkOutcome> {
    if points_at(path, target).await {
        return Ok(SymlinkOutcome::Unchanged);
    }

    remove_any(path).await?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::create_dir_all(target).await?;
    symlink_dir(target, path).await?;
    Ok(SymlinkOutcome::Created)
}

/// True if `path` is a symlink whose contents resolve to `target`.
async fn points_at(path: &Path, target: &Path) -> bool {
    match fs::read_link(path).await {
        Ok(contents) => paths::resolve_link(path, &contents) == paths::normalize(target),
        Err(_) => false,
    }
}

/// Remove a file, symlink or directory tree at `path`. Missing is fine.
async fn remove_any(path: &Path) -> io::Result<()> {
    let meta = match fs::symlink_metadata(path).await {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };

    let result = if meta.is_dir() {
        fs::remove_dir_all(path).await
    } else if cfg!(windows) && meta.file_type().is_symlink() {
        // Directory symlinks on Windows are removed as directories
        match fs::remove_dir(path).await {
            Err(_) => fs::remove_file(path).await,
            ok => ok,
        }
    } else {
        fs::remove_file(path).await
    };

    match result {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

#[cfg(unix)]
async fn symlink_dir(target: &Path, path: &Path) -> io::Result<()> {
    fs::symlink(target, path).await
}

#[cfg(windows)]
async fn symlink_dir(target: &Path, path: &Path) -> io::Result<()> {
    fs::symlink_dir(target, path).await
}
