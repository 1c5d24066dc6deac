//! Fetching the application source.
//!
//! Every install is a clean install: the install directory is removed and
//! the repository cloned fresh at depth 1. Local edits inside the install
//! directory do not survive a re-run.

use std::path::{Path, PathBuf};

use crate::config::InstallContext;
use crate::error::{InstallerError, Result};
use crate::shell::{CommandSpec, ProcessRunner};

/// Clones the application repository into the install directory.
pub struct SourceFetcher<'a> {
    ctx: &'a InstallContext,
    runner: &'a dyn ProcessRunner,
}

impl<'a> SourceFetcher<'a> {
    /// Create a fetcher for one run.
    pub fn new(ctx: &'a InstallContext, runner: &'a dyn ProcessRunner) -> Self {
        Self { ctx, runner }
    }

    /// Replace the install directory with a fresh shallow clone.
    ///
    /// Returns the install directory. Fails with `FetchFailed` when the
    /// clone fails and `EntryPointMissing` when it succeeds but the tree
    /// has no entry point.
    pub fn fetch(&self) -> Result<PathBuf> {
        let dir = &self.ctx.target.install_dir;
        let url = &self.ctx.repo_url;

        remove_existing(dir)?;
        if let Some(parent) = dir.parent() {
            std::fs::create_dir_all(parent)?;
        }

        tracing::info!("Cloning {} into {}", url, dir.display());
        let clone = CommandSpec::new("git")
            .args(["clone", "--depth", "1"])
            .arg(url.as_str())
            .path_arg(dir);

        let result = self.runner.run(&clone).map_err(|e| InstallerError::FetchFailed {
            url: url.clone(),
            message: e.to_string(),
        })?;

        if !result.success {
            return Err(InstallerError::FetchFailed {
                url: url.clone(),
                message: result
                    .stderr_tail()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("git exited with {:?}", result.exit_code)),
            });
        }

        let entry_point = self.ctx.entry_point();
        if !entry_point.is_file() {
            return Err(InstallerError::EntryPointMissing { path: entry_point });
        }

        Ok(dir.clone())
    }
}

fn remove_existing(dir: &Path) -> Result<()> {
    match std::fs::symlink_metadata(dir) {
        Ok(meta) if meta.is_dir() => {
            tracing::debug!("Removing previous install at {}", dir.display());
            std::fs::remove_dir_all(dir)?;
        }
        Ok(_) => std::fs::remove_file(dir)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
