//! Putting the launcher directory on PATH.
//!
//! The startup file of the invoking shell gets a single export line. The
//! line is appended only when it is not already there, so running the
//! installer twice leaves exactly one copy.

use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use crate::config::InstallContext;
use crate::error::Result;
use crate::shell::{path_contains, ShellType};

/// What `ensure_on_path` did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PathUpdate {
    /// The bin directory is already on the search PATH.
    AlreadyOnPath,
    /// The export line was appended to `file`.
    Appended { file: PathBuf },
    /// `file` already contains the export line.
    AlreadyConfigured { file: PathBuf },
    /// No known startup file for the invoking shell; nothing was changed.
    UnknownShell,
}

impl PathUpdate {
    /// Command the user can run to pick up the change in the current session.
    pub fn reload_hint(&self) -> Option<String> {
        match self {
            PathUpdate::Appended { file } | PathUpdate::AlreadyConfigured { file } => {
                Some(format!("source {}", file.display()))
            }
            PathUpdate::AlreadyOnPath | PathUpdate::UnknownShell => None,
        }
    }
}

/// Make sure future shells find the launcher.
pub fn ensure_on_path(ctx: &InstallContext) -> Result<PathUpdate> {
    let bin_dir = &ctx.target.bin_dir;
    if path_contains(&ctx.search_path, bin_dir) {
        tracing::debug!("{} already on PATH", bin_dir.display());
        return Ok(PathUpdate::AlreadyOnPath);
    }

    let shell = ShellType::detect_with_env(&|key: &str| ctx.env_var(key));
    let home = &ctx.target.home;
    let (Some(file), Some(line)) = (
        shell.startup_file(home),
        shell.path_export_line(bin_dir, home),
    ) else {
        tracing::warn!(
            "Could not determine your shell; add {} to PATH manually",
            bin_dir.display()
        );
        return Ok(PathUpdate::UnknownShell);
    };

    let existing = match std::fs::read_to_string(&file) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    if existing.lines().any(|l| l.trim() == line) {
        tracing::debug!("{} already exports {}", file.display(), bin_dir.display());
        return Ok(PathUpdate::AlreadyConfigured { file });
    }

    if let Some(parent) = file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut handle = OpenOptions::new().create(true).append(true).open(&file)?;
    if !existing.is_empty() && !existing.ends_with('\n') {
        writeln!(handle)?;
    }
    writeln!(handle, "{}", line)?;

    tracing::info!("Added {} to PATH in {}", bin_dir.display(), file.display());
    Ok(PathUpdate::Appended { file })
}
