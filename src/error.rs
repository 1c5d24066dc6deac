//! Error types for installer operations.
//!
//! This module defines [`InstallerError`], the error type used throughout
//! the installer, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Every `InstallerError` is fatal: it aborts the run and exits non-zero
//! - Degraded conditions (a trust mark failing, no recognised shell) are
//!   logged as warnings and never become an `InstallerError`
//! - Use `anyhow::Error` (via `InstallerError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for installer operations.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// None of the supported package managers is present on this host.
    #[error("Unsupported system: no supported package manager found (tried {tried})")]
    UnsupportedSystem { tried: String },

    /// A required dependency is still absent after every install strategy.
    #[error("Missing requirement '{requirement}': {message}")]
    RequirementMissing {
        requirement: String,
        message: String,
    },

    /// Cloning the application source failed.
    #[error("Failed to fetch source from {url}: {message}")]
    FetchFailed { url: String, message: String },

    /// The fetched source tree has no entry point to launch.
    #[error("Application entry point not found: {path}")]
    EntryPointMissing { path: PathBuf },

    /// An external command could not be started or exited non-zero.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for installer operations.
pub type Result<T> = std::result::Result<T, InstallerError>;
