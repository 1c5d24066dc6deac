//! Installing the application's Python requirements.

use serde::Serialize;
use std::path::Path;

use crate::config::InstallContext;
use crate::shell::{CommandSpec, ProcessRunner};

/// What happened to the requirements manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifestStatus {
    /// The source tree has no manifest.
    Absent,
    /// Installed into the user site.
    Installed,
    /// Installed only after overriding the externally-managed marker.
    InstalledBreakingSystemPackages,
    /// Both attempts failed; the application may be missing modules.
    Failed,
}

/// Install the manifest with `pip install --user -r`. Best-effort.
///
/// Distributions that mark their interpreter as externally managed reject
/// user installs; the second attempt passes `--break-system-packages`.
pub fn install_manifest(
    ctx: &InstallContext,
    interpreter: &Path,
    runner: &dyn ProcessRunner,
) -> ManifestStatus {
    let manifest = ctx.target.install_dir.join(&ctx.app.manifest);
    if !manifest.is_file() {
        tracing::debug!("No {} in source tree", ctx.app.manifest);
        return ManifestStatus::Absent;
    }

    let install = CommandSpec::new(interpreter.to_string_lossy())
        .args(["-m", "pip", "install", "--user", "-r"])
        .path_arg(&manifest)
        .current_dir(&ctx.target.install_dir);

    if runner.succeeds(&install) {
        tracing::info!("Installed {}", ctx.app.manifest);
        return ManifestStatus::Installed;
    }

    tracing::warn!(
        "'{}' failed; retrying with --break-system-packages",
        install
    );
    let retry = install.arg("--break-system-packages");
    if runner.succeeds(&retry) {
        return ManifestStatus::InstalledBreakingSystemPackages;
    }

    tracing::warn!("Could not install {}; the application may not start", ctx.app.manifest);
    ManifestStatus::Failed
}
