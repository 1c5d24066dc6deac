//! Trust marking for desktop shortcuts.
//!
//! Desktop environments disagree on what makes a `.desktop` file safe to
//! launch without a warning: the executable bit, GIO's `metadata::trusted`
//! attribute (or its legacy gvfs spelling), or on XFCE a checksum of the
//! file contents. Every mark whose tool is available is applied; each is
//! attempted independently and a failure never stops the others.

use sha2::{Digest, Sha256};
use std::path::Path;

use crate::config::InstallContext;
use crate::launcher::set_executable;
use crate::shell::{CommandSpec, ProcessRunner};

/// Trust-marking mechanisms available on this host, probed once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DesktopCapability {
    pub chmod: bool,
    pub gio: bool,
    pub gvfs_set_attribute: bool,
    pub xfce_session: bool,
    pub update_desktop_database: bool,
}

impl DesktopCapability {
    /// Probe tools on PATH and the session type.
    pub fn probe(ctx: &InstallContext, runner: &dyn ProcessRunner) -> Self {
        let capability = Self {
            chmod: runner.has_program("chmod"),
            gio: runner.has_program("gio"),
            gvfs_set_attribute: runner.has_program("gvfs-set-attribute"),
            xfce_session: is_xfce_session(ctx),
            update_desktop_database: runner.has_program("update-desktop-database"),
        };
        tracing::debug!("Desktop capability: {:?}", capability);
        capability
    }

    /// The marks to apply, in order.
    pub fn marks(&self) -> Vec<TrustMark> {
        let mut marks = vec![TrustMark::Permissions];
        if self.chmod {
            marks.push(TrustMark::ChmodExecutable);
        }
        if self.gio {
            marks.push(TrustMark::GioTrusted);
        }
        if self.gvfs_set_attribute {
            marks.push(TrustMark::GvfsTrusted);
        }
        if self.xfce_session && self.gio {
            marks.push(TrustMark::XfceChecksum);
        }
        marks
    }
}

fn is_xfce_session(ctx: &InstallContext) -> bool {
    ["XDG_CURRENT_DESKTOP", "DESKTOP_SESSION"]
        .iter()
        .filter_map(|key| ctx.env_var(key).ok())
        .any(|value| value.to_lowercase().contains("xfce"))
}

/// One trust-marking operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustMark {
    /// Mode 0755 through the filesystem API.
    Permissions,
    /// `chmod +x`.
    ChmodExecutable,
    /// `gio set <f> metadata::trusted true`.
    GioTrusted,
    /// `gvfs-set-attribute <f> metadata::trusted true`.
    GvfsTrusted,
    /// `gio set -t string <f> metadata::xfce-exe-checksum <sha256>`.
    XfceChecksum,
}

impl TrustMark {
    pub fn name(&self) -> &'static str {
        match self {
            TrustMark::Permissions => "permissions",
            TrustMark::ChmodExecutable => "chmod",
            TrustMark::GioTrusted => "gio trusted",
            TrustMark::GvfsTrusted => "gvfs trusted",
            TrustMark::XfceChecksum => "xfce checksum",
        }
    }

    /// Apply this mark to `file`.
    pub fn apply(&self, file: &Path, runner: &dyn ProcessRunner) -> anyhow::Result<()> {
        let spec = match self {
            TrustMark::Permissions => {
                set_executable(file)?;
                return Ok(());
            }
            TrustMark::ChmodExecutable => CommandSpec::new("chmod").arg("+x").path_arg(file),
            TrustMark::GioTrusted => CommandSpec::new("gio")
                .arg("set")
                .path_arg(file)
                .args(["metadata::trusted", "true"]),
            TrustMark::GvfsTrusted => CommandSpec::new("gvfs-set-attribute")
                .path_arg(file)
                .args(["metadata::trusted", "true"]),
            TrustMark::XfceChecksum => CommandSpec::new("gio")
                .args(["set", "-t", "string"])
                .path_arg(file)
                .arg("metadata::xfce-exe-checksum")
                .arg(file_sha256(file)?),
        };

        let result = runner.run(&spec)?;
        if !result.success {
            anyhow::bail!(
                "{} exited with {:?}{}",
                spec,
                result.exit_code,
                result
                    .stderr_tail()
                    .map(|t| format!(": {}", t))
                    .unwrap_or_default()
            );
        }
        Ok(())
    }
}

/// Hex SHA-256 of a file's contents.
pub fn file_sha256(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    let digest = Sha256::digest(&bytes);
    Ok(hex::encode(&digest[..]))
}

/// Apply every available mark to `file`, returning the ones that took.
pub fn mark_trusted(
    file: &Path,
    capability: &DesktopCapability,
    runner: &dyn ProcessRunner,
) -> Vec<TrustMark> {
    let mut applied = Vec::new();
    for mark in capability.marks() {
        match mark.apply(file, runner) {
            Ok(()) => applied.push(mark),
            Err(e) => tracing::warn!(
                "Could not apply {} to {}: {:#}",
                mark.name(),
                file.display(),
                e
            ),
        }
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppSpec, InstallTarget};
    use crate::shell::MockRunner;
    use tempfile::TempDir;

    fn ctx_with_env(vars: &'static [(&'static str, &'static str)]) -> InstallContext {
        let target = InstallTarget::for_home(Path::new("/home/u"), None, &AppSpec::default());
        InstallContext::builder(target)
            .search_path(vec![])
            .env_fn(move |key| {
                vars.iter()
                    .find(|(k, _)| *k == key)
                    .map(|(_, v)| v.to_string())
                    .ok_or(std::env::VarError::NotPresent)
            })
            .build()
    }

    #[test]
    fn detects_available_tools() {
        let ctx = ctx_with_env(&[]);
        let runner = MockRunner::new().with_programs(["chmod", "gio"]);
        let cap = DesktopCapability::probe(&ctx, &runner);
        assert!(cap.chmod);
        assert!(cap.gio);
        assert!(!cap.gvfs_set_attribute);
        assert!(!cap.xfce_session);
        assert!(!cap.update_desktop_database);
    }

    #[test]
    fn xfce_detected_from_either_variable() {
        let runner = MockRunner::new();
        let probe = |vars: &'static [(&'static str, &'static str)]| {
            DesktopCapability::probe(&ctx_with_env(vars), &runner).xfce_session
        };
        assert!(probe(&[("XDG_CURRENT_DESKTOP", "XFCE")]));
        assert!(probe(&[("DESKTOP_SESSION", "xfce")]));
        assert!(!probe(&[("XDG_CURRENT_DESKTOP", "GNOME")]));
    }

    #[test]
    fn marks_follow_capability() {
        assert_eq!(DesktopCapability::default().marks(), vec![TrustMark::Permissions]);

        let all = DesktopCapability {
            chmod: true,
            gio: true,
            gvfs_set_attribute: true,
            xfce_session: true,
            update_desktop_database: true,
        };
        assert_eq!(
            all.marks(),
            vec![
                TrustMark::Permissions,
                TrustMark::ChmodExecutable,
                TrustMark::GioTrusted,
                TrustMark::GvfsTrusted,
                TrustMark::XfceChecksum,
            ]
        );
    }

    #[test]
    fn xfce_checksum_needs_gio() {
        let cap = DesktopCapability {
            xfce_session: true,
            ..Default::default()
        };
        assert!(!cap.marks().contains(&TrustMark::XfceChecksum));
    }

    #[test]
    fn one_failing_mark_does_not_stop_the_rest() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("app.desktop");
        std::fs::write(&file, "[Desktop Entry]\n").unwrap();
        let runner = MockRunner::new();
        runner.on("gio set", |_, _| false);
        let cap = DesktopCapability {
            chmod: true,
            gio: true,
            gvfs_set_attribute: true,
            ..Default::default()
        };

        let applied = mark_trusted(&file, &cap, &runner);

        assert_eq!(
            applied,
            vec![
                TrustMark::Permissions,
                TrustMark::ChmodExecutable,
                TrustMark::GvfsTrusted
            ]
        );
        assert!(runner.was_run("gvfs-set-attribute"));
    }

    #[test]
    fn xfce_checksum_uses_file_digest() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("app.desktop");
        std::fs::write(&file, "abc").unwrap();
        let runner = MockRunner::new();

        TrustMark::XfceChecksum.apply(&file, &runner).unwrap();

        let calls = runner.calls();
        let call = &calls[0];
        assert!(call.starts_with("gio set -t string "));
        assert!(call.ends_with(
            "metadata::xfce-exe-checksum ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        ));
    }

    #[test]
    fn permissions_mark_fails_for_missing_file() {
        let dir = TempDir::new().unwrap();
        let runner = MockRunner::new();
        let missing = dir.path().join("nope.desktop");
        assert!(mark_trusted(&missing, &DesktopCapability::default(), &runner).is_empty());
    }
}
