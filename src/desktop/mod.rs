//! Desktop integration.
//!
//! Installs a wrapper script in the install directory, writes the same
//! `.desktop` entry to the user's desktop and to the applications menu,
//! marks both as trusted in every way the host supports, and refreshes the
//! menu database. Only writing the wrapper is an error; everything else
//! degrades to a warning.
//!
//! - [`entry`] - Desktop entry and wrapper rendering
//! - [`trust`] - Capability probing and trust marks

pub mod entry;
pub mod trust;

pub use entry::{render_wrapper, DesktopEntry};
pub use trust::{file_sha256, mark_trusted, DesktopCapability, TrustMark};

use std::path::{Path, PathBuf};

use crate::config::InstallContext;
use crate::error::Result;
use crate::launcher::write_executable;
use crate::shell::{CommandSpec, ProcessRunner};

/// Writes and registers the graphical shortcuts.
pub struct DesktopIntegrator<'a> {
    ctx: &'a InstallContext,
    runner: &'a dyn ProcessRunner,
    capability: DesktopCapability,
}

impl<'a> DesktopIntegrator<'a> {
    pub fn new(
        ctx: &'a InstallContext,
        runner: &'a dyn ProcessRunner,
        capability: DesktopCapability,
    ) -> Self {
        Self {
            ctx,
            runner,
            capability,
        }
    }

    /// Install the wrapper and both shortcuts.
    ///
    /// Returns the shortcut files that were written.
    pub fn install(&self, interpreter: &Path) -> Result<Vec<PathBuf>> {
        let wrapper = &self.ctx.target.wrapper_path;
        write_executable(
            wrapper,
            &render_wrapper(interpreter, &self.ctx.app.entry_point),
        )?;
        tracing::debug!("Wrote wrapper {}", wrapper.display());

        let contents = DesktopEntry::for_install(self.ctx).render();
        let mut written = Vec::new();
        for shortcut in self.ctx.target.shortcut_paths() {
            if let Err(e) = write_shortcut(shortcut, &contents) {
                tracing::warn!("Could not write shortcut {}: {}", shortcut.display(), e);
                continue;
            }
            let applied = mark_trusted(shortcut, &self.capability, self.runner);
            tracing::info!(
                "Wrote shortcut {} ({} trust mark(s))",
                shortcut.display(),
                applied.len()
            );
            written.push(shortcut.to_path_buf());
        }

        self.refresh_menu_database();
        Ok(written)
    }

    fn refresh_menu_database(&self) {
        if !self.capability.update_desktop_database {
            tracing::debug!("update-desktop-database not available; skipping");
            return;
        }
        let Some(menu_dir) = self.ctx.target.menu_shortcut.parent() else {
            return;
        };
        let refresh = CommandSpec::new("update-desktop-database").path_arg(menu_dir);
        if !self.runner.succeeds(&refresh) {
            tracing::warn!("'{}' failed; the menu entry may appear after re-login", refresh);
        }
    }
}

fn write_shortcut(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)
}
