//! The install sequence.
//!
//! Everything up to and including the source fetch is fatal on failure:
//! without a package manager, the required dependencies or the source tree
//! there is nothing useful left to do. Every step after the fetch degrades
//! to a warning so that a partial install still ends with a summary.

use std::path::Path;

use crate::config::InstallContext;
use crate::desktop::{DesktopCapability, DesktopIntegrator};
use crate::error::{InstallerError, Result};
use crate::fetch::{Downloader, SourceFetcher};
use crate::launcher::{ensure_on_path, LauncherBuilder};
use crate::requirements::{
    Dependency, DependencyInstaller, DependencyReport, EnsureOutcome, PackageManagerProfile,
    Privilege, Toolchain,
};
use crate::shell::{is_elevated, CommandSpec, ProcessRunner};
use crate::ui::{Prompt, UserInterface};
use crate::verify::verify;

use super::manifest::{install_manifest, ManifestStatus};
use super::report::InstallReport;

/// Whether to start the application once installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchPolicy {
    /// Prompt on interactive terminals; never launch otherwise.
    Ask,
    /// Launch without prompting.
    Always,
    /// Never launch.
    Never,
}

/// Per-run options that are not part of the install context.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub launch: LaunchPolicy,
    /// Whether the installer already runs as root.
    pub elevated: bool,
}

impl RunOptions {
    /// Options for the current process.
    pub fn new(launch: LaunchPolicy) -> Self {
        Self {
            launch,
            elevated: is_elevated(),
        }
    }
}

/// Runs the whole install.
pub struct Orchestrator<'a> {
    ctx: &'a InstallContext,
    runner: &'a dyn ProcessRunner,
    downloader: &'a dyn Downloader,
    options: RunOptions,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        ctx: &'a InstallContext,
        runner: &'a dyn ProcessRunner,
        downloader: &'a dyn Downloader,
        options: RunOptions,
    ) -> Self {
        Self {
            ctx,
            runner,
            downloader,
            options,
        }
    }

    /// Install (or reinstall) the application.
    pub fn run(&self, ui: &mut dyn UserInterface) -> Result<InstallReport> {
        ui.show_header(&format!("Installing {}", self.ctx.app.display_name));

        let profile = self.resolve_profile(ui)?;
        let (toolchain, dependencies) = self.ensure_dependencies(&profile, ui)?;
        let interpreter = toolchain.interpreter.as_path();

        let mut spinner = ui.start_spinner("Downloading application");
        let install_dir = match SourceFetcher::new(self.ctx, self.runner).fetch() {
            Ok(dir) => {
                spinner.finish_success(&format!("Downloaded to {}", dir.display()));
                dir
            }
            Err(e) => {
                spinner.finish_error("Download failed");
                return Err(e);
            }
        };

        let mut spinner = ui.start_spinner("Installing Python requirements");
        let manifest = install_manifest(self.ctx, interpreter, self.runner);
        match manifest {
            ManifestStatus::Absent => spinner.finish_skipped("No requirements to install"),
            ManifestStatus::Installed => spinner.finish_success("Requirements installed"),
            ManifestStatus::InstalledBreakingSystemPackages => spinner
                .finish_warning("Requirements installed with --break-system-packages"),
            ManifestStatus::Failed => spinner.finish_warning("Requirements not installed"),
        }

        let mut spinner = ui.start_spinner("Creating launcher");
        let launcher = match LauncherBuilder::new(self.ctx).build(interpreter) {
            Ok(path) => {
                spinner.finish_success(&format!("Launcher: {}", path.display()));
                Some(path)
            }
            Err(e) => {
                tracing::warn!("Could not write launcher: {}", e);
                spinner.finish_warning("Launcher not created");
                None
            }
        };
        let path_update = match ensure_on_path(self.ctx) {
            Ok(update) => Some(update),
            Err(e) => {
                tracing::warn!("Could not update PATH: {}", e);
                ui.warning(&format!(
                    "Add {} to your PATH manually",
                    self.ctx.target.bin_dir.display()
                ));
                None
            }
        };

        let mut spinner = ui.start_spinner("Creating desktop shortcuts");
        let capability = DesktopCapability::probe(self.ctx, self.runner);
        let shortcuts = match DesktopIntegrator::new(self.ctx, self.runner, capability)
            .install(interpreter)
        {
            Ok(written) if written.is_empty() => {
                spinner.finish_warning("No shortcut could be written");
                written
            }
            Ok(written) => {
                spinner.finish_success(&format!("{} shortcut(s) created", written.len()));
                written
            }
            Err(e) => {
                tracing::warn!("Desktop integration failed: {}", e);
                spinner.finish_warning("Desktop shortcuts not created");
                Vec::new()
            }
        };

        let mut spinner = ui.start_spinner("Verifying installation");
        let verification = verify(self.ctx, interpreter, self.runner);
        if verification.is_clean() {
            spinner.finish_success("Installation verified");
        } else {
            spinner.finish_warning(&format!(
                "{} check(s) failed: {}",
                verification.error_count,
                verification.failures().join(", ")
            ));
        }

        let mut report = InstallReport {
            package_manager: toolchain.profile.kind(),
            dependencies,
            interpreter: toolchain.interpreter.clone(),
            install_dir,
            manifest,
            launcher,
            path_update,
            shortcuts,
            verification,
            launched: false,
        };

        ui.show_summary(&report.summary_lines());
        if let Some(hint) = report.path_update.as_ref().and_then(|u| u.reload_hint()) {
            ui.show_hint(&format!(
                "Run '{}' or open a new terminal to use {}",
                hint, self.ctx.app.command_name
            ));
        }
        if report.verification.is_clean() {
            ui.success(&format!("{} installed", self.ctx.app.display_name));
        } else {
            ui.warning(&format!(
                "{} installed with {} verification error(s)",
                self.ctx.app.display_name, report.verification.error_count
            ));
        }

        report.launched = self.maybe_launch(ui, interpreter);
        Ok(report)
    }

    fn resolve_profile(&self, ui: &mut dyn UserInterface) -> Result<PackageManagerProfile> {
        let mut spinner = ui.start_spinner("Detecting package manager");
        match PackageManagerProfile::resolve_with_privilege(self.runner, self.options.elevated) {
            Ok(profile) => {
                let executable = profile.kind().executable();
                if profile.privilege() == Privilege::Unprivileged {
                    spinner.finish_warning(&format!("Package manager: {} (no sudo)", executable));
                } else {
                    spinner.finish_success(&format!("Package manager: {}", executable));
                }
                Ok(profile)
            }
            Err(e) => {
                spinner.finish_error("No supported package manager");
                Err(e)
            }
        }
    }

    fn ensure_dependencies(
        &self,
        profile: &PackageManagerProfile,
        ui: &mut dyn UserInterface,
    ) -> Result<(Toolchain, Vec<DependencyReport>)> {
        let mut installer = DependencyInstaller::new(self.ctx, profile, self.runner, self.downloader);
        let mut reports = Vec::new();

        for dependency in Dependency::all() {
            let name = dependency.kind.name();
            let mut spinner = ui.start_spinner(&format!("Checking {}", name));
            let outcome = match installer.ensure(&dependency) {
                Ok(outcome) => outcome,
                Err(e) => {
                    spinner.finish_error(&format!("{} unavailable", name));
                    return Err(e);
                }
            };
            match &outcome {
                EnsureOutcome::AlreadyPresent => {
                    spinner.finish_success(&format!("{} already present", name))
                }
                EnsureOutcome::InstalledOk { strategy } => {
                    spinner.finish_success(&format!("{} installed via {}", name, strategy))
                }
                EnsureOutcome::InstalledWithWarning { warning } => spinner.finish_warning(warning),
            }
            reports.push(DependencyReport {
                kind: dependency.kind,
                outcome,
            });
        }

        let toolchain = installer
            .toolchain()
            .ok_or_else(|| InstallerError::RequirementMissing {
                requirement: "python3".to_string(),
                message: "no interpreter resolved on PATH".to_string(),
            })?;
        Ok((toolchain, reports))
    }

    /// Start the application detached when the policy allows. Never fails
    /// the run.
    fn maybe_launch(&self, ui: &mut dyn UserInterface, interpreter: &Path) -> bool {
        let wanted = match self.options.launch {
            LaunchPolicy::Never => false,
            LaunchPolicy::Always => true,
            LaunchPolicy::Ask if !ui.is_interactive() => {
                tracing::debug!("Non-interactive session; not launching");
                false
            }
            LaunchPolicy::Ask => {
                let prompt = Prompt::new(
                    "launch",
                    format!("Launch {} now?", self.ctx.app.display_name),
                    true,
                );
                match ui.confirm(&prompt) {
                    Ok(answer) => answer,
                    Err(e) => {
                        tracing::warn!("Launch prompt failed: {}", e);
                        false
                    }
                }
            }
        };
        if !wanted {
            return false;
        }

        let launch = CommandSpec::new(interpreter.to_string_lossy())
            .path_arg(&self.ctx.entry_point())
            .current_dir(&self.ctx.target.install_dir);
        match self.runner.spawn_detached(&launch) {
            Ok(()) => {
                tracing::info!("Launched '{}'", launch);
                ui.success(&format!("{} started", self.ctx.app.display_name));
                true
            }
            Err(e) => {
                tracing::warn!("Could not launch: {}", e);
                ui.warning(&format!(
                    "Could not start {}; run {} instead",
                    self.ctx.app.display_name, self.ctx.app.command_name
                ));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppSpec, InstallTarget};
    use crate::shell::MockRunner;
    use crate::ui::{MockUI, SpinnerOutcome};
    use tempfile::TempDir;

    fn ctx(home: &Path) -> InstallContext {
        let target = InstallTarget::for_home(home, None, &AppSpec::default());
        InstallContext::builder(target)
            .search_path(vec![])
            .env_fn(|_| Err(std::env::VarError::NotPresent))
            .build()
    }

    fn no_download(_: &str) -> anyhow::Result<Vec<u8>> {
        anyhow::bail!("network disabled in tests")
    }

    fn orchestrator<'a>(
        ctx: &'a InstallContext,
        runner: &'a MockRunner,
        launch: LaunchPolicy,
    ) -> Orchestrator<'a> {
        Orchestrator::new(
            ctx,
            runner,
            &no_download,
            RunOptions {
                launch,
                elevated: true,
            },
        )
    }

    fn python() -> &'static Path {
        Path::new("/usr/bin/python3")
    }

    #[test]
    fn missing_sudo_is_reported_on_the_spinner() {
        let home = TempDir::new().unwrap();
        let ctx = ctx(home.path());
        let runner = MockRunner::new().with_programs(["apt-get"]);
        let mut ui = MockUI::new();
        let options = RunOptions {
            launch: LaunchPolicy::Never,
            elevated: false,
        };

        let profile = Orchestrator::new(&ctx, &runner, &no_download, options)
            .resolve_profile(&mut ui)
            .unwrap();

        assert_eq!(profile.privilege(), Privilege::Unprivileged);
        let spinners = ui.spinners();
        assert_eq!(spinners.len(), 1);
        assert_eq!(
            spinners[0].finished,
            Some((
                SpinnerOutcome::Warning,
                "Package manager: apt-get (no sudo)".to_string()
            ))
        );
    }

    #[test]
    fn ask_prompts_on_interactive_terminal() {
        let home = TempDir::new().unwrap();
        let ctx = ctx(home.path());
        let runner = MockRunner::new();
        let mut ui = MockUI::new();
        ui.set_interactive(true);
        ui.set_confirm_response("launch", true);

        let launched = orchestrator(&ctx, &runner, LaunchPolicy::Ask).maybe_launch(&mut ui, python());

        assert!(launched);
        assert_eq!(ui.prompts_shown(), ["launch".to_string()]);
        let spawned = runner.spawned();
        assert_eq!(spawned.len(), 1);
        assert!(spawned[0].ends_with("limpeza_david/run.py"));
    }

    #[test]
    fn ask_declined_does_not_launch() {
        let home = TempDir::new().unwrap();
        let ctx = ctx(home.path());
        let runner = MockRunner::new();
        let mut ui = MockUI::new();
        ui.set_interactive(true);
        ui.set_confirm_response("launch", false);

        assert!(!orchestrator(&ctx, &runner, LaunchPolicy::Ask).maybe_launch(&mut ui, python()));
        assert!(runner.spawned().is_empty());
    }

    #[test]
    fn ask_without_terminal_does_not_prompt() {
        let home = TempDir::new().unwrap();
        let ctx = ctx(home.path());
        let runner = MockRunner::new();
        let mut ui = MockUI::new();

        assert!(!orchestrator(&ctx, &runner, LaunchPolicy::Ask).maybe_launch(&mut ui, python()));
        assert!(ui.prompts_shown().is_empty());
        assert!(runner.spawned().is_empty());
    }

    #[test]
    fn always_launches_without_prompt() {
        let home = TempDir::new().unwrap();
        let ctx = ctx(home.path());
        let runner = MockRunner::new();
        let mut ui = MockUI::new();

        assert!(orchestrator(&ctx, &runner, LaunchPolicy::Always).maybe_launch(&mut ui, python()));
        assert!(ui.prompts_shown().is_empty());
    }

    #[test]
    fn never_ignores_interactive_terminal() {
        let home = TempDir::new().unwrap();
        let ctx = ctx(home.path());
        let runner = MockRunner::new();
        let mut ui = MockUI::new();
        ui.set_interactive(true);

        assert!(!orchestrator(&ctx, &runner, LaunchPolicy::Never).maybe_launch(&mut ui, python()));
        assert!(ui.prompts_shown().is_empty());
    }

    #[test]
    fn spawn_failure_is_a_warning() {
        let home = TempDir::new().unwrap();
        let ctx = ctx(home.path());
        let runner = MockRunner::new();
        let mut ui = MockUI::new();

        let launched = orchestrator(&ctx, &runner, LaunchPolicy::Always)
            .maybe_launch(&mut ui, Path::new("python3"));

        assert!(!launched);
        assert!(ui.has_warning("Could not start Limpeza David; run limpeza-david instead"));
    }

    #[test]
    fn unsupported_system_fails_at_first_spinner() {
        let home = TempDir::new().unwrap();
        let ctx = ctx(home.path());
        let runner = MockRunner::new();
        let mut ui = MockUI::new();

        let err = orchestrator(&ctx, &runner, LaunchPolicy::Never)
            .run(&mut ui)
            .unwrap_err();

        assert!(matches!(err, InstallerError::UnsupportedSystem { .. }));
        assert!(ui.has_spinner_error("No supported package manager"));
        assert!(runner.calls().is_empty());
    }
}
