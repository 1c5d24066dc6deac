//! Check-then-install for dependencies.
//!
//! [`DependencyInstaller::ensure`] is idempotent: a dependency that is
//! already present costs one check and changes nothing. A missing one goes
//! through its strategies in order, with the presence check repeated after
//! every attempt, stopping at the first success.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::InstallContext;
use crate::error::{InstallerError, Result};
use crate::fetch::Downloader;
use crate::shell::{CommandSpec, ProcessRunner};

use super::dependency::{Criticality, Dependency, DependencyKind, InstallStrategy, PresenceCheck};
use super::package_manager::PackageManagerProfile;
use super::status::EnsureOutcome;

/// The resolved tools later steps run through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub profile: PackageManagerProfile,
    /// Absolute path of the interpreter.
    pub interpreter: PathBuf,
}

/// Resolves dependencies one at a time.
pub struct DependencyInstaller<'a> {
    ctx: &'a InstallContext,
    profile: &'a PackageManagerProfile,
    runner: &'a dyn ProcessRunner,
    downloader: &'a dyn Downloader,
    interpreter: Option<PathBuf>,
    index_refreshed: bool,
}

impl<'a> DependencyInstaller<'a> {
    /// Create an installer for one run.
    pub fn new(
        ctx: &'a InstallContext,
        profile: &'a PackageManagerProfile,
        runner: &'a dyn ProcessRunner,
        downloader: &'a dyn Downloader,
    ) -> Self {
        Self {
            ctx,
            profile,
            runner,
            downloader,
            interpreter: None,
            index_refreshed: false,
        }
    }

    /// The interpreter found so far, if any.
    pub fn interpreter(&self) -> Option<&Path> {
        self.interpreter.as_deref()
    }

    /// The toolchain, once the interpreter has been resolved.
    pub fn toolchain(&self) -> Option<Toolchain> {
        self.interpreter.as_ref().map(|interpreter| Toolchain {
            profile: self.profile.clone(),
            interpreter: interpreter.clone(),
        })
    }

    /// Make sure `dependency` is present.
    ///
    /// Returns `Err(RequirementMissing)` when a required dependency is still
    /// absent after every strategy.
    pub fn ensure(&mut self, dependency: &Dependency) -> Result<EnsureOutcome> {
        let name = dependency.kind.name();

        if self.is_present(dependency) {
            tracing::info!("{} already present", name);
            return Ok(EnsureOutcome::AlreadyPresent);
        }

        tracing::info!("{} missing, installing", name);
        for strategy in &dependency.strategies {
            let label = strategy.label();
            tracing::debug!("Trying {} for {}", label, name);

            if !self.apply(strategy, dependency) {
                tracing::warn!("{} attempt for {} failed", label, name);
            }

            if self.is_present(dependency) {
                tracing::info!("{} installed via {}", name, label);
                return Ok(EnsureOutcome::InstalledOk { strategy: label });
            }
        }

        let packages = self.profile.packages_for(dependency.kind).join(" ");
        match dependency.criticality {
            Criticality::Required => Err(InstallerError::RequirementMissing {
                requirement: name.to_string(),
                message: format!(
                    "still unavailable after installing '{}' with {}; install it manually and re-run",
                    packages,
                    self.profile.kind().executable()
                ),
            }),
            Criticality::BestEffort => {
                let warning = format!(
                    "{} is still unavailable (tried {}); continuing without it",
                    name,
                    dependency
                        .strategies
                        .iter()
                        .map(InstallStrategy::label)
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                tracing::warn!("{}", warning);
                Ok(EnsureOutcome::InstalledWithWarning { warning })
            }
        }
    }

    fn is_present(&mut self, dependency: &Dependency) -> bool {
        match &dependency.check {
            PresenceCheck::CommandOnPath(program) => match self.runner.find_program(program) {
                Some(path) => {
                    if dependency.kind == DependencyKind::Interpreter {
                        self.interpreter = Some(path);
                    }
                    true
                }
                None => false,
            },
            PresenceCheck::InterpreterSucceeds(args) => match &self.interpreter {
                Some(interpreter) => self.runner.succeeds(
                    &CommandSpec::new(interpreter.to_string_lossy())
                        .args(args.iter().copied()),
                ),
                None => false,
            },
        }
    }

    fn apply(&mut self, strategy: &InstallStrategy, dependency: &Dependency) -> bool {
        match strategy {
            InstallStrategy::SystemPackages => {
                self.refresh_index();
                let packages = self.profile.packages_for(dependency.kind);
                self.runner
                    .succeeds(&self.profile.install_command(&packages))
            }
            InstallStrategy::InterpreterModule(args) => match &self.interpreter {
                Some(interpreter) => self.runner.succeeds(
                    &CommandSpec::new(interpreter.to_string_lossy())
                        .args(args.iter().copied()),
                ),
                None => false,
            },
            InstallStrategy::BootstrapScript => self.run_bootstrap_script(),
        }
    }

    /// Refresh the package index once per run. Failure is not fatal: the
    /// cached index is often good enough to install from.
    fn refresh_index(&mut self) {
        if self.index_refreshed {
            return;
        }
        self.index_refreshed = true;
        let update = self.profile.update_command();
        if !self.runner.succeeds(&update) {
            tracing::warn!("'{}' failed; installing from the cached index", update);
        }
    }

    fn run_bootstrap_script(&self) -> bool {
        let bootstrap = &self.ctx.bootstrap;
        if !bootstrap.enabled {
            tracing::info!("Bootstrap script disabled; skipping");
            return false;
        }
        let Some(interpreter) = &self.interpreter else {
            return false;
        };

        tracing::warn!("Downloading installer bootstrap script from {}", bootstrap.url);
        let body = match self.downloader.download(&bootstrap.url) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Bootstrap download failed: {:#}", e);
                return false;
            }
        };

        // Kept alive until the interpreter has finished with it.
        let script = match write_script(&body) {
            Ok(script) => script,
            Err(e) => {
                tracing::warn!("Could not stage bootstrap script: {}", e);
                return false;
            }
        };

        self.runner.succeeds(
            &CommandSpec::new(interpreter.to_string_lossy())
                .path_arg(script.path())
                .arg("--user"),
        )
    }
}

fn write_script(body: &[u8]) -> std::io::Result<tempfile::NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("get-pip-")
        .suffix(".py")
        .tempfile()?;
    file.write_all(body)?;
    file.flush()?;
    Ok(file)
}
