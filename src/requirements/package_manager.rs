//! Package manager detection and command templates.
//!
//! A [`PackageManagerProfile`] is resolved once per run by probing for the
//! supported package managers in a fixed priority order. The first one found
//! wins; there is no scoring and no merging of several managers.

use serde::Serialize;

use crate::error::{InstallerError, Result};
use crate::shell::{CommandSpec, ProcessRunner};

use super::dependency::DependencyKind;

/// Supported package ecosystems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageManagerKind {
    Apt,
    Dnf,
    Yum,
    Pacman,
    Zypper,
}

impl PackageManagerKind {
    /// Probe order. `dnf` precedes `yum` because Fedora ships a `yum` shim.
    pub const PRIORITY: [PackageManagerKind; 5] = [
        PackageManagerKind::Apt,
        PackageManagerKind::Dnf,
        PackageManagerKind::Yum,
        PackageManagerKind::Pacman,
        PackageManagerKind::Zypper,
    ];

    /// Executable probed for and invoked.
    pub fn executable(&self) -> &'static str {
        match self {
            PackageManagerKind::Apt => "apt-get",
            PackageManagerKind::Dnf => "dnf",
            PackageManagerKind::Yum => "yum",
            PackageManagerKind::Pacman => "pacman",
            PackageManagerKind::Zypper => "zypper",
        }
    }

    fn update_args(&self) -> &'static [&'static str] {
        match self {
            PackageManagerKind::Apt => &["update"],
            PackageManagerKind::Dnf | PackageManagerKind::Yum => &["makecache"],
            PackageManagerKind::Pacman => &["-Sy"],
            PackageManagerKind::Zypper => &["--non-interactive", "refresh"],
        }
    }

    fn install_args(&self) -> &'static [&'static str] {
        match self {
            PackageManagerKind::Apt => &["install", "-y"],
            PackageManagerKind::Dnf | PackageManagerKind::Yum => &["install", "-y"],
            PackageManagerKind::Pacman => &["-S", "--noconfirm", "--needed"],
            PackageManagerKind::Zypper => &["--non-interactive", "install"],
        }
    }

    fn names(&self) -> PackageNames {
        match self {
            PackageManagerKind::Apt => PackageNames {
                version_control: "git",
                interpreter: "python3",
                package_installer: "python3-pip",
                installer_venv: "python3-venv",
                gui_toolkit: "python3-tk",
            },
            PackageManagerKind::Dnf | PackageManagerKind::Yum => PackageNames {
                version_control: "git",
                interpreter: "python3",
                package_installer: "python3-pip",
                installer_venv: "python3-virtualenv",
                gui_toolkit: "python3-tkinter",
            },
            PackageManagerKind::Pacman => PackageNames {
                version_control: "git",
                interpreter: "python",
                package_installer: "python-pip",
                installer_venv: "python-virtualenv",
                gui_toolkit: "tk",
            },
            PackageManagerKind::Zypper => PackageNames {
                version_control: "git",
                interpreter: "python3",
                package_installer: "python3-pip",
                installer_venv: "python3-virtualenv",
                gui_toolkit: "python3-tk",
            },
        }
    }
}

/// How package manager commands get root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    /// Already running as root.
    Root,
    /// Prefix commands with `sudo`.
    Sudo,
    /// No way to elevate; commands run as-is and will likely fail.
    Unprivileged,
}

/// Ecosystem-specific package names for each dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageNames {
    pub version_control: &'static str,
    pub interpreter: &'static str,
    pub package_installer: &'static str,
    pub installer_venv: &'static str,
    pub gui_toolkit: &'static str,
}

/// The resolved package manager for this host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageManagerProfile {
    kind: PackageManagerKind,
    privilege: Privilege,
    names: PackageNames,
}

impl PackageManagerProfile {
    /// Detect a supported package manager; `elevated` says whether
    /// this process already runs as root.
    pub fn resolve_with_privilege(runner: &dyn ProcessRunner, elevated: bool) -> Result<Self> {
        let Some(kind) = PackageManagerKind::PRIORITY
            .into_iter()
            .find(|kind| runner.has_program(kind.executable()))
        else {
            let tried: Vec<&str> = PackageManagerKind::PRIORITY
                .iter()
                .map(|k| k.executable())
                .collect();
            return Err(InstallerError::UnsupportedSystem {
                tried: tried.join(", "),
            });
        };

        let privilege = if elevated {
            Privilege::Root
        } else if runner.has_program("sudo") {
            Privilege::Sudo
        } else {
            tracing::warn!(
                "Not running as root and sudo is unavailable; {} commands may fail",
                kind.executable()
            );
            Privilege::Unprivileged
        };

        tracing::info!(
            "Using package manager {} ({:?})",
            kind.executable(),
            privilege
        );
        Ok(Self::for_kind(kind, privilege))
    }

    /// Build the profile for a known manager.
    pub fn for_kind(kind: PackageManagerKind, privilege: Privilege) -> Self {
        Self {
            kind,
            privilege,
            names: kind.names(),
        }
    }

    /// Which manager this profile drives.
    pub fn kind(&self) -> PackageManagerKind {
        self.kind
    }

    /// How commands are elevated.
    pub fn privilege(&self) -> Privilege {
        self.privilege
    }

    /// Canonical package names.
    pub fn names(&self) -> &PackageNames {
        &self.names
    }

    /// Packages that provide a dependency in this ecosystem.
    pub fn packages_for(&self, dependency: DependencyKind) -> Vec<&'static str> {
        match dependency {
            DependencyKind::VersionControl => vec![self.names.version_control],
            DependencyKind::Interpreter => vec![self.names.interpreter],
            DependencyKind::PackageInstaller => {
                vec![self.names.package_installer, self.names.installer_venv]
            }
            DependencyKind::GuiToolkit => vec![self.names.gui_toolkit],
        }
    }

    /// Refresh the package index.
    pub fn update_command(&self) -> CommandSpec {
        self.elevate(
            CommandSpec::new(self.kind.executable())
                .args(self.kind.update_args().iter().copied()),
        )
    }

    /// Install packages without asking for confirmation.
    pub fn install_command(&self, packages: &[&str]) -> CommandSpec {
        self.elevate(
            CommandSpec::new(self.kind.executable())
                .args(self.kind.install_args().iter().copied())
                .args(packages.iter().copied()),
        )
    }

    fn elevate(&self, spec: CommandSpec) -> CommandSpec {
        match self.privilege {
            Privilege::Sudo => spec.wrapped_by("sudo"),
            Privilege::Root | Privilege::Unprivileged => spec,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::MockRunner;

    #[test]
    fn no_manager_is_unsupported() {
        let runner = MockRunner::new().with_programs(["sudo", "git"]);
        let result = PackageManagerProfile::resolve_with_privilege(&runner, false);
        match result {
            Err(InstallerError::UnsupportedSystem { tried }) => {
                assert!(tried.contains("apt-get"));
                assert!(tried.contains("zypper"));
            }
            other => panic!("Expected UnsupportedSystem, got {:?}", other),
        }
    }

    #[test]
    fn each_manager_is_detected_alone() {
        for kind in PackageManagerKind::PRIORITY {
            let runner = MockRunner::new().with_programs([kind.executable()]);
            let profile = PackageManagerProfile::resolve_with_privilege(&runner, true).unwrap();
            assert_eq!(profile.kind(), kind);
        }
    }

    #[test]
    fn priority_order_breaks_ties() {
        // Every suffix of the priority list resolves to its first element.
        let all = PackageManagerKind::PRIORITY;
        for start in 0..all.len() {
            let present: Vec<&str> = all[start..].iter().map(|k| k.executable()).collect();
            let runner = MockRunner::new().with_programs(present);
            let profile = PackageManagerProfile::resolve_with_privilege(&runner, true).unwrap();
            assert_eq!(profile.kind(), all[start]);
        }
    }

    #[test]
    fn dnf_wins_over_yum_shim() {
        let runner = MockRunner::new().with_programs(["yum", "dnf"]);
        let profile = PackageManagerProfile::resolve_with_privilege(&runner, true).unwrap();
        assert_eq!(profile.kind(), PackageManagerKind::Dnf);
    }

    #[test]
    fn sudo_is_used_when_not_root() {
        let runner = MockRunner::new().with_programs(["apt-get", "sudo"]);
        let profile = PackageManagerProfile::resolve_with_privilege(&runner, false).unwrap();
        assert_eq!(profile.privilege(), Privilege::Sudo);
        assert_eq!(
            profile.install_command(&["git"]).to_string(),
            "sudo apt-get install -y git"
        );
        assert_eq!(profile.update_command().to_string(), "sudo apt-get update");
    }

    #[test]
    fn root_runs_commands_directly() {
        let profile = PackageManagerProfile::for_kind(PackageManagerKind::Pacman, Privilege::Root);
        assert_eq!(
            profile.install_command(&["tk"]).to_string(),
            "pacman -S --noconfirm --needed tk"
        );
        assert_eq!(profile.update_command().to_string(), "pacman -Sy");
    }

    #[test]
    fn unprivileged_without_sudo() {
        let runner = MockRunner::new().with_programs(["zypper"]);
        let profile = PackageManagerProfile::resolve_with_privilege(&runner, false).unwrap();
        assert_eq!(profile.privilege(), Privilege::Unprivileged);
        assert_eq!(
            profile.install_command(&["git"]).to_string(),
            "zypper --non-interactive install git"
        );
    }

    #[test]
    fn package_installer_includes_venv_support() {
        let profile = PackageManagerProfile::for_kind(PackageManagerKind::Apt, Privilege::Root);
        assert_eq!(
            profile.packages_for(DependencyKind::PackageInstaller),
            vec!["python3-pip", "python3-venv"]
        );
    }

    #[test]
    fn gui_toolkit_names_differ_per_ecosystem() {
        let name = |kind| {
            PackageManagerProfile::for_kind(kind, Privilege::Root)
                .packages_for(DependencyKind::GuiToolkit)[0]
        };
        assert_eq!(name(PackageManagerKind::Apt), "python3-tk");
        assert_eq!(name(PackageManagerKind::Dnf), "python3-tkinter");
        assert_eq!(name(PackageManagerKind::Yum), "python3-tkinter");
        assert_eq!(name(PackageManagerKind::Pacman), "tk");
        assert_eq!(name(PackageManagerKind::Zypper), "python3-tk");
    }

    #[test]
    fn interpreter_name_on_arch() {
        let profile = PackageManagerProfile::for_kind(PackageManagerKind::Pacman, Privilege::Root);
        assert_eq!(profile.names().interpreter, "python");
    }
}
