//! Static dependency declarations.
//!
//! Each [`Dependency`] says how to tell whether it is present and which
//! strategies to try, in order, when it is not. Declarations are fixed at
//! compile time; whether a dependency is present is decided fresh each run.

use serde::Serialize;

/// The external capabilities the application needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    /// Version-control client used to fetch the source.
    VersionControl,
    /// Language interpreter that runs the application.
    Interpreter,
    /// The interpreter's package installer.
    PackageInstaller,
    /// GUI toolkit binding for the interpreter.
    GuiToolkit,
}

impl DependencyKind {
    /// Resolution order. The interpreter must precede the two probes that
    /// run through it, and version control must precede the source fetch.
    pub const ORDER: [DependencyKind; 4] = [
        DependencyKind::VersionControl,
        DependencyKind::Interpreter,
        DependencyKind::PackageInstaller,
        DependencyKind::GuiToolkit,
    ];

    /// Name used in messages.
    pub fn name(&self) -> &'static str {
        match self {
            DependencyKind::VersionControl => "git",
            DependencyKind::Interpreter => "python3",
            DependencyKind::PackageInstaller => "pip",
            DependencyKind::GuiToolkit => "tkinter",
        }
    }
}

/// What happens when every strategy fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criticality {
    /// The application cannot run without it; abort the install.
    Required,
    /// Continue with a warning.
    BestEffort,
}

/// How to tell whether a dependency is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceCheck {
    /// A binary of this name resolves on PATH.
    CommandOnPath(&'static str),
    /// The resolved interpreter exits 0 with these arguments.
    InterpreterSucceeds(&'static [&'static str]),
}

/// One way of obtaining a missing dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallStrategy {
    /// Install the ecosystem packages from the profile.
    SystemPackages,
    /// Run an interpreter module, e.g. `-m ensurepip --upgrade`.
    InterpreterModule(&'static [&'static str]),
    /// Download the configured bootstrap script and run it.
    BootstrapScript,
}

impl InstallStrategy {
    /// Short label for logs.
    pub fn label(&self) -> String {
        match self {
            InstallStrategy::SystemPackages => "system packages".to_string(),
            InstallStrategy::InterpreterModule(args) => args.join(" "),
            InstallStrategy::BootstrapScript => "bootstrap script".to_string(),
        }
    }
}

/// A dependency declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub kind: DependencyKind,
    pub check: PresenceCheck,
    /// Tried in order until the presence check passes.
    pub strategies: Vec<InstallStrategy>,
    pub criticality: Criticality,
}

impl Dependency {
    /// The built-in declaration for a dependency kind.
    pub fn builtin(kind: DependencyKind) -> Self {
        match kind {
            DependencyKind::VersionControl => Self {
                kind,
                check: PresenceCheck::CommandOnPath("git"),
                strategies: vec![InstallStrategy::SystemPackages],
                criticality: Criticality::Required,
            },
            DependencyKind::Interpreter => Self {
                kind,
                check: PresenceCheck::CommandOnPath("python3"),
                strategies: vec![InstallStrategy::SystemPackages],
                criticality: Criticality::Required,
            },
            DependencyKind::PackageInstaller => Self {
                kind,
                check: PresenceCheck::InterpreterSucceeds(&["-m", "pip", "--version"]),
                strategies: vec![
                    InstallStrategy::SystemPackages,
                    InstallStrategy::InterpreterModule(&["-m", "ensurepip", "--upgrade"]),
                    InstallStrategy::BootstrapScript,
                ],
                criticality: Criticality::BestEffort,
            },
            DependencyKind::GuiToolkit => Self {
                kind,
                check: PresenceCheck::InterpreterSucceeds(&["-c", "import tkinter"]),
                strategies: vec![InstallStrategy::SystemPackages],
                criticality: Criticality::Required,
            },
        }
    }

    /// All built-in declarations in resolution order.
    pub fn all() -> Vec<Self> {
        DependencyKind::ORDER.into_iter().map(Self::builtin).collect()
    }
}
