//! System dependency detection and installation.
//!
//! This module resolves the host's package manager once, then makes sure
//! each runtime dependency of the application is present, installing it
//! through that manager (and, for the interpreter's package installer,
//! through fallbacks) when it is not.
//!
//! # Modules
//!
//! - [`package_manager`] - Package manager detection and command templates
//! - [`dependency`] - Static dependency declarations
//! - [`installer`] - Check-then-install with ordered fallbacks
//! - [`status`] - Per-dependency outcomes

pub mod dependency;
pub mod installer;
pub mod package_manager;
pub mod status;

pub use dependency::{Criticality, Dependency, DependencyKind, InstallStrategy, PresenceCheck};
pub use installer::{DependencyInstaller, Toolchain};
pub use package_manager::{PackageManagerKind, PackageManagerProfile, PackageNames, Privilege};
pub use status::{DependencyReport, EnsureOutcome};
