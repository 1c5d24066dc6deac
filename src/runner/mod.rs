//! Install orchestration.

pub mod install;
pub mod manifest;
pub mod report;

pub use install::{LaunchPolicy, Orchestrator, RunOptions};
pub use manifest::{install_manifest, ManifestStatus};
pub use report::InstallReport;
