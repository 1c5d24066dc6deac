//! Dependency resolution outcomes.

use serde::Serialize;

use super::dependency::DependencyKind;

/// How a single dependency was resolved during this run.
///
/// The fatal case is not a variant: it is returned as
/// [`InstallerError::RequirementMissing`](crate::error::InstallerError::RequirementMissing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EnsureOutcome {
    /// Present before anything ran. The common path on re-runs.
    AlreadyPresent,

    /// Was missing and is present now.
    InstalledOk {
        /// Label of the strategy that made it present.
        strategy: String,
    },

    /// Still missing, but the dependency is best-effort.
    InstalledWithWarning {
        /// What the operator should know.
        warning: String,
    },
}

impl EnsureOutcome {
    /// Whether the dependency is usable now.
    pub fn is_present(&self) -> bool {
        matches!(
            self,
            EnsureOutcome::AlreadyPresent | EnsureOutcome::InstalledOk { .. }
        )
    }
}

/// The outcome for one dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyReport {
    pub kind: DependencyKind,
    #[serde(flatten)]
    pub outcome: EnsureOutcome,
}
