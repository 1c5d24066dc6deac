//! What a completed run did.

use serde::Serialize;
use std::path::PathBuf;

use crate::launcher::PathUpdate;
use crate::requirements::{DependencyReport, EnsureOutcome, PackageManagerKind};
use crate::ui::{StatusKind, SummaryLine};
use crate::verify::VerificationReport;

use super::manifest::ManifestStatus;

/// Result of a run that got past the fatal phase.
#[derive(Debug, Clone, Serialize)]
pub struct InstallReport {
    pub package_manager: PackageManagerKind,
    pub dependencies: Vec<DependencyReport>,
    pub interpreter: PathBuf,
    pub install_dir: PathBuf,
    pub manifest: ManifestStatus,
    /// `None` when writing the launcher failed.
    pub launcher: Option<PathBuf>,
    pub path_update: Option<PathUpdate>,
    pub shortcuts: Vec<PathBuf>,
    pub verification: VerificationReport,
    pub launched: bool,
}

impl InstallReport {
    /// Rows for the end-of-run summary.
    pub fn summary_lines(&self) -> Vec<SummaryLine> {
        let mut lines: Vec<SummaryLine> = self
            .dependencies
            .iter()
            .map(|dep| {
                let (status, detail) = match &dep.outcome {
                    EnsureOutcome::AlreadyPresent => {
                        (StatusKind::Success, "already present".to_string())
                    }
                    EnsureOutcome::InstalledOk { strategy } => {
                        (StatusKind::Success, format!("installed via {}", strategy))
                    }
                    EnsureOutcome::InstalledWithWarning { warning } => {
                        (StatusKind::Warning, warning.clone())
                    }
                };
                SummaryLine::new(status, dep.kind.name()).with_detail(detail)
            })
            .collect();

        let manifest = match self.manifest {
            ManifestStatus::Absent => SummaryLine::new(StatusKind::Skipped, "requirements")
                .with_detail("no manifest"),
            ManifestStatus::Installed => SummaryLine::new(StatusKind::Success, "requirements"),
            ManifestStatus::InstalledBreakingSystemPackages => {
                SummaryLine::new(StatusKind::Warning, "requirements")
                    .with_detail("installed with --break-system-packages")
            }
            ManifestStatus::Failed => {
                SummaryLine::new(StatusKind::Warning, "requirements").with_detail("not installed")
            }
        };
        lines.push(manifest);

        lines.push(match &self.launcher {
            Some(path) => SummaryLine::new(StatusKind::Success, "launcher")
                .with_detail(path.display().to_string()),
            None => SummaryLine::new(StatusKind::Failed, "launcher"),
        });

        lines.push(SummaryLine::new(
            if self.shortcuts.is_empty() {
                StatusKind::Warning
            } else {
                StatusKind::Success
            },
            "shortcuts",
        )
        .with_detail(format!("{} written", self.shortcuts.len())));

        for check in &self.verification.checks {
            let line = SummaryLine::new(check.passed.into(), format!("verify {}", check.name));
            lines.push(match &check.detail {
                Some(detail) => line.with_detail(detail.clone()),
                None => line,
            });
        }

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirements::DependencyKind;
    use crate::verify::VerificationCheck;

    fn report() -> InstallReport {
        InstallReport {
            package_manager: PackageManagerKind::Apt,
            dependencies: vec![
                DependencyReport {
                    kind: DependencyKind::VersionControl,
                    outcome: EnsureOutcome::AlreadyPresent,
                },
                DependencyReport {
                    kind: DependencyKind::PackageInstaller,
                    outcome: EnsureOutcome::InstalledWithWarning {
                        warning: "pip is still unavailable".to_string(),
                    },
                },
            ],
            interpreter: PathBuf::from("/usr/bin/python3"),
            install_dir: PathBuf::from("/home/u/.local/share/limpeza_david"),
            manifest: ManifestStatus::Absent,
            launcher: Some(PathBuf::from("/home/u/.local/bin/limpeza-david")),
            path_update: Some(PathUpdate::AlreadyOnPath),
            shortcuts: vec![],
            verification: VerificationReport {
                checks: vec![VerificationCheck {
                    name: "launcher",
                    passed: true,
                    detail: None,
                }],
                error_count: 0,
            },
            launched: false,
        }
    }

    #[test]
    fn summary_marks_warnings() {
        let lines = report().summary_lines();
        let pip = lines.iter().find(|l| l.label == "pip").unwrap();
        assert_eq!(pip.status, StatusKind::Warning);
        let shortcuts = lines.iter().find(|l| l.label == "shortcuts").unwrap();
        assert_eq!(shortcuts.status, StatusKind::Warning);
        assert!(lines.iter().any(|l| l.label == "verify launcher"));
    }

    #[test]
    fn serializes_outcomes_with_status_tag() {
        let json = serde_json::to_value(report()).unwrap();
        assert_eq!(json["package_manager"], "apt");
        assert_eq!(json["dependencies"][0]["kind"], "version_control");
        assert_eq!(json["dependencies"][0]["status"], "already_present");
        assert_eq!(json["dependencies"][1]["status"], "installed_with_warning");
        assert_eq!(json["manifest"], "absent");
        assert_eq!(json["path_update"]["status"], "already_on_path");
        assert_eq!(json["verification"]["error_count"], 0);
    }
}
