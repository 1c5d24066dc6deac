//! Post-install verification.
//!
//! Every check runs regardless of earlier failures. The report is
//! informational: a failed check is logged and counted but never changes
//! the exit code.

use serde::Serialize;
use std::path::Path;

use crate::config::InstallContext;
use crate::shell::{CommandSpec, ProcessRunner};

/// One post-condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationCheck {
    pub name: &'static str,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Outcome of all post-conditions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    pub checks: Vec<VerificationCheck>,
    pub error_count: usize,
}

impl VerificationReport {
    /// Whether every check passed.
    pub fn is_clean(&self) -> bool {
        self.error_count == 0
    }

    /// Names of the failed checks.
    pub fn failures(&self) -> Vec<&'static str> {
        self.checks
            .iter()
            .filter(|c| !c.passed)
            .map(|c| c.name)
            .collect()
    }

    fn push(&mut self, name: &'static str, passed: bool, detail: Option<String>) {
        if passed {
            tracing::debug!("Verified {}", name);
        } else {
            self.error_count += 1;
            tracing::warn!(
                "Verification failed: {}{}",
                name,
                detail.as_deref().map(|d| format!(" ({})", d)).unwrap_or_default()
            );
        }
        self.checks.push(VerificationCheck {
            name,
            passed,
            detail,
        });
    }
}

/// Re-check the artifacts of the install and the GUI toolkit.
pub fn verify(
    ctx: &InstallContext,
    interpreter: &Path,
    runner: &dyn ProcessRunner,
) -> VerificationReport {
    let mut report = VerificationReport {
        checks: Vec::new(),
        error_count: 0,
    };
    let target = &ctx.target;

    let path_check = |path: &Path| {
        let passed = path.exists();
        (passed, (!passed).then(|| format!("{} not found", path.display())))
    };

    let (passed, detail) = path_check(&target.install_dir);
    report.push("install directory", passed, detail);

    let (passed, detail) = path_check(&ctx.entry_point());
    report.push("entry point", passed, detail);

    let (passed, detail) = path_check(&target.launcher_path);
    report.push("launcher", passed, detail);

    let (passed, detail) = path_check(&target.desktop_shortcut);
    report.push("desktop shortcut", passed, detail);

    let probe = CommandSpec::new(interpreter.to_string_lossy()).args(["-c", "import tkinter"]);
    let passed = runner.succeeds(&probe);
    report.push(
        "gui toolkit",
        passed,
        (!passed).then(|| format!("'{}' failed", probe)),
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppSpec, InstallTarget};
    use crate::shell::MockRunner;
    use tempfile::TempDir;

    fn ctx(home: &Path) -> InstallContext {
        let target = InstallTarget::for_home(home, None, &AppSpec::default());
        InstallContext::builder(target).search_path(vec![]).build()
    }

    #[test]
    fn empty_home_fails_every_file_check() {
        let home = TempDir::new().unwrap();
        let ctx = ctx(home.path());
        let runner = MockRunner::new();

        let report = verify(&ctx, Path::new("/usr/bin/python3"), &runner);

        assert_eq!(report.checks.len(), 5);
        assert_eq!(report.error_count, 4);
        assert_eq!(
            report.failures(),
            vec!["install directory", "entry point", "launcher", "desktop shortcut"]
        );
    }

    #[test]
    fn complete_install_is_clean() {
        let home = TempDir::new().unwrap();
        let ctx = ctx(home.path());
        let t = &ctx.target;
        std::fs::create_dir_all(&t.install_dir).unwrap();
        std::fs::write(ctx.entry_point(), "").unwrap();
        std::fs::create_dir_all(&t.bin_dir).unwrap();
        std::fs::write(&t.launcher_path, "").unwrap();
        std::fs::create_dir_all(t.desktop_shortcut.parent().unwrap()).unwrap();
        std::fs::write(&t.desktop_shortcut, "").unwrap();
        let runner = MockRunner::new();

        let report = verify(&ctx, Path::new("/usr/bin/python3"), &runner);

        assert!(report.is_clean());
        assert!(runner.was_run("import tkinter"));
    }

    #[test]
    fn toolkit_failure_is_counted_not_raised() {
        let home = TempDir::new().unwrap();
        let ctx = ctx(home.path());
        let runner = MockRunner::new().failing_by_default();

        let report = verify(&ctx, Path::new("/usr/bin/python3"), &runner);

        assert_eq!(report.error_count, 5);
        assert!(report.failures().contains(&"gui toolkit"));
    }

    #[test]
    fn report_serializes_to_json() {
        let report = VerificationReport {
            checks: vec![VerificationCheck {
                name: "launcher",
                passed: true,
                detail: None,
            }],
            error_count: 0,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["error_count"], 0);
        assert_eq!(json["checks"][0]["name"], "launcher");
        assert!(json["checks"][0].get("detail").is_none());
    }
}
