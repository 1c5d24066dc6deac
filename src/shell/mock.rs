//! Mock process runner for testing.
//!
//! `MockRunner` implements [`ProcessRunner`] without starting any process.
//! Programs are "installed" by name, commands are answered by rules matched
//! against the command line, and every call is recorded for assertions.
//!
//! # Example
//!
//! ```
//! use limpeza_installer::shell::{CommandSpec, MockRunner, ProcessRunner};
//!
//! let runner = MockRunner::new().with_programs(["apt-get"]);
//! runner.on("import tkinter", |r, _| r.has_mark("tk"));
//! runner.on("install -y python3-tk", |r, _| {
//!     r.mark("tk");
//!     true
//! });
//!
//! let probe = CommandSpec::new("python3").args(["-c", "import tkinter"]);
//! assert!(!runner.succeeds(&probe));
//! assert!(runner.succeeds(&CommandSpec::new("apt-get").args(["install", "-y", "python3-tk"])));
//! assert!(runner.succeeds(&probe));
//! assert!(runner.was_run("apt-get install"));
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{InstallerError, Result};

use super::command::{CommandResult, CommandSpec, ProcessRunner};

type Rule = Box<dyn Fn(&MockRunner, &CommandSpec) -> bool>;

/// Mock runner implementation for testing.
pub struct MockRunner {
    programs: RefCell<HashMap<String, PathBuf>>,
    rules: RefCell<Vec<(String, Rule)>>,
    marks: RefCell<HashSet<String>>,
    calls: RefCell<Vec<CommandSpec>>,
    spawned: RefCell<Vec<CommandSpec>>,
    default_success: bool,
}

impl MockRunner {
    /// Create a runner with no programs where unmatched commands succeed.
    pub fn new() -> Self {
        Self {
            programs: RefCell::new(HashMap::new()),
            rules: RefCell::new(Vec::new()),
            marks: RefCell::new(HashSet::new()),
            calls: RefCell::new(Vec::new()),
            spawned: RefCell::new(Vec::new()),
            default_success: true,
        }
    }

    /// Make unmatched commands fail instead of succeed.
    pub fn failing_by_default(mut self) -> Self {
        self.default_success = false;
        self
    }

    /// Add programs that resolve to `/usr/bin/<name>`.
    pub fn with_programs<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.add_program(name.as_ref());
        }
        self
    }

    /// Make a program resolvable (e.g. from inside a rule after an install).
    pub fn add_program(&self, name: &str) {
        self.programs
            .borrow_mut()
            .insert(name.to_string(), PathBuf::from("/usr/bin").join(name));
    }

    /// Answer every command whose command line contains `pattern`.
    ///
    /// Rules are tried in registration order; the first match decides.
    pub fn on<F>(&self, pattern: &str, rule: F)
    where
        F: Fn(&MockRunner, &CommandSpec) -> bool + 'static,
    {
        self.rules
            .borrow_mut()
            .push((pattern.to_string(), Box::new(rule)));
    }

    /// Record a named state change for rules to observe.
    pub fn mark(&self, flag: &str) {
        self.marks.borrow_mut().insert(flag.to_string());
    }

    /// Whether a named state change was recorded.
    pub fn has_mark(&self, flag: &str) -> bool {
        self.marks.borrow().contains(flag)
    }

    /// Command lines of every `run` call, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.to_string()).collect()
    }

    /// Command lines of every `spawn_detached` call.
    pub fn spawned(&self) -> Vec<String> {
        self.spawned.borrow().iter().map(|c| c.to_string()).collect()
    }

    /// Whether any recorded command line contains `pattern`.
    pub fn was_run(&self, pattern: &str) -> bool {
        self.calls().iter().any(|c| c.contains(pattern))
    }

    /// Index of the first recorded command line containing `pattern`.
    pub fn position(&self, pattern: &str) -> Option<usize> {
        self.calls().iter().position(|c| c.contains(pattern))
    }

    /// Forget recorded calls (rules, programs and marks are kept).
    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
        self.spawned.borrow_mut().clear();
    }
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessRunner for MockRunner {
    fn find_program(&self, name: &str) -> Option<PathBuf> {
        self.programs.borrow().get(name).cloned()
    }

    fn run(&self, spec: &CommandSpec) -> Result<CommandResult> {
        self.calls.borrow_mut().push(spec.clone());
        let line = spec.to_string();

        let rules = self.rules.borrow();
        let success = rules
            .iter()
            .find(|(pattern, _)| line.contains(pattern.as_str()))
            .map(|(_, rule)| rule(self, spec))
            .unwrap_or(self.default_success);

        if success {
            Ok(CommandResult::success(
                String::new(),
                String::new(),
                Duration::ZERO,
            ))
        } else {
            Ok(CommandResult::failure(
                Some(1),
                String::new(),
                format!("mock failure: {}", line),
                Duration::ZERO,
            ))
        }
    }

    fn spawn_detached(&self, spec: &CommandSpec) -> Result<()> {
        if !self.has_program(spec.program()) && !spec.program().starts_with('/') {
            return Err(InstallerError::CommandFailed {
                command: spec.to_string(),
                code: None,
            });
        }
        self.spawned.borrow_mut().push(spec.clone());
        Ok(())
    }
}
