//! Structured process invocation.
//!
//! Every external tool is invoked through a [`CommandSpec`]: a program name
//! plus an argument list. Arguments are handed to the OS as-is and never
//! pass through a shell, so paths with spaces or quotes need no escaping.

use crate::error::{InstallerError, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use super::path::{parse_system_path, resolve_tool_path};

/// A program invocation with its argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

impl CommandSpec {
    /// Start a spec for `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append a path argument.
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy().into_owned())
    }

    /// Run the command from `dir`.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Wrap this invocation so it runs through `wrapper` (e.g. `sudo`).
    pub fn wrapped_by(self, wrapper: impl Into<String>) -> Self {
        let mut args = Vec::with_capacity(self.args.len() + 1);
        args.push(self.program);
        args.extend(self.args);
        Self {
            program: wrapper.into(),
            args,
            cwd: self.cwd,
        }
    }

    /// The program to execute.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The argument list.
    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }
        cmd
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    /// Last non-empty stderr line, for short failure messages.
    pub fn stderr_tail(&self) -> Option<&str> {
        self.stderr.lines().rev().map(str::trim).find(|l| !l.is_empty())
    }
}

/// Everything the installer does to the outside world goes through here.
///
/// This trait allows replacing real processes with [`MockRunner`](super::MockRunner)
/// in tests.
pub trait ProcessRunner {
    /// Resolve a program name to an executable on the search PATH.
    fn find_program(&self, name: &str) -> Option<PathBuf>;

    /// Run a command to completion, capturing its output.
    ///
    /// `Err` means the process could not be started at all; a non-zero
    /// exit is reported through [`CommandResult::success`].
    fn run(&self, spec: &CommandSpec) -> Result<CommandResult>;

    /// Start a command without waiting for it.
    fn spawn_detached(&self, spec: &CommandSpec) -> Result<()>;

    /// Whether `name` resolves on the search PATH.
    fn has_program(&self, name: &str) -> bool {
        self.find_program(name).is_some()
    }

    /// Run a command and collapse the outcome to a bool.
    fn succeeds(&self, spec: &CommandSpec) -> bool {
        match self.run(spec) {
            Ok(result) => result.success,
            Err(e) => {
                tracing::debug!("{} could not run: {}", spec, e);
                false
            }
        }
    }
}

/// Runs real child processes.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    search_path: Vec<PathBuf>,
}

impl SystemRunner {
    /// Create a runner that searches the current process PATH.
    pub fn new() -> Self {
        Self::with_search_path(parse_system_path())
    }

    /// Create a runner with an explicit search PATH.
    pub fn with_search_path(search_path: Vec<PathBuf>) -> Self {
        Self { search_path }
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessRunner for SystemRunner {
    fn find_program(&self, name: &str) -> Option<PathBuf> {
        resolve_tool_path(name, &self.search_path)
    }

    fn run(&self, spec: &CommandSpec) -> Result<CommandResult> {
        let start = Instant::now();
        tracing::debug!("Running: {}", spec);

        let output = spec
            .to_command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                tracing::debug!("Failed to start {}: {}", spec.program(), e);
                InstallerError::CommandFailed {
                    command: spec.to_string(),
                    code: None,
                }
            })?;

        let duration = start.elapsed();
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if output.status.success() {
            Ok(CommandResult::success(stdout, stderr, duration))
        } else {
            tracing::debug!(
                "{} exited with {:?} after {:?}",
                spec,
                output.status.code(),
                duration
            );
            Ok(CommandResult::failure(
                output.status.code(),
                stdout,
                stderr,
                duration,
            ))
        }
    }

    fn spawn_detached(&self, spec: &CommandSpec) -> Result<()> {
        let mut cmd = spec.to_command();
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // New process group so the child outlives our terminal session.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        cmd.spawn().map_err(|_| InstallerError::CommandFailed {
            command: spec.to_string(),
            code: None,
        })?;
        Ok(())
    }
}
