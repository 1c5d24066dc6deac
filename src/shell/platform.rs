//! Platform-specific shell and privilege detection.

use std::path::{Path, PathBuf};

/// Shells whose startup file we know how to extend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellType {
    Bash,
    Zsh,
    Fish,
    Unknown,
}

impl ShellType {
    /// Parse shell type from executable name.
    pub fn from_executable(exe: &str) -> Self {
        let name = Path::new(exe)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        match name.as_str() {
            "bash" => ShellType::Bash,
            "zsh" => ShellType::Zsh,
            "fish" => ShellType::Fish,
            _ => ShellType::Unknown,
        }
    }

    /// Detect the invoking shell with a custom env var lookup function.
    ///
    /// Runtime marker variables win over `SHELL`, since `SHELL` names the
    /// login shell rather than the one the installer was started from.
    pub fn detect_with_env<F>(env_fn: &F) -> Self
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        if env_fn("ZSH_VERSION").is_ok() {
            return ShellType::Zsh;
        }
        if env_fn("BASH_VERSION").is_ok() {
            return ShellType::Bash;
        }
        if env_fn("FISH_VERSION").is_ok() {
            return ShellType::Fish;
        }
        env_fn("SHELL")
            .map(|shell| Self::from_executable(&shell))
            .unwrap_or(ShellType::Unknown)
    }

    /// The startup file that this shell reads for interactive sessions.
    pub fn startup_file(&self, home: &Path) -> Option<PathBuf> {
        match self {
            ShellType::Bash => Some(home.join(".bashrc")),
            ShellType::Zsh => Some(home.join(".zshrc")),
            ShellType::Fish => Some(home.join(".config/fish/config.fish")),
            ShellType::Unknown => None,
        }
    }

    /// The line that puts `dir` on PATH, written relative to `$HOME` when possible.
    pub fn path_export_line(&self, dir: &Path, home: &Path) -> Option<String> {
        let dir = match dir.strip_prefix(home) {
            Ok(rel) if rel.as_os_str().is_empty() => "$HOME".to_string(),
            Ok(rel) => format!("$HOME/{}", rel.display()),
            Err(_) => dir.display().to_string(),
        };
        match self {
            ShellType::Bash | ShellType::Zsh => Some(format!("export PATH=\"{}:$PATH\"", dir)),
            ShellType::Fish => Some(format!("fish_add_path {}", dir)),
            ShellType::Unknown => None,
        }
    }

    /// Short name for messages.
    pub fn name(&self) -> &'static str {
        match self {
            ShellType::Bash => "bash",
            ShellType::Zsh => "zsh",
            ShellType::Fish => "fish",
            ShellType::Unknown => "unknown",
        }
    }
}

/// Check if running in a CI environment.
///
/// Used to auto-detect CI and force non-interactive mode in `main()`.
/// Checks common CI environment variables: `CI`, `GITHUB_ACTIONS`,
/// `GITLAB_CI`, `CIRCLECI`, `TRAVIS`, `JENKINS_URL`.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("CIRCLECI").is_ok()
        || std::env::var("TRAVIS").is_ok()
        || std::env::var("JENKINS_URL").is_ok()
}

/// Check if running as root.
pub fn is_elevated() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() is a simple syscall that returns the effective user ID
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(not(unix))]
    {
        false
    }
}
