//! Installation context.
//!
//! The installer reads no configuration file. Everything a run needs is
//! resolved once at startup (from defaults, CLI flags and the user's home
//! directory) into an [`InstallContext`] that is passed by reference to
//! every component and never mutated afterwards.
//!
//! # Example
//!
//! ```
//! use limpeza_installer::config::{AppSpec, InstallContext, InstallTarget};
//! use std::path::Path;
//!
//! let target = InstallTarget::for_home(Path::new("/home/ana"), None, &AppSpec::default());
//! assert_eq!(target.install_dir, Path::new("/home/ana/.local/share/limpeza_david"));
//! assert_eq!(target.launcher_path, Path::new("/home/ana/.local/bin/limpeza-david"));
//!
//! let ctx = InstallContext::builder(target).build();
//! assert!(ctx.bootstrap.enabled);
//! ```

pub mod target;

pub use target::InstallTarget;

use std::path::PathBuf;

use crate::shell::parse_system_path;

/// Default upstream repository of the application.
pub const DEFAULT_REPO_URL: &str = "https://github.com/davidfernandes/limpeza_david.git";

/// Default location of the pip bootstrap script.
pub const DEFAULT_BOOTSTRAP_URL: &str = "https://bootstrap.pypa.io/get-pip.py";

/// Identity of the application being installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSpec {
    /// Directory name under `~/.local/share`.
    pub dir_name: String,
    /// Launcher command and `.desktop` file stem.
    pub command_name: String,
    /// Human-readable name shown in menus.
    pub display_name: String,
    /// Desktop entry `GenericName`.
    pub generic_name: String,
    /// Desktop entry `Comment`.
    pub comment: String,
    /// Entry point, relative to the install directory.
    pub entry_point: String,
    /// Optional dependency manifest, relative to the install directory.
    pub manifest: String,
    /// Bundled icon, relative to the install directory.
    pub icon: String,
    /// Theme icon used when the bundled icon is absent.
    pub fallback_icon: String,
    /// Desktop entry `Categories`.
    pub categories: Vec<String>,
    /// Desktop entry `Keywords`.
    pub keywords: Vec<String>,
}

impl Default for AppSpec {
    fn default() -> Self {
        Self {
            dir_name: "limpeza_david".to_string(),
            command_name: "limpeza-david".to_string(),
            display_name: "Limpeza David".to_string(),
            generic_name: "System Cleaner".to_string(),
            comment: "Clean temporary files, caches and other unneeded files from your system"
                .to_string(),
            entry_point: "run.py".to_string(),
            manifest: "requirements.txt".to_string(),
            icon: "assets/icon.png".to_string(),
            fallback_icon: "edit-clear".to_string(),
            categories: vec!["Utility".to_string(), "System".to_string()],
            keywords: ["clean", "cleaner", "cache", "temp", "junk", "disk"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Where the installer-repair bootstrap script comes from.
///
/// Running a downloaded script is a trust decision, so the URL is always
/// logged before use and the strategy can be switched off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapSource {
    /// URL of the script.
    pub url: String,
    /// Whether the download-and-run strategy may be used at all.
    pub enabled: bool,
}

impl Default for BootstrapSource {
    fn default() -> Self {
        Self {
            url: DEFAULT_BOOTSTRAP_URL.to_string(),
            enabled: true,
        }
    }
}

type EnvFn = Box<dyn Fn(&str) -> Result<String, std::env::VarError>>;

/// Immutable settings for one installer run.
pub struct InstallContext {
    /// Application identity.
    pub app: AppSpec,
    /// Paths the run produces.
    pub target: InstallTarget,
    /// Repository to clone.
    pub repo_url: String,
    /// Installer-repair script.
    pub bootstrap: BootstrapSource,
    /// PATH entries of the invoking shell.
    pub search_path: Vec<PathBuf>,
    env_fn: EnvFn,
}

impl std::fmt::Debug for InstallContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstallContext")
            .field("app", &self.app)
            .field("target", &self.target)
            .field("repo_url", &self.repo_url)
            .field("bootstrap", &self.bootstrap)
            .field("search_path", &self.search_path)
            .finish_non_exhaustive()
    }
}

impl InstallContext {
    /// Start building a context for `target`.
    pub fn builder(target: InstallTarget) -> InstallContextBuilder {
        InstallContextBuilder {
            app: AppSpec::default(),
            target,
            repo_url: DEFAULT_REPO_URL.to_string(),
            bootstrap: BootstrapSource::default(),
            search_path: None,
            env_fn: None,
        }
    }

    /// Look up an environment variable of the invoking session.
    pub fn env_var(&self, key: &str) -> Result<String, std::env::VarError> {
        (self.env_fn)(key)
    }

    /// Absolute path of the application entry point.
    pub fn entry_point(&self) -> PathBuf {
        self.target.install_dir.join(&self.app.entry_point)
    }
}

/// Builder for [`InstallContext`].
pub struct InstallContextBuilder {
    app: AppSpec,
    target: InstallTarget,
    repo_url: String,
    bootstrap: BootstrapSource,
    search_path: Option<Vec<PathBuf>>,
    env_fn: Option<EnvFn>,
}

impl InstallContextBuilder {
    /// Override the application identity.
    pub fn app(mut self, app: AppSpec) -> Self {
        self.app = app;
        self
    }

    /// Override the repository URL.
    pub fn repo_url(mut self, url: impl Into<String>) -> Self {
        self.repo_url = url.into();
        self
    }

    /// Override the bootstrap script source.
    pub fn bootstrap(mut self, bootstrap: BootstrapSource) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    /// Use an explicit search PATH instead of the process PATH.
    pub fn search_path(mut self, entries: Vec<PathBuf>) -> Self {
        self.search_path = Some(entries);
        self
    }

    /// Use a custom env var lookup function instead of the process environment.
    ///
    /// This allows testing without modifying actual environment variables.
    pub fn env_fn<F>(mut self, env_fn: F) -> Self
    where
        F: Fn(&str) -> Result<String, std::env::VarError> + 'static,
    {
        self.env_fn = Some(Box::new(env_fn));
        self
    }

    /// Freeze the settings.
    pub fn build(self) -> InstallContext {
        InstallContext {
            app: self.app,
            target: self.target,
            repo_url: self.repo_url,
            bootstrap: self.bootstrap,
            search_path: self.search_path.unwrap_or_else(parse_system_path),
            env_fn: self
                .env_fn
                .unwrap_or_else(|| Box::new(|key: &str| std::env::var(key))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn target() -> InstallTarget {
        InstallTarget::for_home(Path::new("/home/u"), None, &AppSpec::default())
    }

    #[test]
    fn builder_uses_defaults() {
        let ctx = InstallContext::builder(target()).build();
        assert_eq!(ctx.repo_url, DEFAULT_REPO_URL);
        assert_eq!(ctx.bootstrap.url, DEFAULT_BOOTSTRAP_URL);
        assert!(ctx.bootstrap.enabled);
        assert_eq!(ctx.app, AppSpec::default());
    }

    #[test]
    fn builder_overrides() {
        let ctx = InstallContext::builder(target())
            .repo_url("https://example.com/fork.git")
            .bootstrap(BootstrapSource {
                url: "https://mirror.example.com/get-pip.py".to_string(),
                enabled: false,
            })
            .search_path(vec![PathBuf::from("/opt/bin")])
            .build();
        assert_eq!(ctx.repo_url, "https://example.com/fork.git");
        assert!(!ctx.bootstrap.enabled);
        assert_eq!(ctx.search_path, vec![PathBuf::from("/opt/bin")]);
    }

    #[test]
    fn env_fn_is_consulted() {
        let ctx = InstallContext::builder(target())
            .env_fn(|key| {
                if key == "XDG_CURRENT_DESKTOP" {
                    Ok("XFCE".to_string())
                } else {
                    Err(std::env::VarError::NotPresent)
                }
            })
            .build();
        assert_eq!(ctx.env_var("XDG_CURRENT_DESKTOP").unwrap(), "XFCE");
        assert!(ctx.env_var("HOME").is_err());
    }

    #[test]
    fn entry_point_is_inside_install_dir() {
        let ctx = InstallContext::builder(target()).build();
        assert_eq!(
            ctx.entry_point(),
            Path::new("/home/u/.local/share/limpeza_david/run.py")
        );
    }

    #[test]
    fn default_app_spec_has_rich_field_set() {
        let app = AppSpec::default();
        assert_eq!(app.categories, vec!["Utility", "System"]);
        assert!(app.keywords.contains(&"cleaner".to_string()));
        assert_eq!(app.fallback_icon, "edit-clear");
    }
}
