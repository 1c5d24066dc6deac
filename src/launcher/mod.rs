//! Command-line launcher.
//!
//! The launcher is a small bash script in `~/.local/bin` that changes into
//! the install directory and execs the interpreter on the entry point,
//! forwarding all arguments. It is regenerated on every run so it always
//! points at the interpreter resolved by the current run.

pub mod path_update;

pub use path_update::{ensure_on_path, PathUpdate};

use std::path::{Path, PathBuf};

use crate::config::InstallContext;
use crate::error::Result;

/// Writes the command-line launcher.
pub struct LauncherBuilder<'a> {
    ctx: &'a InstallContext,
}

impl<'a> LauncherBuilder<'a> {
    pub fn new(ctx: &'a InstallContext) -> Self {
        Self { ctx }
    }

    /// Script text for `interpreter`.
    pub fn render(&self, interpreter: &Path) -> String {
        let install_dir = self.ctx.target.install_dir.as_path();
        format!(
            "#!/usr/bin/env bash\n\
             cd \"{dir}\" || exit 1\n\
             exec \"{interp}\" \"{entry}\" \"$@\"\n",
            dir = quote_for_bash(install_dir),
            interp = quote_for_bash(interpreter),
            entry = quote_for_bash(&self.ctx.entry_point()),
        )
    }

    /// Write the launcher, replacing any previous one, and return its path.
    pub fn build(&self, interpreter: &Path) -> Result<PathBuf> {
        let path = &self.ctx.target.launcher_path;
        write_executable(path, &self.render(interpreter))?;
        tracing::info!("Wrote launcher {}", path.display());
        Ok(path.clone())
    }
}

/// Escape a path for use inside a double-quoted bash string.
pub fn quote_for_bash(path: &Path) -> String {
    let raw = path.to_string_lossy();
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Write `contents` to `path` with mode 0755, creating parent directories.
pub fn write_executable(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    set_executable(path)?;
    Ok(())
}

/// Set mode 0755 on `path`.
#[cfg(unix)]
pub fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))?;
    Ok(())
}

/// Set mode 0755 on `path`.
#[cfg(not(unix))]
pub fn set_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppSpec, InstallTarget};
    use tempfile::TempDir;

    fn ctx(home: &Path) -> InstallContext {
        let target = InstallTarget::for_home(home, None, &AppSpec::default());
        InstallContext::builder(target).search_path(vec![]).build()
    }

    #[test]
    fn renders_cd_and_exec() {
        let ctx = ctx(Path::new("/home/u"));
        let script = LauncherBuilder::new(&ctx).render(Path::new("/usr/bin/python3"));
        assert_eq!(
            script,
            "#!/usr/bin/env bash\n\
             cd \"/home/u/.local/share/limpeza_david\" || exit 1\n\
             exec \"/usr/bin/python3\" \"/home/u/.local/share/limpeza_david/run.py\" \"$@\"\n"
        );
    }

    #[test]
    fn quotes_awkward_paths() {
        assert_eq!(
            quote_for_bash(Path::new("/home/a \"b\"/$x")),
            "/home/a \\\"b\\\"/\\$x"
        );
        assert_eq!(quote_for_bash(Path::new("/plain/path")), "/plain/path");
    }

    #[cfg(unix)]
    #[test]
    fn build_writes_executable_and_overwrites() {
        use std::os::unix::fs::PermissionsExt;

        let home = TempDir::new().unwrap();
        let ctx = ctx(home.path());
        std::fs::create_dir_all(&ctx.target.bin_dir).unwrap();
        std::fs::write(&ctx.target.launcher_path, "old").unwrap();

        let path = LauncherBuilder::new(&ctx)
            .build(Path::new("/usr/bin/python3"))
            .unwrap();

        assert_eq!(path, ctx.target.launcher_path);
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("#!/usr/bin/env bash\n"));
        assert!(content.contains("exec \"/usr/bin/python3\""));
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn build_creates_bin_dir() {
        let home = TempDir::new().unwrap();
        let ctx = ctx(home.path());
        LauncherBuilder::new(&ctx)
            .build(Path::new("/usr/bin/python3"))
            .unwrap();
        assert!(ctx.target.bin_dir.is_dir());
    }
}
