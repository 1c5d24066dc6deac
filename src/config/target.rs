//! Filesystem layout of an installation.

use std::path::{Path, PathBuf};

use super::AppSpec;

/// Every path an installer run creates or checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallTarget {
    /// User home directory all other paths derive from.
    pub home: PathBuf,
    /// Source tree location; recreated on every run.
    pub install_dir: PathBuf,
    /// Directory holding the command-line launcher.
    pub bin_dir: PathBuf,
    /// Command-line launcher script.
    pub launcher_path: PathBuf,
    /// Wrapper script the desktop shortcut executes.
    pub wrapper_path: PathBuf,
    /// Shortcut on the user's desktop.
    pub desktop_shortcut: PathBuf,
    /// Shortcut registered in the applications menu.
    pub menu_shortcut: PathBuf,
}

impl InstallTarget {
    /// Lay out paths under `home`.
    ///
    /// `desktop_dir` is the XDG desktop directory when known; `~/Desktop`
    /// is used otherwise.
    pub fn for_home(home: &Path, desktop_dir: Option<PathBuf>, app: &AppSpec) -> Self {
        let install_dir = home.join(".local/share").join(&app.dir_name);
        let bin_dir = home.join(".local/bin");
        let desktop_dir = desktop_dir.unwrap_or_else(|| home.join("Desktop"));
        let desktop_file = format!("{}.desktop", app.command_name);

        Self {
            home: home.to_path_buf(),
            launcher_path: bin_dir.join(&app.command_name),
            wrapper_path: install_dir.join("launch.sh"),
            desktop_shortcut: desktop_dir.join(&desktop_file),
            menu_shortcut: home.join(".local/share/applications").join(&desktop_file),
            install_dir,
            bin_dir,
        }
    }

    /// Lay out paths for the current user.
    ///
    /// Returns `None` when the home directory cannot be determined.
    pub fn for_current_user(app: &AppSpec) -> Option<Self> {
        let home = dirs::home_dir()?;
        Some(Self::for_home(&home, dirs::desktop_dir(), app))
    }

    /// Both shortcut locations, desktop first.
    pub fn shortcut_paths(&self) -> [&Path; 2] {
        [&self.desktop_shortcut, &self.menu_shortcut]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_under_home() {
        let target = InstallTarget::for_home(Path::new("/home/u"), None, &AppSpec::default());
        assert_eq!(target.install_dir, Path::new("/home/u/.local/share/limpeza_david"));
        assert_eq!(target.bin_dir, Path::new("/home/u/.local/bin"));
        assert_eq!(target.launcher_path, Path::new("/home/u/.local/bin/limpeza-david"));
        assert_eq!(
            target.wrapper_path,
            Path::new("/home/u/.local/share/limpeza_david/launch.sh")
        );
        assert_eq!(
            target.desktop_shortcut,
            Path::new("/home/u/Desktop/limpeza-david.desktop")
        );
        assert_eq!(
            target.menu_shortcut,
            Path::new("/home/u/.local/share/applications/limpeza-david.desktop")
        );
    }

    #[test]
    fn xdg_desktop_dir_is_respected() {
        let target = InstallTarget::for_home(
            Path::new("/home/u"),
            Some(PathBuf::from("/home/u/Área de Trabalho")),
            &AppSpec::default(),
        );
        assert_eq!(
            target.desktop_shortcut,
            Path::new("/home/u/Área de Trabalho/limpeza-david.desktop")
        );
    }

    #[test]
    fn shortcut_paths_lists_desktop_then_menu() {
        let target = InstallTarget::for_home(Path::new("/h"), None, &AppSpec::default());
        let [first, second] = target.shortcut_paths();
        assert_eq!(first, target.desktop_shortcut.as_path());
        assert_eq!(second, target.menu_shortcut.as_path());
    }
}
