//! Freedesktop `.desktop` entry and the wrapper it executes.

use std::path::Path;

use crate::config::InstallContext;
use crate::launcher::quote_for_bash;

/// A rendered desktop entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopEntry {
    pub name: String,
    pub generic_name: String,
    pub comment: String,
    pub exec: String,
    pub working_dir: String,
    pub icon: String,
    pub categories: Vec<String>,
    pub keywords: Vec<String>,
}

impl DesktopEntry {
    /// Build the entry for the installed application.
    ///
    /// The bundled icon is used when the fetched tree has one; otherwise a
    /// theme icon name is used.
    pub fn for_install(ctx: &InstallContext) -> Self {
        let app = &ctx.app;
        let install_dir = &ctx.target.install_dir;
        let bundled_icon = install_dir.join(&app.icon);
        let icon = if bundled_icon.is_file() {
            bundled_icon.display().to_string()
        } else {
            app.fallback_icon.clone()
        };

        Self {
            name: app.display_name.clone(),
            generic_name: app.generic_name.clone(),
            comment: app.comment.clone(),
            exec: exec_value(&ctx.target.wrapper_path),
            working_dir: install_dir.display().to_string(),
            icon,
            categories: app.categories.clone(),
            keywords: app.keywords.clone(),
        }
    }

    /// File contents.
    pub fn render(&self) -> String {
        let mut out = String::from("[Desktop Entry]\n");
        out.push_str("Version=1.0\n");
        out.push_str("Type=Application\n");
        out.push_str(&format!("Name={}\n", self.name));
        out.push_str(&format!("GenericName={}\n", self.generic_name));
        out.push_str(&format!("Comment={}\n", self.comment));
        out.push_str(&format!("Exec={}\n", self.exec));
        out.push_str(&format!("Path={}\n", self.working_dir));
        out.push_str(&format!("Icon={}\n", self.icon));
        out.push_str("Terminal=false\n");
        out.push_str(&format!("Categories={}\n", list_value(&self.categories)));
        out.push_str(&format!("Keywords={}\n", list_value(&self.keywords)));
        out.push_str("StartupNotify=true\n");
        out
    }
}

/// Wrapper script placed in the install directory.
///
/// It locates itself at run time, so it keeps working if the directory is
/// moved; only the interpreter path is baked in. `entry_point` is relative
/// to the install directory.
pub fn render_wrapper(interpreter: &Path, entry_point: &str) -> String {
    format!(
        "#!/usr/bin/env bash\n\
         APP_DIR=\"$(cd \"$(dirname \"${{BASH_SOURCE[0]}}\")\" && pwd)\"\n\
         cd \"$APP_DIR\" || exit 1\n\
         exec \"{}\" \"$APP_DIR/{}\" \"$@\"\n",
        quote_for_bash(interpreter),
        quote_for_bash(Path::new(entry_point))
    )
}

/// Characters that force an Exec argument into double quotes.
const EXEC_RESERVED: &[char] = &[
    '"', '\'', '\\', '>', '<', '~', '|', '&', ';', '$', '*', '?', '#', '(', ')', '`',
];

// Exec arguments with reserved characters are double-quoted with `"`, `` ` ``,
// `$` and `\` backslash-escaped inside. `%` is doubled so it is not read as a
// field code, and the value as a whole gets string escaping (`\` doubled).
fn exec_value(path: &Path) -> String {
    let raw = path.display().to_string();
    let argument = if raw.contains(|c: char| c.is_whitespace() || EXEC_RESERVED.contains(&c)) {
        format!("\"{}\"", quote_for_bash(path))
    } else {
        raw
    };
    argument.replace('\\', "\\\\").replace('%', "%%")
}

fn list_value(items: &[String]) -> String {
    items.iter().map(|i| format!("{};", i)).collect()
}
