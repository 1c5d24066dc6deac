//! Status vocabulary for summary lines and spinners.

use super::theme::InstallerTheme;

/// Canonical status kinds used across installer output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    /// Done, or already in place.
    Success,
    /// Done with a caveat.
    Warning,
    /// Did not happen.
    Failed,
    /// Deliberately not attempted.
    Skipped,
}

impl StatusKind {
    /// Unicode icon for TTY output.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "✓",
            Self::Warning => "⚠",
            Self::Failed => "✗",
            Self::Skipped => "○",
        }
    }

    /// Bracketed text for non-TTY output.
    pub fn bracketed(self) -> &'static str {
        match self {
            Self::Success => "[ok]",
            Self::Warning => "[warn]",
            Self::Failed => "[FAIL]",
            Self::Skipped => "[skip]",
        }
    }

    /// Styled icon string using the given theme.
    pub fn styled(self, theme: &InstallerTheme) -> String {
        let icon = self.icon();
        match self {
            Self::Success => theme.success.apply_to(icon).to_string(),
            Self::Warning => theme.warning.apply_to(icon).to_string(),
            Self::Failed => theme.error.apply_to(icon).to_string(),
            Self::Skipped => theme.dim.apply_to(icon).to_string(),
        }
    }

    /// Format a status line for non-TTY: bracketed + message.
    pub fn format_plain(self, msg: &str) -> String {
        format!("{} {}", self.bracketed(), msg)
    }
}

impl From<bool> for StatusKind {
    fn from(passed: bool) -> Self {
        if passed {
            Self::Success
        } else {
            Self::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icons_are_distinct() {
        let kinds = [
            StatusKind::Success,
            StatusKind::Warning,
            StatusKind::Failed,
            StatusKind::Skipped,
        ];
        let icons: std::collections::HashSet<_> = kinds.iter().map(|k| k.icon()).collect();
        assert_eq!(icons.len(), kinds.len());
    }

    #[test]
    fn plain_format_uses_brackets() {
        assert_eq!(StatusKind::Failed.format_plain("launcher"), "[FAIL] launcher");
        assert_eq!(StatusKind::Success.format_plain("git"), "[ok] git");
    }

    #[test]
    fn from_bool() {
        assert_eq!(StatusKind::from(true), StatusKind::Success);
        assert_eq!(StatusKind::from(false), StatusKind::Failed);
    }

    #[test]
    fn plain_theme_styles_to_bare_icon() {
        let theme = InstallerTheme::plain();
        assert_eq!(StatusKind::Warning.styled(&theme), "⚠");
    }
}
