//! Visual theme and styling.

use console::{Style, Term};

/// hk's visual theme.
#[derive(Debug, Clone)]
pub struct HkTheme {
    /// Style for completed actions (green).
    pub success: Style,
    /// Style for the `warning:` label (yellow).
    pub warning: Style,
    /// Style for the `error:` label (red bold).
    pub error: Style,
}

impl Default for HkTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl HkTheme {
    /// Create the colored theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
        }
    }

    /// Create a theme without colors (for non-TTY or `NO_COLOR`).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
        }
    }

    pub fn format_success(&self, msg: &str) -> String {
        self.success.apply_to(msg).to_string()
    }

    pub fn format_warning(&self, msg: &str) -> String {
        format!("{} {}", self.warning.apply_to("warning:"), msg)
    }

    pub fn format_error(&self, msg: &str) -> String {
        format!("{} {}", self.error.apply_to("error:"), msg)
    }
}

/// Check if colors should be enabled for output written to `term`.
pub fn should_use_colors(term: &Term) -> bool {
    // https://no-color.org/
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    term.is_term()
}
