//! Terminal UI.

use console::Term;
use std::io::Write;

use crate::error::Result;

use super::{prompt_user, should_use_colors, HkTheme, Prompt, UserInterface};

/// UI writing to the process's stdout and stderr.
pub struct TerminalUI {
    out: Term,
    err: Term,
    theme: HkTheme,
}

impl TerminalUI {
    pub fn new() -> Self {
        let err = Term::stderr();
        let theme = if should_use_colors(&err) {
            HkTheme::new()
        } else {
            HkTheme::plain()
        };

        Self {
            out: Term::stdout(),
            err,
            theme,
        }
    }
}

impl Default for TerminalUI {
    fn default() -> Self {
        Self::new()
    }
}

impl UserInterface for TerminalUI {
    fn message(&mut self, msg: &str) {
        writeln!(self.out, "{}", msg).ok();
    }

    fn success(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_success(msg)).ok();
    }

    fn warning(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_warning(msg)).ok();
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_error(msg)).ok();
    }

    fn usage(&mut self, text: &str) {
        write!(self.err, "{}", text).ok();
        if !text.ends_with('\n') {
            writeln!(self.err).ok();
        }
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<String> {
        prompt_user(prompt, &self.err)
    }
}
