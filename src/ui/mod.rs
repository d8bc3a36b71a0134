//! Terminal output and prompts.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] writing to the real terminal
//! - [`MockUI`] capturing output for tests
//! - Prompts and column-aligned tables
//!
//! Command output goes to stdout via [`UserInterface::message`]; status,
//! diagnostics and usage text go to stderr.
//!
//! # Example
//!
//! ```
//! use hk::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.message("myapp");
//! ui.error("no app specified");
//!
//! assert!(ui.has_message("myapp"));
//! assert!(ui.has_error("no app specified"));
//! ```

pub mod mock;
pub mod prompts;
pub mod table;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use prompts::prompt_user;
pub use table::Table;
pub use terminal::TerminalUI;
pub use theme::{should_use_colors, HkTheme};

use crate::error::Result;

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Print command output (stdout).
    fn message(&mut self, msg: &str);

    /// Report a completed action (stderr).
    fn success(&mut self, msg: &str);

    /// Display a warning (stderr).
    fn warning(&mut self, msg: &str);

    /// Display an error (stderr).
    fn error(&mut self, msg: &str);

    /// Print usage or help text verbatim (stderr).
    fn usage(&mut self, text: &str);

    /// Show a prompt and read the answer.
    fn prompt(&mut self, prompt: &Prompt) -> Result<String>;
}

/// A prompt to show to the user.
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Key identifying the prompt (used by [`MockUI`] to look up answers).
    pub key: String,
    /// The question to display.
    pub question: String,
    /// The type of prompt.
    pub prompt_type: PromptType,
}

impl Prompt {
    /// Free-form text prompt.
    pub fn input(key: &str, question: &str) -> Self {
        Self {
            key: key.to_string(),
            question: question.to_string(),
            prompt_type: PromptType::Input,
        }
    }

    /// Prompt whose answer is not echoed.
    pub fn password(key: &str, question: &str) -> Self {
        Self {
            prompt_type: PromptType::Password,
            ..Self::input(key, question)
        }
    }
}

/// The type of prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptType {
    /// Echoed text input.
    Input,
    /// Hidden input.
    Password,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_prompt_keeps_key_and_question() {
        let prompt = Prompt::password("token", "API token");
        assert_eq!(prompt.key, "token");
        assert_eq!(prompt.question, "API token");
        assert_eq!(prompt.prompt_type, PromptType::Password);
    }

    #[test]
    fn input_prompt_is_echoed() {
        let prompt = Prompt::input("email", "Email");
        assert_eq!(prompt.prompt_type, PromptType::Input);
    }
}
