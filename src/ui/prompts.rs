//! Interactive prompts.

use std::io::BufRead;

use console::Term;
use dialoguer::{Input, Password};

use crate::error::{HkError, Result};

use super::{Prompt, PromptType};

/// Convert dialoguer errors to HkError.
fn map_dialoguer_err(e: dialoguer::Error) -> HkError {
    HkError::Io(e.into())
}

/// Prompt the user for input on `term`.
///
/// When `term` is not a terminal the question is still written to it and
/// the answer is read as one line from stdin, so answers can be piped in.
pub fn prompt_user(prompt: &Prompt, term: &Term) -> Result<String> {
    if !term.is_term() {
        return prompt_line(prompt, term);
    }

    match prompt.prompt_type {
        PromptType::Input => Input::<String>::new()
            .with_prompt(&prompt.question)
            .interact_on(term)
            .map_err(map_dialoguer_err),
        PromptType::Password => Password::new()
            .with_prompt(&prompt.question)
            .interact_on(term)
            .map_err(map_dialoguer_err),
    }
}

fn prompt_line(prompt: &Prompt, term: &Term) -> Result<String> {
    term.write_str(&format!("{}: ", prompt.question))?;

    read_answer(std::io::stdin().lock())
}

/// One answer line from `reader`, without surrounding whitespace.
fn read_answer(mut reader: impl BufRead) -> Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line.trim().to_string())
}
