//! Terminal console backed by dialoguer

use crate::console::{Console, PromptError};
use dialoguer::{theme::ColorfulTheme, Input, Password};
use std::io::Write;

/// Interactive console on the controlling terminal
///
/// Prompts are drawn on stderr by dialoguer; output lines go to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConsole;

impl TerminalConsole {
    pub fn new() -> Self {
        Self
    }
}

impl Console for TerminalConsole {
    fn ask(&self, prompt: &str, default: Option<&str>) -> Result<String, PromptError> {
        let theme = ColorfulTheme::default();
        let mut input = Input::<String>::with_theme(&theme)
            .with_prompt(prompt)
            .allow_empty(true);
        if let Some(default) = default {
            input = input
                .default(default.to_string())
                .show_default(!default.is_empty());
        }
        input
            .interact_text()
            .map_err(|e| PromptError::Interaction(e.to_string()))
    }

    fn ask_hidden(&self, prompt: &str, default: Option<&str>) -> Result<String, PromptError> {
        let theme = ColorfulTheme::default();
        let answer = Password::with_theme(&theme)
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .map_err(|e| PromptError::Interaction(e.to_string()))?;

        match default {
            Some(default) if answer.is_empty() => Ok(default.to_string()),
            _ => Ok(answer),
        }
    }

    fn write(&self, line: &str, newline: bool) {
        let mut stdout = std::io::stdout().lock();
        let result = if newline {
            writeln!(stdout, "{}", line)
        } else {
            write!(stdout, "{}", line)
        };
        if let Err(e) = result.and_then(|_| stdout.flush()) {
            tracing::warn!("Failed to write to stdout: {}", e);
        }
    }
}
