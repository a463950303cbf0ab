//! Operator console - prompts and output sink
//!
//! The pipeline and the wp-cli channel only talk to the operator through the
//! [`Console`] trait, so runs can be scripted in tests.

pub mod terminal;

use crate::core::validator::RuleSet;
use thiserror::Error;

pub use terminal::TerminalConsole;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("prompt failed: {0}")]
    Interaction(String),
}

/// Blocking prompt primitives and an output sink
pub trait Console: Send + Sync {
    /// Ask a question; an empty answer yields `default` when one is given
    fn ask(&self, prompt: &str, default: Option<&str>) -> Result<String, PromptError>;

    /// Ask without echoing the answer
    fn ask_hidden(&self, prompt: &str, default: Option<&str>) -> Result<String, PromptError>;

    /// Write a line of output
    fn write(&self, line: &str, newline: bool);

    /// Ask until the answer satisfies `rules`
    ///
    /// Each rejected answer is reported and the question repeated. The
    /// default is accepted as-is, even where it would fail `rules` (an empty
    /// collation, say).
    fn ask_and_validate(
        &self,
        prompt: &str,
        rules: &RuleSet,
        default: Option<&str>,
    ) -> Result<String, PromptError> {
        loop {
            let raw = self.ask(prompt, default)?;
            if default == Some(raw.as_str()) {
                return Ok(raw);
            }
            match rules.validate(&raw) {
                Ok(answer) => return Ok(answer),
                Err(err) => {
                    tracing::debug!("Rejected answer for '{}': {}", prompt, err);
                    self.write(&err.to_string(), true);
                }
            }
        }
    }
}
