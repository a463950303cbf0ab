//! Configuration answers collected from the operator

use crate::core::options::OptionSet;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnswersError {
    #[error("answer '{0}' is already set")]
    AlreadySet(String),
}

/// Write-once, insertion-ordered map of configuration answers
///
/// Keys accumulate across stages; a key can never be overwritten once set.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConfigurationAnswers {
    entries: Vec<(String, Option<String>)>,
}

impl ConfigurationAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), AnswersError> {
        self.insert_entry(key.into(), Some(value.into()))
    }

    /// Record a key with no value (rendered as a bare flag)
    pub fn insert_flag(&mut self, key: impl Into<String>) -> Result<(), AnswersError> {
        self.insert_entry(key.into(), None)
    }

    fn insert_entry(&mut self, key: String, value: Option<String>) -> Result<(), AnswersError> {
        if self.contains(&key) {
            return Err(AnswersError::AlreadySet(key));
        }
        self.entries.push((key, value));
        Ok(())
    }

    /// Value of an answer; `None` when absent or a bare flag
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Render a subset of answers as options, in the order of `keys`
    pub fn select(&self, keys: &[&str]) -> OptionSet {
        let mut options = OptionSet::new();
        for key in keys {
            if let Some((name, value)) = self.entries.iter().find(|(k, _)| k == key) {
                options.push(name.clone(), value.clone());
            }
        }
        options
    }
}

impl From<&ConfigurationAnswers> for OptionSet {
    fn from(answers: &ConfigurationAnswers) -> Self {
        let mut options = OptionSet::new();
        for (name, value) in &answers.entries {
            options.push(name.clone(), value.clone());
        }
        options
    }
}

// Passwords end up in tracing output otherwise
impl fmt::Debug for ConfigurationAnswers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in &self.entries {
            if key.contains("pass") && value.is_some() {
                map.entry(key, &"********");
            } else {
                map.entry(key, value);
            }
        }
        map.finish()
    }
}
