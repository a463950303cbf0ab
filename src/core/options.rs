//! Long-option encoding for wp-cli command lines

use std::borrow::Cow;

/// Insertion-ordered set of `--name[=value]` options
///
/// A `None` value renders as a bare flag. A `Some("")` value is an explicit
/// opt-out and is left off the command line entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSet {
    entries: Vec<(String, Option<String>)>,
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`OptionSet::push`] with a value
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, Some(value.into()));
        self
    }

    /// Append an option
    pub fn push(&mut self, name: impl Into<String>, value: Option<String>) {
        self.entries.push((name.into(), value));
    }

    /// Append a bare flag
    pub fn flag(&mut self, name: impl Into<String>) {
        self.push(name, None);
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
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    /// Unescaped option tokens, ready to be passed as process arguments
    pub fn to_args(&self) -> Vec<String> {
        self.iter()
            .filter_map(|(name, value)| match value {
                Some("") => None,
                Some(value) => Some(format!("--{}={}", name, value)),
                None => Some(format!("--{}", name)),
            })
            .collect()
    }

    /// Shell-escaped option string, tokens joined by single spaces
    pub fn encode(&self) -> String {
        self.to_args()
            .iter()
            .map(|token| escape_arg(token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Escape a token as a single POSIX shell argument
pub fn escape_arg(token: &str) -> String {
    shell_escape::unix::escape(Cow::Borrowed(token)).into_owned()
}
