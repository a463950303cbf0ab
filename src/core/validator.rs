//! Validation rules for interactively collected answers

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static IDENTIFIER_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("static pattern is valid"));

/// A single named validation rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// The trimmed answer must not be empty
    Required,
    /// The answer is made of `[A-Za-z0-9_]` only. An empty answer has
    /// nothing to match and is rejected too.
    AlphanumericOrUnderscore,
}

impl Rule {
    /// Message reported when this rule is violated
    pub fn message(&self) -> &'static str {
        match self {
            Rule::Required => "Empty value is not allowed.",
            Rule::AlphanumericOrUnderscore => "Only alphanumeric and underscore is allowed.",
        }
    }

    /// Check a raw answer against this rule
    pub fn accepts(&self, raw: &str) -> bool {
        match self {
            Rule::Required => !raw.trim().is_empty(),
            Rule::AlphanumericOrUnderscore => IDENTIFIER_CHARS.is_match(raw),
        }
    }
}

/// Answer rejected by one or more rules
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .messages.join("\n"))]
pub struct ValidationError {
    /// One message per violated rule, in rule order
    pub messages: Vec<String>,
}

/// Ordered list of rules attached to one prompt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Create an empty rule set, which accepts everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule
    pub fn with(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn required() -> Self {
        Self::new().with(Rule::Required)
    }

    pub fn alphanumeric_or_underscore() -> Self {
        Self::new().with(Rule::AlphanumericOrUnderscore)
    }

    /// Rules used for database names and users
    pub fn identifier() -> Self {
        Self::required().with(Rule::AlphanumericOrUnderscore)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Validate a raw answer, see [`validate`]
    pub fn validate(&self, raw: &str) -> Result<String, ValidationError> {
        validate(raw, self)
    }
}

/// Check `raw` against every rule in `rules`
///
/// All rules are evaluated; every violation is reported. On success the
/// answer is returned unchanged.
pub fn validate(raw: &str, rules: &RuleSet) -> Result<String, ValidationError> {
    let messages: Vec<String> = rules
        .rules
        .iter()
        .filter(|rule| !rule.accepts(raw))
        .map(|rule| rule.message().to_string())
        .collect();

    if messages.is_empty() {
        Ok(raw.to_string())
    } else {
        Err(ValidationError { messages })
    }
}
