//! Provisioning configuration from YAML

use crate::core::validator::{Rule, RuleSet};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Location wp-cli publishes its phar builds
pub const DEFAULT_PHAR_URL: &str =
    "https://raw.githubusercontent.com/wp-cli/builds/gh-pages/phar/wp-cli.phar";

/// Top-level provisioning configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisionConfig {
    /// Locale passed to `core download`
    pub locale: String,

    /// Explicit wp-cli command prefix, e.g. `["php", "/opt/wp-cli.phar"]`
    pub wp_cli: Option<Vec<String>>,

    /// PHP interpreter used to run a downloaded phar
    pub php: String,

    /// Where to fetch `wp-cli.phar` when no `wp` is installed
    pub phar_url: String,

    /// File whose presence means the source is already downloaded
    pub loader_file: String,

    /// File whose presence means the site is already configured
    pub config_file: String,

    /// Unix socket for the privileged database connection
    pub mysql_socket: Option<PathBuf>,

    /// Defaults offered at the configuration prompts
    pub defaults: PromptDefaults,
}

/// Defaults for optional configuration prompts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptDefaults {
    pub dbhost: String,
    pub dbprefix: String,
    pub dbcharset: String,
    pub dbcollate: String,
}

impl Default for PromptDefaults {
    fn default() -> Self {
        Self {
            dbhost: "localhost".to_string(),
            dbprefix: "wp_".to_string(),
            dbcharset: "utf8".to_string(),
            dbcollate: String::new(),
        }
    }
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            locale: "ja".to_string(),
            wp_cli: None,
            php: "php".to_string(),
            phar_url: DEFAULT_PHAR_URL.to_string(),
            loader_file: "wp-load.php".to_string(),
            config_file: "wp-config.php".to_string(),
            mysql_socket: None,
            defaults: PromptDefaults::default(),
        }
    }
}

impl ProvisionConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: ProvisionConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `explicit` if given, else the per-user config file if it exists,
    /// else built-in defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                tracing::debug!("Using config file {}", path.display());
                Self::from_file(path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// `<config dir>/wp-provision/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("wp-provision").join("config.yaml"))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.locale.is_empty()
            || !self
                .locale
                .chars()
                .all(|c| c.is_ascii_alphabetic() || c == '_')
        {
            anyhow::bail!("Invalid locale '{}'", self.locale);
        }

        if let Some(prefix) = &self.wp_cli {
            if prefix.is_empty() || prefix.iter().any(|part| part.is_empty()) {
                anyhow::bail!("wp_cli must be a non-empty command with no empty parts");
            }
        }

        for (name, file) in [
            ("loader_file", &self.loader_file),
            ("config_file", &self.config_file),
        ] {
            let bare = Path::new(file)
                .file_name()
                .is_some_and(|f| f == file.as_str());
            if !bare {
                anyhow::bail!("{} must be a plain file name, got '{}'", name, file);
            }
        }

        if self.defaults.dbhost.trim().is_empty() {
            anyhow::bail!("defaults.dbhost must not be empty");
        }

        let identifier = RuleSet::new().with(Rule::AlphanumericOrUnderscore);
        for (name, value) in [
            ("dbprefix", &self.defaults.dbprefix),
            ("dbcharset", &self.defaults.dbcharset),
        ] {
            identifier
                .validate(value)
                .with_context(|| format!("Invalid default for {}", name))?;
        }
        if !self.defaults.dbcollate.is_empty() {
            identifier
                .validate(&self.defaults.dbcollate)
                .context("Invalid default for dbcollate")?;
        }

        Ok(())
    }

    /// Override the wp-cli command prefix, split with shell quoting rules
    pub fn set_wp_cli(&mut self, command: &str) -> Result<()> {
        let prefix = shell_words::split(command)
            .with_context(|| format!("Cannot split wp-cli command: {}", command))?;
        self.wp_cli = if prefix.is_empty() { None } else { Some(prefix) };
        Ok(())
    }
}
