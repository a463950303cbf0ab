//! CLI command definitions

use crate::core::config::ProvisionConfig;
use anyhow::Result;
use clap::Args;

/// Settings that override the configuration file
#[derive(Debug, Args, Clone, Default)]
pub struct ConfigOverrides {
    /// Locale of the WordPress download (e.g. ja, en_US)
    #[arg(long)]
    pub locale: Option<String>,

    /// Command used to run wp-cli; quote paths containing spaces
    #[arg(long = "wp-cli", value_name = "COMMAND")]
    pub wp_cli: Option<String>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut ProvisionConfig) -> Result<()> {
        if let Some(locale) = &self.locale {
            config.locale = locale.clone();
        }
        if let Some(command) = &self.wp_cli {
            config.set_wp_cli(command)?;
        }
        Ok(())
    }
}

/// Run the provisioning pipeline
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    #[command(flatten)]
    pub overrides: ConfigOverrides,

    /// Print a per-step timing summary when done
    #[arg(long)]
    pub summary: bool,
}

/// Check whether WordPress is installed
#[derive(Debug, Args, Clone)]
pub struct CheckCommand {
    #[command(flatten)]
    pub overrides: ConfigOverrides,
}

/// Validate the provisioning configuration
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Output the effective configuration in JSON format
    #[arg(long)]
    pub json: bool,
}
