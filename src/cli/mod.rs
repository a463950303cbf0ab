//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{CheckCommand, RunCommand, ValidateCommand};
use std::ffi::OsString;
use std::path::PathBuf;

/// Interactive WordPress provisioning driven by wp-cli
#[derive(Debug, Parser, Clone)]
#[command(name = "wp-provision")]
#[command(version)]
#[command(about = "Download, configure and install WordPress with wp-cli", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to provisioning configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory to install WordPress into
    #[arg(short, long, global = true, default_value = ".")]
    pub path: PathBuf,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Download, configure and install WordPress
    Run(RunCommand),

    /// Report whether WordPress is already installed
    Check(CheckCommand),

    /// Validate the provisioning configuration
    Validate(ValidateCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
