//! wp-provision - interactive WordPress setup driven by wp-cli
//!
//! A run checks for an existing install, downloads the source, writes
//! `wp-config.php`, creates the database and its user, then runs the
//! installer. A failed step undoes the partial work of that step before the
//! error is returned.

pub mod cli;
pub mod console;
pub mod core;
pub mod database;
pub mod execution;
pub mod wpcli;

// Re-export commonly used types
pub use crate::console::{Console, PromptError, TerminalConsole};
pub use crate::core::{ConfigurationAnswers, OptionSet, PipelineStage, ProvisionConfig, RuleSet, SetupContext, Step};
pub use crate::database::{Credentials, DatabaseConnector, DatabaseError, DatabaseProvisioner, DatabaseSession};
pub use crate::execution::{Outcome, PipelineError, PipelineEvent, SetupPipeline, Workspace};
pub use crate::wpcli::{resolve_wp_cli, ChannelError, InstallerChannel, WpCli};
