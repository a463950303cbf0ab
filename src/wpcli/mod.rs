//! wp-cli process boundary
//!
//! wp-cli is only ever driven as an external process: arguments in, stdout
//! lines and an exit status out.

pub mod channel;
pub mod error;
pub mod resolve;

use crate::core::options::OptionSet;
use async_trait::async_trait;

pub use channel::WpCli;
pub use error::{ChannelError, ResolveError};
pub use resolve::resolve_wp_cli;

pub const IS_INSTALLED: &str = "core is-installed";
pub const DOWNLOAD: &str = "core download";
pub const CONFIG: &str = "core config";
pub const INSTALL: &str = "core install";

/// PHP appended to wp-config.php so Composer-installed packages autoload
pub const EXTRA_PHP: &str = "if( file_exists( $autoloader = dirname(__FILE__) . '/vendor/autoload.php' ) ) require $autoloader;";

/// Trait for running wp-cli subcommands - allows for different implementations
#[async_trait]
pub trait InstallerChannel: Send + Sync {
    /// Run `subcommand` with `options`, feeding `input` on stdin
    ///
    /// Returns the exit status. A nonzero status is an error only when
    /// `fail_on_nonzero` is set.
    async fn run(
        &self,
        subcommand: &str,
        options: &OptionSet,
        input: Option<&str>,
        fail_on_nonzero: bool,
    ) -> Result<i32, ChannelError>;

    /// Whether WordPress is already installed in the working directory
    async fn is_installed(&self) -> Result<bool, ChannelError> {
        let status = self.run(IS_INSTALLED, &OptionSet::new(), None, false).await?;
        Ok(status == 0)
    }

    /// Download the WordPress source for `locale`
    async fn download(&self, locale: &str) -> Result<i32, ChannelError> {
        let options = OptionSet::new().with("locale", locale);
        self.run(DOWNLOAD, &options, None, true).await
    }

    /// Write wp-config.php from `answers`, appending [`EXTRA_PHP`]
    async fn write_config(&self, answers: &OptionSet) -> Result<i32, ChannelError> {
        let mut options = answers.clone();
        options.flag("extra-php");
        options.flag("skip-check");
        self.run(CONFIG, &options, Some(EXTRA_PHP), true).await
    }

    /// Run the WordPress installer
    async fn install(&self, options: &OptionSet) -> Result<i32, ChannelError> {
        self.run(INSTALL, options, None, true).await
    }
}
