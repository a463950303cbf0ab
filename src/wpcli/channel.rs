//! wp-cli subprocess channel - spawns wp-cli and streams its output

use crate::console::Console;
use crate::core::options::{escape_arg, OptionSet};
use crate::wpcli::{ChannelError, InstallerChannel};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Runs wp-cli as a child process
///
/// stdin and stdout are piped; stderr goes straight to the terminal.
/// Every stdout line is forwarded to the console as soon as it is read.
#[derive(Clone)]
pub struct WpCli {
    /// Command prefix, e.g. `["wp"]` or `["php", "wp-cli.phar"]`
    prefix: Vec<String>,

    /// Directory wp-cli runs in
    working_dir: PathBuf,

    console: Arc<dyn Console>,
}

impl WpCli {
    pub fn new(prefix: Vec<String>, working_dir: impl Into<PathBuf>, console: Arc<dyn Console>) -> Self {
        Self {
            prefix,
            working_dir: working_dir.into(),
            console,
        }
    }

    pub fn prefix(&self) -> &[String] {
        &self.prefix
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Shell-escaped command line, as shown to the operator
    pub fn command_line(&self, subcommand: &str, options: &OptionSet) -> String {
        let mut parts: Vec<String> = self.prefix.iter().map(|p| escape_arg(p)).collect();
        parts.extend(subcommand_words(subcommand).iter().map(|w| escape_arg(w)));
        let encoded = options.encode();
        if !encoded.is_empty() {
            parts.push(encoded);
        }
        parts.join(" ")
    }
}

/// Split a subcommand such as `core is-installed` into argument words
fn subcommand_words(subcommand: &str) -> Vec<String> {
    subcommand.split_whitespace().map(str::to_string).collect()
}

#[async_trait]
impl InstallerChannel for WpCli {
    async fn run(
        &self,
        subcommand: &str,
        options: &OptionSet,
        input: Option<&str>,
        fail_on_nonzero: bool,
    ) -> Result<i32, ChannelError> {
        let command_line = self.command_line(subcommand, options);
        debug!("Spawning wp-cli: {}", command_line);

        let (program, prefix_args) = self.prefix.split_first().ok_or_else(|| ChannelError::Spawn {
            command_line: command_line.clone(),
            source: std::io::Error::new(ErrorKind::NotFound, "empty wp-cli command"),
        })?;

        let mut child = Command::new(program)
            .args(prefix_args)
            .args(subcommand_words(subcommand))
            .args(options.to_args())
            .current_dir(&self.working_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ChannelError::Spawn {
                command_line: command_line.clone(),
                source,
            })?;

        let io_error = |source: std::io::Error| ChannelError::Io {
            command_line: command_line.clone(),
            source,
        };

        // Dropping stdin closes it, which is wp-cli's end-of-input
        let mut unread_input = None;
        if let Some(mut stdin) = child.stdin.take() {
            if let Some(payload) = input {
                match stdin.write_all(payload.as_bytes()).await {
                    Ok(()) => {}
                    Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                        warn!("wp-cli closed stdin before reading input");
                        unread_input = Some(e);
                    }
                    Err(e) => return Err(io_error(e)),
                }
            }
        }

        if let Some(stdout) = child.stdout.take() {
            let mut reader = BufReader::new(stdout);
            let mut buf = Vec::new();
            loop {
                buf.clear();
                let read = reader.read_until(b'\n', &mut buf).await.map_err(io_error)?;
                if read == 0 {
                    break;
                }
                let line = String::from_utf8_lossy(&buf);
                self.console
                    .write(line.trim_end_matches(|c| c == '\n' || c == '\r'), true);
            }
        }

        let status = child.wait().await.map_err(io_error)?;
        // Killed by a signal
        let code = status.code().unwrap_or(-1);
        info!("wp-cli {} exited with status {}", subcommand, code);

        if fail_on_nonzero && code != 0 {
            return Err(ChannelError::CommandFailed {
                command_line,
                options: options.encode(),
                status: code,
            });
        }

        // A clean exit that never read its input did not do the job
        if let (0, Some(e)) = (code, unread_input) {
            return Err(io_error(e));
        }

        Ok(code)
    }
}
