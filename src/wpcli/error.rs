//! wp-cli invocation errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("failed to start wp-cli: {command_line}")]
    Spawn {
        command_line: String,
        #[source]
        source: std::io::Error,
    },

    #[error("wp-cli exited with status {status}: {command_line} (options: {options})")]
    CommandFailed {
        command_line: String,
        options: String,
        status: i32,
    },

    #[error("I/O error while talking to wp-cli: {command_line}")]
    Io {
        command_line: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("failed to download {url}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to save {path}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
