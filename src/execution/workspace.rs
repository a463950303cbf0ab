//! Target directory being provisioned

use crate::core::config::ProvisionConfig;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed to remove {path}")]
pub struct WorkspaceError {
    pub path: String,
    #[source]
    pub source: std::io::Error,
}

/// The directory WordPress is installed into
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    loader_file: String,
    config_file: String,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>, loader_file: &str, config_file: &str) -> Self {
        Self {
            root: root.into(),
            loader_file: loader_file.to_string(),
            config_file: config_file.to_string(),
        }
    }

    pub fn from_config(root: impl Into<PathBuf>, config: &ProvisionConfig) -> Self {
        Self::new(root, &config.loader_file, &config.config_file)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn loader_path(&self) -> PathBuf {
        self.root.join(&self.loader_file)
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(&self.config_file)
    }

    /// Whether the WordPress source is already present
    pub fn has_loader(&self) -> bool {
        self.loader_path().exists()
    }

    /// Whether a configuration file is already present
    pub fn has_config(&self) -> bool {
        self.config_path().exists()
    }

    /// Remove the configuration file; returns whether one was removed
    pub fn discard_config(&self) -> Result<bool, WorkspaceError> {
        let path = self.config_path();
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(WorkspaceError {
                path: path.display().to_string(),
                source,
            }),
        }
    }
}
