//! Locating the wp-cli executable

use crate::core::config::ProvisionConfig;
use crate::wpcli::ResolveError;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// File name a downloaded phar is saved under
pub const PHAR_FILE: &str = "wp-cli.phar";

/// Resolve the command prefix used to invoke wp-cli
///
/// Order of preference: the configured `wp_cli` prefix, a `wp` on `PATH`,
/// then `wp-cli.phar` in the workspace (downloaded first if missing) run
/// through `php`.
pub async fn resolve_wp_cli(
    config: &ProvisionConfig,
    workspace: &Path,
) -> Result<Vec<String>, ResolveError> {
    if let Some(prefix) = &config.wp_cli {
        debug!("Using configured wp-cli: {:?}", prefix);
        return Ok(prefix.clone());
    }

    if let Ok(path) = which::which("wp") {
        debug!("Found wp at {}", path.display());
        return Ok(vec![path.to_string_lossy().into_owned()]);
    }

    let phar = workspace.join(PHAR_FILE);
    if !phar.is_file() {
        download_phar(&config.phar_url, &phar).await?;
    }
    Ok(phar_prefix(&config.php, &phar))
}

/// Command prefix running `phar` through the `php` interpreter
pub fn phar_prefix(php: &str, phar: &Path) -> Vec<String> {
    vec![php.to_string(), phar.to_string_lossy().into_owned()]
}

async fn download_phar(url: &str, destination: &Path) -> Result<(), ResolveError> {
    info!("wp not found on PATH, downloading {}", url);

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Downloading {}", PHAR_FILE));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = fetch(url).await;
    spinner.finish_and_clear();
    let bytes = result?;

    tokio::fs::write(destination, &bytes)
        .await
        .map_err(|source| ResolveError::Write {
            path: destination.display().to_string(),
            source,
        })?;

    info!("Saved {} ({} bytes)", destination.display(), bytes.len());
    Ok(())
}

async fn fetch(url: &str) -> Result<Vec<u8>, ResolveError> {
    let download_error = |source| ResolveError::Download {
        url: url.to_string(),
        source,
    };

    let response = reqwest::get(url)
        .await
        .and_then(|r| r.error_for_status())
        .map_err(download_error)?;
    let bytes = response.bytes().await.map_err(download_error)?;
    Ok(bytes.to_vec())
}
