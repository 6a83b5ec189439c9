//! Platform path resolution for the network document.

use anyhow::Context;
use std::path::PathBuf;

use crate::constants::{APP_NAME, NETWORK_FILE_NAME};

/// Returns the default location of the network document in the platform data directory.
///
/// # Errors
///
/// Returns an error if no home directory can be determined.
pub fn default_network_path() -> Result<PathBuf, anyhow::Error> {
    let proj_dirs = directories::ProjectDirs::from("", "", APP_NAME)
        .context("Failed to determine project directories")?;

    Ok(proj_dirs.data_dir().join(NETWORK_FILE_NAME))
}
