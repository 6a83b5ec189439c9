//! Environment variable parsing for configuration.
//!
//! Invariants:
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Returned values are trimmed.
//! - Invalid values return `ConfigError::InvalidValue` naming the variable.

use std::path::PathBuf;
use std::time::Duration;

use super::builder::ConfigLoader;
use super::error::ConfigError;
use crate::constants::{ENV_MODE, ENV_NETWORK_PATH, ENV_TARGET_NODE, ENV_UNDO_WINDOW_MS};
use crate::types::{LaunchMode, parse_unicast_address};

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Apply environment variable configuration to the loader.
pub fn apply_env(loader: &mut ConfigLoader) -> Result<(), ConfigError> {
    if let Some(path) = env_var_or_none(ENV_NETWORK_PATH) {
        loader.set_network_path(Some(PathBuf::from(path)));
    }
    if let Some(mode) = env_var_or_none(ENV_MODE) {
        let mode: LaunchMode = mode.parse().map_err(|message| ConfigError::InvalidValue {
            var: ENV_MODE.to_string(),
            message,
        })?;
        loader.set_mode(Some(mode));
    }
    if let Some(node) = env_var_or_none(ENV_TARGET_NODE) {
        let address = parse_unicast_address(&node).map_err(|message| {
            ConfigError::InvalidValue {
                var: ENV_TARGET_NODE.to_string(),
                message,
            }
        })?;
        loader.set_target_node(Some(address));
    }
    if let Some(window) = env_var_or_none(ENV_UNDO_WINDOW_MS) {
        let millis: u64 = window.parse().map_err(|_| ConfigError::InvalidValue {
            var: ENV_UNDO_WINDOW_MS.to_string(),
            message: "must be a number of milliseconds".to_string(),
        })?;
        loader.set_undo_window(Some(Duration::from_millis(millis)));
    }
    Ok(())
}
