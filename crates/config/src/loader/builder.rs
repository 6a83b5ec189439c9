//! Configuration loader builder implementation.
//!
//! Invariants / Assumptions:
//! - Builder methods take precedence over environment variables, which take
//!   precedence over defaults. `from_env()` never overwrites a value that a
//!   builder method already set.
//! - The `DOTENV_DISABLED` variable is checked before `dotenvy::dotenv()` is called.

use std::path::PathBuf;
use std::time::Duration;

use super::env::apply_env;
use super::error::ConfigError;
use super::path::default_network_path;
use crate::constants::{DEFAULT_UNDO_WINDOW_MS, MAX_UNDO_WINDOW_MS};
use crate::types::{Config, LaunchMode, LaunchParams};

/// Configuration loader that builds config from environment variables and overrides.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    network_path: Option<PathBuf>,
    mode: Option<LaunchMode>,
    target_node: Option<u16>,
    undo_window: Option<Duration>,
}

impl ConfigLoader {
    /// Create a new configuration loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if dotenv loading is disabled via environment variable.
    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var("DOTENV_DISABLED").ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load environment variables from .env file if present.
    ///
    /// If `DOTENV_DISABLED` is set to "true" or "1", the .env file is not loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the `.env` file exists but cannot be parsed
    /// (`ConfigError::DotenvParse`) or read (`ConfigError::DotenvIo`).
    /// Missing `.env` files are silently ignored.
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if Self::is_not_found(&e) => Ok(self),
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(ConfigError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(ConfigError::DotenvUnknown),
        }
    }

    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Read configuration from environment variables.
    ///
    /// Values already set through builder methods are kept.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        let mut from_env = ConfigLoader::new();
        apply_env(&mut from_env)?;
        self.network_path = self.network_path.or(from_env.network_path);
        self.mode = self.mode.or(from_env.mode);
        self.target_node = self.target_node.or(from_env.target_node);
        self.undo_window = self.undo_window.or(from_env.undo_window);
        Ok(self)
    }

    /// Set the network document path.
    pub fn with_network_path(mut self, path: PathBuf) -> Self {
        self.network_path = Some(path);
        self
    }

    /// Set the screen mode.
    pub fn with_mode(mut self, mode: LaunchMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Set the unicast address of the node whose keys are offered.
    pub fn with_target_node(mut self, address: u16) -> Self {
        self.target_node = Some(address);
        self
    }

    /// Set how long a removed key can be restored.
    pub fn with_undo_window(mut self, window: Duration) -> Self {
        self.undo_window = Some(window);
        self
    }

    /// Build the final configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUndoWindow` if the undo window is zero or too
    /// long, or `ConfigError::DataDirUnavailable` if no network path was given and
    /// the platform data directory cannot be determined.
    pub fn build(self) -> Result<Config, ConfigError> {
        let undo_window = self
            .undo_window
            .unwrap_or(Duration::from_millis(DEFAULT_UNDO_WINDOW_MS));
        Self::validate_undo_window(undo_window)?;

        let network_path = match self.network_path {
            Some(path) => path,
            None => default_network_path()
                .map_err(|e| ConfigError::DataDirUnavailable(e.to_string()))?,
        };

        let launch = LaunchParams {
            mode: self.mode.unwrap_or_default(),
            target_node: self.target_node,
        };

        tracing::debug!(
            path = %network_path.display(),
            mode = %launch.mode,
            undo_window_ms = undo_window.as_millis() as u64,
            "Configuration resolved"
        );

        Ok(Config {
            network_path,
            undo_window,
            launch,
        })
    }

    fn validate_undo_window(window: Duration) -> Result<(), ConfigError> {
        if window.is_zero() {
            return Err(ConfigError::InvalidUndoWindow {
                message: "undo window must be greater than 0 ms".to_string(),
            });
        }
        if window > Duration::from_millis(MAX_UNDO_WINDOW_MS) {
            return Err(ConfigError::InvalidUndoWindow {
                message: format!(
                    "undo window exceeds maximum allowed value of {} ms",
                    MAX_UNDO_WINDOW_MS
                ),
            });
        }
        Ok(())
    }

    // Internal setters for use by other loader modules

    pub(crate) fn set_network_path(&mut self, path: Option<PathBuf>) {
        self.network_path = path;
    }

    pub(crate) fn set_mode(&mut self, mode: Option<LaunchMode>) {
        self.mode = mode;
    }

    pub(crate) fn set_target_node(&mut self, address: Option<u16>) {
        self.target_node = address;
    }

    pub(crate) fn set_undo_window(&mut self, window: Option<Duration>) {
        self.undo_window = window;
    }
}
