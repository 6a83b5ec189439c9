//! Error types for configuration loading.
//!
//! Invariants:
//! - All error variants include context for debugging (variable names, limits).
//! - Dotenv errors NEVER include raw .env line contents.

use std::io::ErrorKind;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("invalid undo window: {message}")]
    InvalidUndoWindow { message: String },

    #[error("Unable to determine data directory: {0}")]
    DataDirUnavailable(String),

    /// Failed to parse the `.env` file due to invalid syntax.
    ///
    /// Only the byte index of the failure is reported, never the line itself.
    #[error(
        "Failed to parse .env file at position {error_index}. Hint: set DOTENV_DISABLED=1 to skip .env loading"
    )]
    DotenvParse { error_index: usize },

    /// Failed to read the `.env` file due to an I/O error.
    #[error("Failed to read .env file: {kind}")]
    DotenvIo { kind: ErrorKind },

    /// Unknown dotenv error (future variants from dotenvy crate).
    #[error("Failed to load .env file. Hint: set DOTENV_DISABLED=1 to skip .env loading")]
    DotenvUnknown,
}
