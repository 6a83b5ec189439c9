//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish error types.
//! - Map controller, store and configuration errors to exit codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//!
//! Invariants:
//! - Exit codes 1-9 are reserved for specific error categories.

use meshkeys_config::ConfigError;
use meshkeys_controller::ControllerError;
use meshkeys_store::StoreError;

/// Structured exit codes for meshkeys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success - command completed successfully.
    Success = 0,

    /// General error - unhandled or generic failure.
    GeneralError = 1,

    /// Configuration error - bad environment, launch mode or target node.
    ///
    /// Scripts should fix the invocation; retrying will not help.
    ConfigurationError = 2,

    /// Not found - unknown key index or node, or a position that no longer
    /// matches the key list.
    NotFound = 4,

    /// Validation error - malformed or duplicate key, or an operation the
    /// current mode does not offer.
    ValidationError = 5,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

impl From<&StoreError> for ExitCode {
    fn from(err: &StoreError) -> Self {
        match err {
            StoreError::InvalidKeyFormat(_)
            | StoreError::DuplicateKey(_)
            | StoreError::DuplicateNode(_)
            | StoreError::InvalidAddress(_) => ExitCode::ValidationError,

            StoreError::NotFound(_) | StoreError::NodeNotFound(_) => ExitCode::NotFound,

            StoreError::KeyIndexExhausted
            | StoreError::CorruptNetwork(_)
            | StoreError::Parse { .. }
            | StoreError::Io(_) => ExitCode::GeneralError,
        }
    }
}

impl From<&ControllerError> for ExitCode {
    fn from(err: &ControllerError) -> Self {
        match err {
            ControllerError::InvalidKeyFormat(_)
            | ControllerError::DuplicateKey(_)
            | ControllerError::OperationNotAllowed { .. } => ExitCode::ValidationError,
            ControllerError::StaleReference { .. } => ExitCode::NotFound,
            ControllerError::Configuration(_) => ExitCode::ConfigurationError,
            ControllerError::ScreenClosed => ExitCode::GeneralError,
            ControllerError::Store(inner) => Self::from(inner),
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Extract the appropriate exit code from this error.
    ///
    /// Returns ExitCode::GeneralError if no known error type is in the chain.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        for cause in self.chain() {
            if let Some(err) = cause.downcast_ref::<ControllerError>() {
                return ExitCode::from(err);
            }
            if let Some(err) = cause.downcast_ref::<StoreError>() {
                return ExitCode::from(err);
            }
            if cause.downcast_ref::<ConfigError>().is_some() {
                return ExitCode::ConfigurationError;
            }
        }
        ExitCode::GeneralError
    }
}
