//! Error types for the key list controller.

use meshkeys_config::LaunchMode;
use meshkeys_store::StoreError;
use thiserror::Error;

/// Result type alias for controller operations.
pub type Result<T> = std::result::Result<T, ControllerError>;

/// Errors reported by [`AppKeyListController`](crate::AppKeyListController) operations.
#[derive(Error, Debug)]
pub enum ControllerError {
    /// User input is not a well-formed key value.
    #[error("Invalid application key: {0}")]
    InvalidKeyFormat(String),

    /// The network already holds a key with this value.
    #[error("Application key already exists: {0}")]
    DuplicateKey(String),

    /// The presenter referred to a row that no longer matches the model.
    #[error("Position {position} does not match the displayed list ({len} keys)")]
    StaleReference { position: usize, len: usize },

    /// Launch parameters cannot produce a valid screen.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The intent is not offered in the current screen mode.
    #[error("{operation} is not available in {mode} mode")]
    OperationNotAllowed {
        operation: &'static str,
        mode: LaunchMode,
    },

    /// A result was already reported for this screen.
    #[error("The key list screen has already finished")]
    ScreenClosed,

    #[error(transparent)]
    Store(StoreError),
}

impl ControllerError {
    /// Whether the presenter should show this error as a rejection message.
    ///
    /// Stale references are repaired by re-rendering and never shown.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, Self::StaleReference { .. })
    }
}

impl From<StoreError> for ControllerError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::InvalidKeyFormat(value) => Self::InvalidKeyFormat(value),
            StoreError::DuplicateKey(value) => Self::DuplicateKey(value),
            other => Self::Store(other),
        }
    }
}
