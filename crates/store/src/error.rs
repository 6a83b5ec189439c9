//! Error types for the mesh network store.

use std::path::PathBuf;
use thiserror::Error;

use crate::key::AppKeyIndex;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while reading or mutating the mesh network.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The supplied value is not a 16-byte hex key.
    #[error("Invalid application key format: {0}")]
    InvalidKeyFormat(String),

    /// An application key with the same value already exists.
    #[error("Application key already exists: {0}")]
    DuplicateKey(String),

    /// No application key with this index exists.
    #[error("Application key {0} not found")]
    NotFound(AppKeyIndex),

    /// All 4096 application key indexes are in use.
    #[error("No free application key index left")]
    KeyIndexExhausted,

    /// No provisioned node with this unicast address.
    #[error("Node 0x{0:04X} not found")]
    NodeNotFound(u16),

    /// A node with this unicast address already exists.
    #[error("Node 0x{0:04X} already exists")]
    DuplicateNode(u16),

    /// Unicast address outside the valid range.
    #[error("Invalid unicast address 0x{0:04X}")]
    InvalidAddress(u16),

    /// The persisted network violates a store invariant.
    #[error("Corrupt network file: {0}")]
    CorruptNetwork(String),

    /// Failed to parse the network file.
    #[error("Failed to parse network file at {path}")]
    Parse { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Check if this error was caused by malformed or conflicting user input.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidKeyFormat(_) | Self::DuplicateKey(_) | Self::InvalidAddress(_)
        )
    }

    /// Check if this error refers to something that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::NodeNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_validation_error() {
        let err = StoreError::InvalidKeyFormat("xyz".to_string());
        assert!(err.is_validation_error());

        let err = StoreError::DuplicateKey("00".repeat(16));
        assert!(err.is_validation_error());

        let err = StoreError::NotFound(AppKeyIndex::new(3).unwrap());
        assert!(!err.is_validation_error());
    }

    #[test]
    fn test_error_is_not_found() {
        assert!(StoreError::NotFound(AppKeyIndex::new(0).unwrap()).is_not_found());
        assert!(StoreError::NodeNotFound(2).is_not_found());
        assert!(!StoreError::KeyIndexExhausted.is_not_found());
    }

    #[test]
    fn test_node_address_display_is_hex() {
        let err = StoreError::NodeNotFound(0x1a);
        assert_eq!(err.to_string(), "Node 0x001A not found");
    }
}
