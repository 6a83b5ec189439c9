//! Application key model and key-format validation.
//!
//! Responsibilities:
//! - Define the 12-bit `AppKeyIndex` and the `ApplicationKey` record.
//! - Validate and normalize raw key input (32 hex digits, 16 bytes).
//! - Generate random key values for the add flow.
//!
//! Invariants:
//! - An `AppKeyIndex` is always within 0..=0x0FFF.
//! - `ApplicationKey::key` is always 32 upper-case hex digits.

use rand::RngExt;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, StoreError};

/// Number of bytes in an application key.
pub const APP_KEY_LENGTH: usize = 16;

/// Highest key index representable in a mesh key index field (12 bits).
pub const MAX_APP_KEY_INDEX: u16 = 0x0FFF;

/// Index of an application key within the mesh network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct AppKeyIndex(u16);

impl AppKeyIndex {
    /// Returns `None` when `value` does not fit in 12 bits.
    pub const fn new(value: u16) -> Option<Self> {
        if value <= MAX_APP_KEY_INDEX {
            Some(Self(value))
        } else {
            None
        }
    }

    pub const fn value(self) -> u16 {
        self.0
    }
}

impl TryFrom<u16> for AppKeyIndex {
    type Error = StoreError;

    fn try_from(value: u16) -> Result<Self> {
        Self::new(value).ok_or_else(|| {
            StoreError::CorruptNetwork(format!("key index {value} exceeds {MAX_APP_KEY_INDEX}"))
        })
    }
}

impl From<AppKeyIndex> for u16 {
    fn from(index: AppKeyIndex) -> Self {
        index.0
    }
}

impl fmt::Display for AppKeyIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A network application key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationKey {
    /// Index assigned by the store. Stable while the key exists.
    pub index: AppKeyIndex,
    /// Normalized key value.
    pub key: String,
}

impl ApplicationKey {
    pub fn new(index: AppKeyIndex, key: impl Into<String>) -> Self {
        Self {
            index,
            key: key.into(),
        }
    }

    /// True when `raw` normalizes to this key's value.
    pub fn has_value(&self, raw: &str) -> bool {
        self.key.eq_ignore_ascii_case(raw.trim())
    }
}

/// Validate a raw key value and return its normalized form.
///
/// Surrounding whitespace is ignored. The value must decode to exactly
/// 16 bytes of hex.
///
/// # Errors
///
/// Returns `StoreError::InvalidKeyFormat` if the value is not 32 hex digits.
pub fn validate_app_key(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let bytes =
        hex::decode(trimmed).map_err(|_| StoreError::InvalidKeyFormat(trimmed.to_string()))?;
    if bytes.len() != APP_KEY_LENGTH {
        return Err(StoreError::InvalidKeyFormat(trimmed.to_string()));
    }
    Ok(hex::encode_upper(bytes))
}

/// Generate a random application key value.
pub fn generate_app_key() -> String {
    let mut key = [0u8; APP_KEY_LENGTH];
    rand::rng().fill(&mut key);
    hex::encode_upper(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_key_index_bounds() {
        assert!(AppKeyIndex::new(0).is_some());
        assert!(AppKeyIndex::new(MAX_APP_KEY_INDEX).is_some());
        assert!(AppKeyIndex::new(MAX_APP_KEY_INDEX + 1).is_none());
    }

    #[test]
    fn test_validate_normalizes_case_and_whitespace() {
        let key = validate_app_key("  5f5b3e6a5c4d3e2f1a0b9c8d7e6f5a4b \n").unwrap();
        assert_eq!(key, "5F5B3E6A5C4D3E2F1A0B9C8D7E6F5A4B");
    }

    #[test]
    fn test_validate_rejects_wrong_length() {
        assert!(matches!(
            validate_app_key("AABB"),
            Err(StoreError::InvalidKeyFormat(_))
        ));
        assert!(matches!(
            validate_app_key(&"AA".repeat(17)),
            Err(StoreError::InvalidKeyFormat(_))
        ));
        assert!(matches!(
            validate_app_key(""),
            Err(StoreError::InvalidKeyFormat(_))
        ));
    }

    #[test]
    fn test_validate_rejects_non_hex() {
        let raw = format!("{}ZZ", "AA".repeat(15));
        assert!(matches!(
            validate_app_key(&raw),
            Err(StoreError::InvalidKeyFormat(_))
        ));
    }

    #[test]
    fn test_generated_key_is_valid() {
        let key = generate_app_key();
        assert_eq!(validate_app_key(&key).unwrap(), key);
    }

    #[test]
    fn test_has_value_ignores_case() {
        let key = ApplicationKey::new(AppKeyIndex::new(1).unwrap(), "AA".repeat(16));
        assert!(key.has_value(&"aa".repeat(16)));
        assert!(!key.has_value(&"BB".repeat(16)));
    }

    #[test]
    fn test_index_deserialize_rejects_out_of_range() {
        let result: std::result::Result<AppKeyIndex, _> = serde_json::from_str("4096");
        assert!(result.is_err());
        let index: AppKeyIndex = serde_json::from_str("4095").unwrap();
        assert_eq!(index.value(), 4095);
    }
}
