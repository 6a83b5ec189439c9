//! Centralized constants for the mesh keys workspace.
//!
//! This module contains default values used across crates to avoid
//! magic number duplication.

// =============================================================================
// Undo Window
// =============================================================================

/// Default time a removed key can still be restored, in milliseconds.
/// Matches the duration of a long transient notification.
pub const DEFAULT_UNDO_WINDOW_MS: u64 = 2750;

/// Maximum allowed undo window in milliseconds (1 minute).
pub const MAX_UNDO_WINDOW_MS: u64 = 60_000;

// =============================================================================
// Paths
// =============================================================================

/// Application name used for platform data directories.
pub const APP_NAME: &str = "meshkeys";

/// File name of the network document inside the data directory.
pub const NETWORK_FILE_NAME: &str = "network.json";

// =============================================================================
// Environment Variables
// =============================================================================

pub const ENV_NETWORK_PATH: &str = "MESHKEYS_NETWORK_PATH";
pub const ENV_MODE: &str = "MESHKEYS_MODE";
pub const ENV_TARGET_NODE: &str = "MESHKEYS_TARGET_NODE";
pub const ENV_UNDO_WINDOW_MS: &str = "MESHKEYS_UNDO_WINDOW_MS";
