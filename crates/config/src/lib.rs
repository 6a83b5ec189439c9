//! Configuration management for the mesh key tools.
//!
//! This crate provides the key list screen launch parameters and loaders
//! for runtime configuration from builder calls, environment variables
//! and an optional `.env` file.

pub mod constants;
mod loader;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, default_network_path, env_var_or_none};
pub use types::{Config, LaunchMode, LaunchParams, parse_unicast_address};
