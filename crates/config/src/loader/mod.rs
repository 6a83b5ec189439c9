//! Configuration loader for environment variables and builder overrides.
//!
//! Responsibilities:
//! - Provide a builder-pattern `ConfigLoader` for layered configuration.
//! - Read `MESHKEYS_*` environment variables.
//! - Enforce the `DOTENV_DISABLED` gate before any `.env` loading.
//!
//! Does NOT handle:
//! - Reading or writing the network document (see the store crate).
//!
//! Invariants / Assumptions:
//! - Builder setters take precedence over environment variables.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.

mod builder;
mod env;
mod error;
mod path;


pub use builder::ConfigLoader;
pub use env::env_var_or_none;
pub use error::ConfigError;
pub use path::default_network_path;
