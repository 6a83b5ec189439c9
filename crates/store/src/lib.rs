//! Mesh network store for application key management.
//!
//! This crate holds the canonical list of network application keys and
//! provisioned nodes, validates key input, assigns key indexes and
//! notifies observers whenever the key list changes.

pub mod error;
pub mod key;
pub mod network;
pub mod node;
pub mod persistence;

pub use error::{Result, StoreError};
pub use key::{
    APP_KEY_LENGTH, AppKeyIndex, ApplicationKey, MAX_APP_KEY_INDEX, generate_app_key,
    validate_app_key,
};
pub use network::{KeySnapshot, MeshNetworkStore, NetworkState, NetworkStore};
pub use node::{BindingState, MAX_UNICAST_ADDRESS, MIN_UNICAST_ADDRESS, ProvisionedNode};
pub use persistence::NetworkFile;
