//! Provisioned node records and their key bindings.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};
use crate::key::AppKeyIndex;

/// Lowest valid unicast address.
pub const MIN_UNICAST_ADDRESS: u16 = 0x0001;

/// Highest valid unicast address.
pub const MAX_UNICAST_ADDRESS: u16 = 0x7FFF;

/// Whether an application key has been added to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingState {
    Bound,
    Unbound,
}

/// A node that has joined the mesh network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionedNode {
    /// Primary element unicast address.
    pub unicast_address: u16,
    pub name: String,
    /// Indexes of the application keys added to this node, in the order they were added.
    #[serde(default)]
    pub added_app_key_indexes: Vec<AppKeyIndex>,
}

impl ProvisionedNode {
    /// Create a node with no keys added.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidAddress` if the address is not a unicast address.
    pub fn new(unicast_address: u16, name: impl Into<String>) -> Result<Self> {
        check_unicast_address(unicast_address)?;
        Ok(Self {
            unicast_address,
            name: name.into(),
            added_app_key_indexes: Vec::new(),
        })
    }

    pub fn binding_of(&self, index: AppKeyIndex) -> BindingState {
        if self.added_app_key_indexes.contains(&index) {
            BindingState::Bound
        } else {
            BindingState::Unbound
        }
    }
}

pub(crate) fn check_unicast_address(address: u16) -> Result<()> {
    if (MIN_UNICAST_ADDRESS..=MAX_UNICAST_ADDRESS).contains(&address) {
        Ok(())
    } else {
        Err(StoreError::InvalidAddress(address))
    }
}
