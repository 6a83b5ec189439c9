//! In-memory mesh network store with change observation.
//!
//! Responsibilities:
//! - Hold the canonical, insertion-ordered list of application keys.
//! - Assign key indexes and reject duplicate or malformed values.
//! - Track provisioned nodes and the application keys bound to them.
//! - Publish the full key sequence to observers after every committed key mutation.
//!
//! Does NOT handle:
//! - Reading or writing the network file (see `persistence`).
//! - Any screen or selection logic (see the controller crate).
//!
//! Invariants:
//! - Key indexes and key values are unique within the store.
//! - Writers are serialized by the state lock, and each publish happens while the
//!   writer still holds it, so observers never see snapshots out of commit order.
//! - A removed key is unbound from every node in the same commit.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::key::{AppKeyIndex, ApplicationKey, MAX_APP_KEY_INDEX, validate_app_key};
use crate::node::{ProvisionedNode, check_unicast_address};

/// Ordered key sequence delivered to observers.
pub type KeySnapshot = Vec<ApplicationKey>;

/// Operations the key list screen needs from the mesh network.
pub trait NetworkStore: Send + Sync {
    /// All application keys in insertion order.
    fn app_keys(&self) -> KeySnapshot;

    /// Validate and append a key, returning the index assigned to it.
    ///
    /// # Errors
    ///
    /// `InvalidKeyFormat`, `DuplicateKey` or `KeyIndexExhausted`.
    fn add_app_key(&self, raw: &str) -> Result<AppKeyIndex>;

    /// Replace the value of the key at `index`.
    ///
    /// # Errors
    ///
    /// `NotFound`, `InvalidKeyFormat` or `DuplicateKey`.
    fn update_app_key(&self, index: AppKeyIndex, raw: &str) -> Result<()>;

    /// Remove a key. Both index and value must match a stored key.
    ///
    /// # Errors
    ///
    /// `NotFound` if no stored key matches.
    fn remove_app_key(&self, key: &ApplicationKey) -> Result<()>;

    /// Observe key changes. Only the latest snapshot is retained.
    fn subscribe(&self) -> watch::Receiver<KeySnapshot>;

    /// Look up a provisioned node by unicast address.
    fn node(&self, address: u16) -> Option<ProvisionedNode>;
}

/// Serializable contents of a mesh network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkState {
    #[serde(default)]
    pub app_keys: Vec<ApplicationKey>,
    #[serde(default)]
    pub nodes: Vec<ProvisionedNode>,
    /// Next index handed out by the monotonic allocator.
    #[serde(default)]
    pub next_key_index: u16,
}

impl NetworkState {
    /// Check the store invariants.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::CorruptNetwork` describing the first violation found.
    pub fn validate(&self) -> Result<()> {
        let mut indexes = HashSet::new();
        let mut values = HashSet::new();
        for key in &self.app_keys {
            let normalized = validate_app_key(&key.key).map_err(|_| {
                StoreError::CorruptNetwork(format!("key {} has an invalid value", key.index))
            })?;
            if !indexes.insert(key.index) {
                return Err(StoreError::CorruptNetwork(format!(
                    "duplicate key index {}",
                    key.index
                )));
            }
            if !values.insert(normalized) {
                return Err(StoreError::CorruptNetwork(format!(
                    "duplicate key value at index {}",
                    key.index
                )));
            }
        }

        let mut addresses = HashSet::new();
        for node in &self.nodes {
            check_unicast_address(node.unicast_address)
                .map_err(|e| StoreError::CorruptNetwork(e.to_string()))?;
            if !addresses.insert(node.unicast_address) {
                return Err(StoreError::CorruptNetwork(format!(
                    "duplicate node address 0x{:04X}",
                    node.unicast_address
                )));
            }
        }
        Ok(())
    }

    fn position_of(&self, index: AppKeyIndex) -> Option<usize> {
        self.app_keys.iter().position(|k| k.index == index)
    }

    fn value_taken(&self, value: &str, except: Option<AppKeyIndex>) -> bool {
        self.app_keys
            .iter()
            .any(|k| Some(k.index) != except && k.has_value(value))
    }

    fn index_in_use(&self, index: AppKeyIndex) -> bool {
        self.position_of(index).is_some()
    }

    /// Hand out the next free index, scanning upward from the counter and
    /// wrapping to the lowest free index once the counter passes the 12-bit range.
    fn allocate_index(&mut self) -> Result<AppKeyIndex> {
        let start = self.next_key_index.min(MAX_APP_KEY_INDEX + 1);
        let found = (start..=MAX_APP_KEY_INDEX)
            .chain(0..start)
            .filter_map(AppKeyIndex::new)
            .find(|index| !self.index_in_use(*index))
            .ok_or(StoreError::KeyIndexExhausted)?;
        self.next_key_index = found.value() + 1;
        Ok(found)
    }

    fn node_mut(&mut self, address: u16) -> Result<&mut ProvisionedNode> {
        self.nodes
            .iter_mut()
            .find(|n| n.unicast_address == address)
            .ok_or(StoreError::NodeNotFound(address))
    }
}

/// Thread-safe in-memory implementation of [`NetworkStore`].
#[derive(Debug)]
pub struct MeshNetworkStore {
    state: RwLock<NetworkState>,
    changes: watch::Sender<KeySnapshot>,
}

impl Default for MeshNetworkStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshNetworkStore {
    /// Create an empty network.
    pub fn new() -> Self {
        let (changes, _) = watch::channel(Vec::new());
        Self {
            state: RwLock::new(NetworkState::default()),
            changes,
        }
    }

    /// Create a store from previously persisted state.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::CorruptNetwork` if the state violates a store invariant.
    pub fn from_state(state: NetworkState) -> Result<Self> {
        state.validate()?;
        let (changes, _) = watch::channel(state.app_keys.clone());
        Ok(Self {
            state: RwLock::new(state),
            changes,
        })
    }

    /// Copy of the full network contents, for persistence.
    pub fn snapshot(&self) -> NetworkState {
        self.read().clone()
    }

    pub fn nodes(&self) -> Vec<ProvisionedNode> {
        self.read().nodes.clone()
    }

    /// Register a provisioned node.
    ///
    /// # Errors
    ///
    /// `InvalidAddress` or `DuplicateNode`.
    pub fn add_node(&self, address: u16, name: &str) -> Result<()> {
        let node = ProvisionedNode::new(address, name)?;
        let mut state = self.write();
        if state.nodes.iter().any(|n| n.unicast_address == address) {
            return Err(StoreError::DuplicateNode(address));
        }
        state.nodes.push(node);
        info!(address, name, "Node added");
        Ok(())
    }

    /// Mark an application key as added to a node. Binding twice is a no-op.
    ///
    /// # Errors
    ///
    /// `NodeNotFound` or `NotFound` when the key index is unknown.
    pub fn bind_app_key(&self, address: u16, index: AppKeyIndex) -> Result<()> {
        let mut state = self.write();
        if !state.index_in_use(index) {
            return Err(StoreError::NotFound(index));
        }
        let node = state.node_mut(address)?;
        if !node.added_app_key_indexes.contains(&index) {
            node.added_app_key_indexes.push(index);
            info!(address, %index, "App key bound to node");
        }
        Ok(())
    }

    /// Remove an application key from a node.
    ///
    /// # Errors
    ///
    /// `NodeNotFound`, or `NotFound` when the key is not bound to the node.
    pub fn unbind_app_key(&self, address: u16, index: AppKeyIndex) -> Result<()> {
        let mut state = self.write();
        let node = state.node_mut(address)?;
        let before = node.added_app_key_indexes.len();
        node.added_app_key_indexes.retain(|i| *i != index);
        if node.added_app_key_indexes.len() == before {
            return Err(StoreError::NotFound(index));
        }
        info!(address, %index, "App key unbound from node");
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, NetworkState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, NetworkState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &NetworkState) {
        debug!(count = state.app_keys.len(), "Publishing app key snapshot");
        self.changes.send_replace(state.app_keys.clone());
    }
}

impl NetworkStore for MeshNetworkStore {
    fn app_keys(&self) -> KeySnapshot {
        self.read().app_keys.clone()
    }

    fn add_app_key(&self, raw: &str) -> Result<AppKeyIndex> {
        let value = validate_app_key(raw)?;
        let mut state = self.write();
        if state.value_taken(&value, None) {
            return Err(StoreError::DuplicateKey(value));
        }
        let index = state.allocate_index()?;
        state.app_keys.push(ApplicationKey::new(index, value));
        info!(%index, "App key added");
        self.publish(&state);
        Ok(index)
    }

    fn update_app_key(&self, index: AppKeyIndex, raw: &str) -> Result<()> {
        let value = validate_app_key(raw)?;
        let mut state = self.write();
        let position = state.position_of(index).ok_or(StoreError::NotFound(index))?;
        if state.value_taken(&value, Some(index)) {
            return Err(StoreError::DuplicateKey(value));
        }
        state.app_keys[position].key = value;
        info!(%index, "App key updated");
        self.publish(&state);
        Ok(())
    }

    fn remove_app_key(&self, key: &ApplicationKey) -> Result<()> {
        let mut state = self.write();
        let position = state
            .app_keys
            .iter()
            .position(|k| k.index == key.index && k.has_value(&key.key))
            .ok_or(StoreError::NotFound(key.index))?;
        state.app_keys.remove(position);
        for node in &mut state.nodes {
            node.added_app_key_indexes.retain(|i| *i != key.index);
        }
        info!(index = %key.index, "App key removed");
        self.publish(&state);
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<KeySnapshot> {
        self.changes.subscribe()
    }

    fn node(&self, address: u16) -> Option<ProvisionedNode> {
        self.read()
            .nodes
            .iter()
            .find(|n| n.unicast_address == address)
            .cloned()
    }
}
