//! Screen modes and launch parameter resolution.
//!
//! Responsibilities:
//! - Define the closed set of key list screen variants.
//! - Resolve launch parameters against the network into a `ScreenMode`.
//!
//! Invariants:
//! - Only the two node-restricted variants carry a bound key set, so a
//!   selection restriction cannot exist without a target node.
//! - The mode is fixed for the lifetime of a controller.

use meshkeys_config::{LaunchMode, LaunchParams};
use meshkeys_store::{AppKeyIndex, NetworkStore};
use serde::Serialize;

use crate::error::{ControllerError, Result};

/// Ordered, duplicate-free set of key indexes added to a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BoundKeySet(Vec<AppKeyIndex>);

impl BoundKeySet {
    pub fn new(indexes: impl IntoIterator<Item = AppKeyIndex>) -> Self {
        indexes.into_iter().collect()
    }

    pub fn contains(&self, index: AppKeyIndex) -> bool {
        self.0.contains(&index)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = AppKeyIndex> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<AppKeyIndex> for BoundKeySet {
    fn from_iter<I: IntoIterator<Item = AppKeyIndex>>(iter: I) -> Self {
        let mut indexes = Vec::new();
        for index in iter {
            if !indexes.contains(&index) {
                indexes.push(index);
            }
        }
        Self(indexes)
    }
}

/// The variant of the key list screen, chosen once at launch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ScreenMode {
    /// Full add, edit and remove over every key.
    ManageKeys,
    /// Browse every key; activating one returns it to the caller.
    AddKeyForSelection,
    /// Choose among keys added to `node`, for model binding.
    BindKeySelection { node: u16, bound: BoundKeySet },
    /// Choose among keys added to `node`, for model publication.
    PublicationKeySelection { node: u16, bound: BoundKeySet },
}

impl ScreenMode {
    /// Resolve launch parameters into a screen mode.
    ///
    /// The node-restricted modes read the target node's added key indexes
    /// from the store at this point.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::Configuration` when a node-restricted mode is
    /// requested without a target node, or the node is not in the network.
    pub fn resolve<S: NetworkStore + ?Sized>(params: &LaunchParams, store: &S) -> Result<Self> {
        match params.mode {
            LaunchMode::Manage => Ok(Self::ManageKeys),
            LaunchMode::Add => Ok(Self::AddKeyForSelection),
            LaunchMode::Bind | LaunchMode::Publication => {
                let address = params.target_node.ok_or_else(|| {
                    ControllerError::Configuration(format!(
                        "{} mode requires a target node",
                        params.mode
                    ))
                })?;
                let node = store.node(address).ok_or_else(|| {
                    ControllerError::Configuration(format!(
                        "target node 0x{address:04X} is not part of the network"
                    ))
                })?;
                let bound = BoundKeySet::new(node.added_app_key_indexes);
                Ok(if params.mode == LaunchMode::Bind {
                    Self::BindKeySelection {
                        node: address,
                        bound,
                    }
                } else {
                    Self::PublicationKeySelection {
                        node: address,
                        bound,
                    }
                })
            }
        }
    }

    /// The launch discriminant this mode was created from.
    pub fn kind(&self) -> LaunchMode {
        match self {
            Self::ManageKeys => LaunchMode::Manage,
            Self::AddKeyForSelection => LaunchMode::Add,
            Self::BindKeySelection { .. } => LaunchMode::Bind,
            Self::PublicationKeySelection { .. } => LaunchMode::Publication,
        }
    }

    /// Keys the screen is restricted to, if any.
    pub fn bound_keys(&self) -> Option<&BoundKeySet> {
        match self {
            Self::BindKeySelection { bound, .. } | Self::PublicationKeySelection { bound, .. } => {
                Some(bound)
            }
            Self::ManageKeys | Self::AddKeyForSelection => None,
        }
    }

    /// True when activating a key ends the screen with that key as result.
    pub fn is_selection(&self) -> bool {
        !matches!(self, Self::ManageKeys)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::ManageKeys => "Manage App Keys",
            _ => "Select App Key",
        }
    }
}
