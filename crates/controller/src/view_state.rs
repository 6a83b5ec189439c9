//! Derived view state for the key list screen.
//!
//! Invariants:
//! - The key list is a pure function of the screen mode and the store snapshot.
//! - `empty_state` is `Some` exactly when the key list is empty.

use meshkeys_store::ApplicationKey;
use serde::Serialize;

use crate::mode::ScreenMode;
use crate::pending::PendingRemoval;

/// Why the list is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyState {
    /// The network has no application keys.
    NoKeys,
    /// The target node has no application keys added.
    NoBoundKeys,
}

impl EmptyState {
    /// Text shown in place of the list.
    pub fn rationale(&self) -> &'static str {
        match self {
            Self::NoKeys => "No application keys have been created for this network.",
            Self::NoBoundKeys => {
                "No application keys have been added to this node. Add an application key to the node before binding or publishing."
            }
        }
    }
}

/// Everything the presenter needs to render the key list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub keys: Vec<ApplicationKey>,
    pub empty_state: Option<EmptyState>,
    pub pending_removal: Option<PendingRemoval>,
}

impl ViewState {
    /// Compute the view state for `mode` from a store snapshot.
    pub fn compute(
        mode: &ScreenMode,
        snapshot: &[ApplicationKey],
        pending_removal: Option<PendingRemoval>,
    ) -> Self {
        let keys: Vec<ApplicationKey> = match mode.bound_keys() {
            None => snapshot.to_vec(),
            Some(bound) => snapshot
                .iter()
                .filter(|key| bound.contains(key.index))
                .cloned()
                .collect(),
        };

        let empty_state = if !keys.is_empty() {
            None
        } else if mode.bound_keys().is_some() {
            Some(EmptyState::NoBoundKeys)
        } else {
            Some(EmptyState::NoKeys)
        };

        Self {
            keys,
            empty_state,
            pending_removal,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn key_at(&self, position: usize) -> Option<&ApplicationKey> {
        self.keys.get(position)
    }
}
