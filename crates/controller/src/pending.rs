//! One-shot undo token for a removed key.

use meshkeys_store::ApplicationKey;
use serde::Serialize;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// A key that was removed from the network and can still be restored once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingRemoval {
    /// Unique identifier; a newer removal always carries a different id.
    pub id: Uuid,
    /// The key as it was before removal.
    pub key: ApplicationKey,
    /// Position the key occupied in the displayed list.
    pub position: usize,
    #[serde(skip)]
    pub created_at: Instant,
    #[serde(skip)]
    pub ttl: Duration,
}

impl PendingRemoval {
    pub fn new(key: ApplicationKey, position: usize, ttl: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            key,
            position,
            created_at: Instant::now(),
            ttl,
        }
    }

    /// Returns true if the undo window has elapsed.
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.ttl
    }

    /// Returns the time left in the undo window.
    pub fn remaining(&self) -> Duration {
        self.ttl.saturating_sub(self.created_at.elapsed())
    }
}
