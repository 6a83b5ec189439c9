//! Shared fixtures for controller integration tests.

#![allow(dead_code)]

use meshkeys_controller::{AppKeyListController, ControllerEvent, ScreenMode};
use meshkeys_store::{MeshNetworkStore, NetworkStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

pub const UNDO_WINDOW: Duration = Duration::from_secs(60);

/// A 16-byte key value made of one repeated byte.
pub fn key(byte: u8) -> String {
    format!("{byte:02X}").repeat(16)
}

/// A store holding keys A (0xA1) and B (0xB2), added in that order.
pub fn store_with_a_and_b() -> Arc<MeshNetworkStore> {
    let store = Arc::new(MeshNetworkStore::new());
    store.add_app_key(&key(0xA1)).unwrap();
    store.add_app_key(&key(0xB2)).unwrap();
    store
}

pub fn controller(
    store: &Arc<MeshNetworkStore>,
    mode: ScreenMode,
) -> AppKeyListController<MeshNetworkStore> {
    AppKeyListController::with_mode(Arc::clone(store), mode, UNDO_WINDOW)
}

pub fn drain(rx: &mut UnboundedReceiver<ControllerEvent>) -> Vec<ControllerEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
