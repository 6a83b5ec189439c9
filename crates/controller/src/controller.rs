//! Key list screen controller.
//!
//! Responsibilities:
//! - Turn presenter intents (activate, add, edit, swipe, undo) into store mutations.
//! - Recompute and publish the view state after every change, including changes
//!   committed by other screens sharing the store.
//! - Enforce the per-mode rules: only the manage screen mutates keys, every other
//!   screen ends with a selection result.
//! - Own the single outstanding undo token.
//!
//! Does NOT handle:
//! - Rendering, dialogs or gesture recognition (presenter side).
//! - Key storage and index assignment (see `meshkeys_store`).
//!
//! Invariants:
//! - A store mutation and the view state publish that follows it happen in the
//!   same call; presenters never observe a half-applied intent.
//! - At most one `PendingRemoval` exists. A newer removal finalizes the older one.
//! - Once a `ScreenResult` is reported, every further intent fails with `ScreenClosed`.

use meshkeys_config::LaunchParams;
use meshkeys_store::{AppKeyIndex, ApplicationKey, KeySnapshot, NetworkStore, StoreError};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::error::{ControllerError, Result};
use crate::event::{ControllerEvent, ScreenResult, SubscriptionId, Subscribers};
use crate::mode::ScreenMode;
use crate::pending::PendingRemoval;
use crate::view_state::ViewState;

/// Outcome of activating (tapping) a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// Manage mode: the edit flow was requested.
    EditRequested,
    /// Selection modes: the screen finished with this result.
    Selected(ScreenResult),
    /// The row did not match the model; the view state was republished.
    Resynced,
}

/// Outcome of an undo request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoOutcome {
    /// The key value was added back under this index.
    Restored(AppKeyIndex),
    /// The token was superseded, finalized or already used.
    AlreadyConsumed,
}

/// Controller for one instance of the application key list screen.
pub struct AppKeyListController<S: NetworkStore + ?Sized> {
    store: Arc<S>,
    mode: ScreenMode,
    undo_window: Duration,
    changes: watch::Receiver<KeySnapshot>,
    view: ViewState,
    pending: Option<PendingRemoval>,
    subscribers: Subscribers,
    result: Option<ScreenResult>,
}

impl<S: NetworkStore + ?Sized> fmt::Debug for AppKeyListController<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppKeyListController")
            .field("mode", &self.mode)
            .field("view", &self.view)
            .field("pending", &self.pending)
            .field("subscribers", &self.subscribers.len())
            .field("result", &self.result)
            .finish_non_exhaustive()
    }
}

impl<S: NetworkStore + ?Sized> AppKeyListController<S> {
    /// Create a controller from launch parameters.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::Configuration` if the parameters name a
    /// node-restricted mode without a resolvable target node.
    pub fn new(store: Arc<S>, params: &LaunchParams, undo_window: Duration) -> Result<Self> {
        let mode = ScreenMode::resolve(params, store.as_ref())?;
        Ok(Self::with_mode(store, mode, undo_window))
    }

    /// Create a controller for an already resolved mode.
    pub fn with_mode(store: Arc<S>, mode: ScreenMode, undo_window: Duration) -> Self {
        let changes = store.subscribe();
        let view = ViewState::compute(&mode, &store.app_keys(), None);
        debug!(mode = %mode.kind(), keys = view.len(), "Key list controller created");
        Self {
            store,
            mode,
            undo_window,
            changes,
            view,
            pending: None,
            subscribers: Subscribers::default(),
            result: None,
        }
    }

    /// Open a screen and attach `events` as its first presenter.
    ///
    /// On success the presenter immediately receives the initial view state.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new). The failure is also sent to `events` as
    /// `ControllerEvent::ConfigurationError`.
    pub fn launch(
        store: Arc<S>,
        params: &LaunchParams,
        undo_window: Duration,
        events: UnboundedSender<ControllerEvent>,
    ) -> Result<Self> {
        match Self::new(store, params, undo_window) {
            Ok(mut controller) => {
                controller.subscribers.attach(events);
                controller.refresh();
                Ok(controller)
            }
            Err(err) => {
                error!(mode = %params.mode, error = %err, "Key list screen failed to open");
                let _ = events.send(ControllerEvent::ConfigurationError {
                    reason: err.to_string(),
                });
                Err(err)
            }
        }
    }

    pub fn mode(&self) -> &ScreenMode {
        &self.mode
    }

    /// The last published view state.
    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn pending_removal(&self) -> Option<&PendingRemoval> {
        self.pending.as_ref()
    }

    /// The result, once the screen has finished.
    pub fn result(&self) -> Option<&ScreenResult> {
        self.result.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }

    /// Register a presenter.
    pub fn subscribe(&mut self) -> (SubscriptionId, UnboundedReceiver<ControllerEvent>) {
        self.subscribers.subscribe()
    }

    /// Remove a presenter. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Compute the view state from the current store contents without publishing it.
    pub fn compute_initial_view_state(&self) -> ViewState {
        ViewState::compute(&self.mode, &self.store.app_keys(), self.pending.clone())
    }

    /// Handle a tap on the row at `position` showing `key`.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::ScreenClosed` if the screen already finished.
    /// A row that does not match the model is not an error; see `Activation::Resynced`.
    pub fn on_item_activated(
        &mut self,
        position: usize,
        key: &ApplicationKey,
    ) -> Result<Activation> {
        self.ensure_open()?;
        self.sync_with_store();

        if self.view.key_at(position) != Some(key) {
            warn!(
                position,
                index = %key.index,
                len = self.view.len(),
                "Activated row does not match the key list, resyncing"
            );
            self.refresh();
            return Ok(Activation::Resynced);
        }

        if self.mode.is_selection() {
            let result = ScreenResult::Selected {
                position,
                key: key.clone(),
            };
            info!(position, index = %key.index, "App key selected");
            self.finish_with(result.clone());
            Ok(Activation::Selected(result))
        } else {
            self.publish(ControllerEvent::EditRequested {
                position,
                key: key.clone(),
            });
            Ok(Activation::EditRequested)
        }
    }

    /// Add a key entered by the user.
    ///
    /// # Errors
    ///
    /// `InvalidKeyFormat`, `DuplicateKey`, `OperationNotAllowed` outside the manage
    /// screen, or `ScreenClosed`.
    pub fn on_app_key_added(&mut self, raw: &str) -> Result<AppKeyIndex> {
        self.ensure_open()?;
        self.ensure_manage("add")?;
        self.add_key(raw)
    }

    /// Replace the value of the key shown at `position`.
    ///
    /// # Errors
    ///
    /// `StaleReference` if `position` no longer resolves to a key, plus the
    /// errors of [`on_app_key_added`](Self::on_app_key_added).
    pub fn on_app_key_edited(&mut self, position: usize, raw: &str) -> Result<()> {
        self.ensure_open()?;
        self.ensure_manage("edit")?;
        let key = self.resolve(position)?;

        match self.store.update_app_key(key.index, raw) {
            Ok(()) => {
                self.refresh();
                Ok(())
            }
            Err(StoreError::NotFound(_)) => Err(self.stale(position)),
            Err(e) => Err(self.reject(e.into())),
        }
    }

    /// Remove the key shown at `position` and offer an undo for it.
    ///
    /// `position` refers to the last published view state. If another screen
    /// removed or changed that key meanwhile, nothing is removed.
    /// The key is gone from the store before the undo offer is published.
    ///
    /// # Errors
    ///
    /// `StaleReference` if `position` no longer resolves to a key,
    /// `OperationNotAllowed` outside the manage screen, or `ScreenClosed`.
    pub fn on_item_swipe_dismissed(&mut self, position: usize) -> Result<PendingRemoval> {
        self.ensure_open()?;
        self.ensure_manage("remove")?;
        let key = self.resolve(position)?;

        match self.store.remove_app_key(&key) {
            Ok(()) => {}
            Err(StoreError::NotFound(_)) => return Err(self.stale(position)),
            Err(e) => return Err(self.reject(e.into())),
        }

        if let Some(previous) = self.pending.take() {
            debug!(id = %previous.id, "Pending removal superseded");
            self.publish(ControllerEvent::RemovalFinalized(previous));
        }

        let pending = PendingRemoval::new(key, position, self.undo_window);
        info!(id = %pending.id, index = %pending.key.index, position, "App key removed, undo offered");
        self.pending = Some(pending.clone());
        self.refresh();
        self.publish(ControllerEvent::UndoOffered(pending.clone()));
        Ok(pending)
    }

    /// Restore a removed key by adding its value again.
    ///
    /// The restored key goes through the normal add path and may get a new index.
    ///
    /// # Errors
    ///
    /// Errors of the add path (e.g. `DuplicateKey` if the value was re-added
    /// elsewhere meanwhile), or `ScreenClosed`. A consumed token is not an error.
    pub fn on_undo_requested(&mut self, token: &PendingRemoval) -> Result<UndoOutcome> {
        self.ensure_open()?;
        let current = match &self.pending {
            Some(pending) if pending.id == token.id => pending,
            _ => {
                debug!(id = %token.id, "Undo requested for a consumed token");
                return Ok(UndoOutcome::AlreadyConsumed);
            }
        };

        if current.is_expired() {
            self.finalize_removal();
            return Ok(UndoOutcome::AlreadyConsumed);
        }

        let Some(pending) = self.pending.take() else {
            return Ok(UndoOutcome::AlreadyConsumed);
        };
        let index = self.add_key(&pending.key.key)?;
        info!(id = %pending.id, %index, "App key restored");
        Ok(UndoOutcome::Restored(index))
    }

    /// Acknowledge a swipe that did not complete. Never changes state.
    pub fn on_swipe_dismiss_rejected(&self, position: usize) {
        debug!(position, "Swipe dismiss rejected");
    }

    /// Make the outstanding removal final, closing its undo window.
    pub fn finalize_removal(&mut self) -> Option<PendingRemoval> {
        let pending = self.pending.take()?;
        debug!(id = %pending.id, "Pending removal finalized");
        self.refresh();
        self.publish(ControllerEvent::RemovalFinalized(pending.clone()));
        Some(pending)
    }

    /// Finalize the outstanding removal if its undo window has elapsed.
    pub fn expire_pending(&mut self) -> Option<PendingRemoval> {
        if self.pending.as_ref().is_some_and(PendingRemoval::is_expired) {
            self.finalize_removal()
        } else {
            None
        }
    }

    /// Republish the view state if the store changed since the last publish.
    ///
    /// Returns true if a new view state was published.
    pub fn sync_with_store(&mut self) -> bool {
        if self.changes.has_changed().unwrap_or(false) {
            self.refresh();
            true
        } else {
            false
        }
    }

    /// Wait for the next store change and republish.
    ///
    /// Returns false once the store is gone.
    pub async fn store_changed(&mut self) -> bool {
        if self.changes.changed().await.is_err() {
            return false;
        }
        self.refresh();
        true
    }

    /// Leave the screen and report its result.
    ///
    /// The manage screen reports how many keys it lists; a selection screen left
    /// without choosing reports `Cancelled`. An outstanding removal becomes final.
    pub fn finish(&mut self) -> ScreenResult {
        if let Some(result) = &self.result {
            return result.clone();
        }
        self.finalize_removal();
        self.sync_with_store();
        let result = if self.mode.is_selection() {
            ScreenResult::Cancelled
        } else {
            ScreenResult::KeyCount {
                count: self.view.len(),
            }
        };
        self.finish_with(result.clone());
        result
    }

    fn add_key(&mut self, raw: &str) -> Result<AppKeyIndex> {
        match self.store.add_app_key(raw) {
            Ok(index) => {
                self.refresh();
                Ok(index)
            }
            Err(e) => Err(self.reject(e.into())),
        }
    }

    /// Look up the row the user acted on in the view they were shown.
    fn resolve(&mut self, position: usize) -> Result<ApplicationKey> {
        match self.view.key_at(position) {
            Some(key) => Ok(key.clone()),
            None => Err(self.stale(position)),
        }
    }

    fn refresh(&mut self) -> &ViewState {
        self.changes.mark_unchanged();
        self.view = self.compute_initial_view_state();
        debug!(
            keys = self.view.len(),
            empty = ?self.view.empty_state,
            pending = self.pending.is_some(),
            "View state recomputed"
        );
        self.publish(ControllerEvent::ViewStateChanged(self.view.clone()));
        &self.view
    }

    fn stale(&mut self, position: usize) -> ControllerError {
        let len = self.view.len();
        warn!(position, len, "Stale key list reference, resyncing");
        self.refresh();
        ControllerError::StaleReference { position, len }
    }

    fn reject(&mut self, err: ControllerError) -> ControllerError {
        if err.is_user_facing() {
            info!(error = %err, "Intent rejected");
            self.publish(ControllerEvent::Rejected {
                reason: err.to_string(),
            });
        }
        err
    }

    fn ensure_open(&self) -> Result<()> {
        if self.result.is_some() {
            return Err(ControllerError::ScreenClosed);
        }
        Ok(())
    }

    fn ensure_manage(&mut self, operation: &'static str) -> Result<()> {
        if self.mode.is_selection() {
            return Err(self.reject(ControllerError::OperationNotAllowed {
                operation,
                mode: self.mode.kind(),
            }));
        }
        Ok(())
    }

    fn finish_with(&mut self, result: ScreenResult) {
        self.result = Some(result.clone());
        self.publish(ControllerEvent::Finished(result));
    }

    fn publish(&mut self, event: ControllerEvent) {
        self.subscribers.publish(&event);
    }
}
