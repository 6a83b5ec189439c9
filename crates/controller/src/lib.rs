//! Application key list controller.
//!
//! This crate drives the screen that lists a mesh network's application keys.
//! It resolves the screen mode from launch parameters, applies user intents
//! to a [`NetworkStore`](meshkeys_store::NetworkStore), keeps the derived
//! [`ViewState`] current and reports results to presenters through an
//! event channel.

mod controller;
pub mod error;
pub mod event;
pub mod mode;
pub mod pending;
pub mod view_state;

pub use controller::{Activation, AppKeyListController, UndoOutcome};
pub use error::{ControllerError, Result};
pub use event::{ControllerEvent, ScreenResult, SubscriptionId};
pub use mode::{BoundKeySet, ScreenMode};
pub use pending::PendingRemoval;
pub use view_state::{EmptyState, ViewState};
