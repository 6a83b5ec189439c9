//! Event protocol between the controller and its presenters.
//!
//! Presenters subscribe to an unbounded channel and render whatever arrives.
//! Events are delivered in the order the controller produced them.

use meshkeys_store::ApplicationKey;
use serde::Serialize;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::pending::PendingRemoval;
use crate::view_state::ViewState;

/// Value a finished screen hands back to whoever opened it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ScreenResult {
    /// A key was chosen in one of the selection modes.
    Selected {
        position: usize,
        key: ApplicationKey,
    },
    /// The manage screen was left; `count` keys remained listed.
    KeyCount { count: usize },
    /// A selection screen was left without choosing.
    Cancelled,
}

/// Notification delivered to presenters.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    /// Re-render the list.
    ViewStateChanged(ViewState),
    /// Open the edit flow for a key.
    EditRequested {
        position: usize,
        key: ApplicationKey,
    },
    /// Offer an undo affordance for a removed key.
    UndoOffered(PendingRemoval),
    /// The undo window closed; the removal is final.
    RemovalFinalized(PendingRemoval),
    /// Show a transient rejection message. No state changed.
    Rejected { reason: String },
    /// The screen produced its result and accepts no further intents.
    Finished(ScreenResult),
    /// Launch parameters were unusable; the screen never opened.
    ConfigurationError { reason: String },
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Registered presenter channels.
#[derive(Debug, Default)]
pub(crate) struct Subscribers {
    next_id: u64,
    senders: Vec<(SubscriptionId, UnboundedSender<ControllerEvent>)>,
}

impl Subscribers {
    pub(crate) fn subscribe(&mut self) -> (SubscriptionId, UnboundedReceiver<ControllerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (self.attach(tx), rx)
    }

    pub(crate) fn attach(&mut self, sender: UnboundedSender<ControllerEvent>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.senders.push((id, sender));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.senders.len();
        self.senders.retain(|(sid, _)| *sid != id);
        self.senders.len() != before
    }

    /// Send to every subscriber, dropping those whose receiver is gone.
    pub(crate) fn publish(&mut self, event: &ControllerEvent) {
        self.senders
            .retain(|(_, sender)| sender.send(event.clone()).is_ok());
    }

    pub(crate) fn len(&self) -> usize {
        self.senders.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(reason: &str) -> ControllerEvent {
        ControllerEvent::Rejected {
            reason: reason.to_string(),
        }
    }

    #[test]
    fn test_publish_reaches_all_subscribers() {
        let mut subs = Subscribers::default();
        let (_, mut a) = subs.subscribe();
        let (_, mut b) = subs.subscribe();

        subs.publish(&rejected("nope"));
        assert_eq!(a.try_recv().unwrap(), rejected("nope"));
        assert_eq!(b.try_recv().unwrap(), rejected("nope"));
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut subs = Subscribers::default();
        let (id, mut rx) = subs.subscribe();
        assert!(subs.unsubscribe(id));
        assert!(!subs.unsubscribe(id));

        subs.publish(&rejected("gone"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_closed_receivers_are_pruned() {
        let mut subs = Subscribers::default();
        let (_, rx) = subs.subscribe();
        let (_, _keep) = subs.subscribe();
        drop(rx);

        subs.publish(&rejected("prune"));
        assert_eq!(subs.len(), 1);
    }

    #[test]
    fn test_screen_result_serialization() {
        let json = serde_json::to_value(ScreenResult::KeyCount { count: 3 }).unwrap();
        assert_eq!(json["result"], "key_count");
        assert_eq!(json["count"], 3);
    }
}
