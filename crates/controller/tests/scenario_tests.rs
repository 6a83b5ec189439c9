//! End-to-end scenarios for the key list controller.
//!
//! Each test walks one user flow through the public API and checks both the
//! store contents and the events a presenter would receive.

mod common;

use common::{controller, drain, key, store_with_a_and_b};
use meshkeys_config::{LaunchMode, LaunchParams};
use meshkeys_controller::{
    Activation, AppKeyListController, BoundKeySet, ControllerError, ControllerEvent, EmptyState,
    ScreenMode, ScreenResult, UndoOutcome,
};
use meshkeys_store::{MeshNetworkStore, NetworkStore};
use std::sync::Arc;

#[test]
fn test_swipe_then_undo_appends_with_new_index() {
    let store = store_with_a_and_b();
    let [a, b]: [_; 2] = store.app_keys().try_into().unwrap();
    let mut screen = controller(&store, ScreenMode::ManageKeys);
    let (_, mut rx) = screen.subscribe();

    let pending = screen.on_item_swipe_dismissed(0).unwrap();
    assert_eq!(pending.key, a);
    assert_eq!(pending.position, 0);
    assert_eq!(store.app_keys(), vec![b.clone()]);
    assert_eq!(screen.view_state().keys, vec![b.clone()]);
    assert_eq!(screen.view_state().pending_removal.as_ref(), Some(&pending));

    // Removal is committed and rendered before the undo offer arrives.
    let events = drain(&mut rx);
    assert!(matches!(
        events.as_slice(),
        [
            ControllerEvent::ViewStateChanged(_),
            ControllerEvent::UndoOffered(_)
        ]
    ));

    let outcome = screen.on_undo_requested(&pending).unwrap();
    let UndoOutcome::Restored(new_index) = outcome else {
        panic!("expected restore, got {outcome:?}");
    };
    assert_ne!(new_index, a.index);
    assert!(new_index > b.index);

    let keys = store.app_keys();
    assert_eq!(keys.len(), 2);
    assert_eq!(keys[0], b);
    assert_eq!(keys[1].key, a.key);
    assert_eq!(keys[1].index, new_index);
    assert_eq!(screen.view_state().keys, keys);
    assert!(screen.view_state().pending_removal.is_none());
}

#[test]
fn test_bind_selection_returns_bound_key() {
    let store = store_with_a_and_b();
    let b = store.app_keys()[1].clone();
    store.add_node(0x0002, "Light").unwrap();
    store.bind_app_key(0x0002, b.index).unwrap();

    let params = LaunchParams::new(LaunchMode::Bind).with_target_node(0x0002);
    let mut screen =
        AppKeyListController::new(Arc::clone(&store), &params, common::UNDO_WINDOW).unwrap();
    let (_, mut rx) = screen.subscribe();

    let view = screen.compute_initial_view_state();
    assert_eq!(view.keys, vec![b.clone()]);
    assert!(!view.is_empty());
    assert_eq!(view.empty_state, None);

    let activation = screen.on_item_activated(0, &b).unwrap();
    let expected = ScreenResult::Selected {
        position: 0,
        key: b.clone(),
    };
    assert_eq!(activation, Activation::Selected(expected.clone()));
    assert_eq!(drain(&mut rx), vec![ControllerEvent::Finished(expected)]);
    assert!(matches!(
        screen.on_item_activated(0, &b),
        Err(ControllerError::ScreenClosed)
    ));
}

#[test]
fn test_second_removal_supersedes_first_token() {
    let store = store_with_a_and_b();
    let mut screen = controller(&store, ScreenMode::ManageKeys);
    let (_, mut rx) = screen.subscribe();

    let first = screen.on_item_swipe_dismissed(0).unwrap();
    let second = screen.on_item_swipe_dismissed(0).unwrap();
    assert!(store.app_keys().is_empty());
    assert_eq!(screen.view_state().empty_state, Some(EmptyState::NoKeys));

    let events = drain(&mut rx);
    assert!(events.contains(&ControllerEvent::RemovalFinalized(first.clone())));

    assert_eq!(
        screen.on_undo_requested(&first).unwrap(),
        UndoOutcome::AlreadyConsumed
    );
    assert!(store.app_keys().is_empty());

    assert!(matches!(
        screen.on_undo_requested(&second).unwrap(),
        UndoOutcome::Restored(_)
    ));
    assert_eq!(store.app_keys().len(), 1);
    assert_eq!(screen.view_state().empty_state, None);

    // A token can only be used once.
    assert_eq!(
        screen.on_undo_requested(&second).unwrap(),
        UndoOutcome::AlreadyConsumed
    );
    assert_eq!(store.app_keys().len(), 1);
}

#[test]
fn test_finalize_closes_undo_window() {
    let store = store_with_a_and_b();
    let mut screen = controller(&store, ScreenMode::ManageKeys);
    let (_, mut rx) = screen.subscribe();

    let pending = screen.on_item_swipe_dismissed(1).unwrap();
    drain(&mut rx);

    assert_eq!(screen.finalize_removal(), Some(pending.clone()));
    assert!(matches!(
        drain(&mut rx).as_slice(),
        [
            ControllerEvent::ViewStateChanged(_),
            ControllerEvent::RemovalFinalized(_)
        ]
    ));
    assert_eq!(
        screen.on_undo_requested(&pending).unwrap(),
        UndoOutcome::AlreadyConsumed
    );
    assert_eq!(screen.finalize_removal(), None);
}

#[test]
fn test_bind_with_no_bound_keys_shows_rationale() {
    let store = store_with_a_and_b();
    store.add_node(0x0003, "Switch").unwrap();

    let params = LaunchParams::new(LaunchMode::Bind).with_target_node(0x0003);
    let screen = AppKeyListController::new(Arc::clone(&store), &params, common::UNDO_WINDOW)
        .unwrap();
    let bind_view = screen.compute_initial_view_state();
    assert!(bind_view.is_empty());
    assert_eq!(bind_view.empty_state, Some(EmptyState::NoBoundKeys));

    let empty_store = Arc::new(MeshNetworkStore::new());
    let manage = controller(&empty_store, ScreenMode::ManageKeys);
    let manage_view = manage.compute_initial_view_state();
    assert!(manage_view.is_empty());
    assert_eq!(manage_view.empty_state, Some(EmptyState::NoKeys));
    assert_ne!(bind_view.empty_state, manage_view.empty_state);
}

#[test]
fn test_publication_selection_filters_like_bind() {
    let store = store_with_a_and_b();
    let a = store.app_keys()[0].clone();
    let mode = ScreenMode::PublicationKeySelection {
        node: 0x0004,
        bound: BoundKeySet::new([a.index]),
    };
    let mut screen = controller(&store, mode);

    assert_eq!(screen.view_state().keys, vec![a.clone()]);
    assert!(matches!(
        screen.on_item_activated(0, &a).unwrap(),
        Activation::Selected(ScreenResult::Selected { position: 0, .. })
    ));
}

#[test]
fn test_add_for_selection_lists_everything() {
    let store = store_with_a_and_b();
    let mut screen = controller(&store, ScreenMode::AddKeyForSelection);
    let b = store.app_keys()[1].clone();

    assert_eq!(screen.view_state().len(), 2);
    assert_eq!(
        screen.on_item_activated(1, &b).unwrap(),
        Activation::Selected(ScreenResult::Selected { position: 1, key: b })
    );
}

#[test]
fn test_duplicate_add_is_rejected() {
    let store = store_with_a_and_b();
    let mut screen = controller(&store, ScreenMode::ManageKeys);
    let (_, mut rx) = screen.subscribe();

    let err = screen.on_app_key_added(&key(0xA1).to_lowercase()).unwrap_err();
    assert!(matches!(err, ControllerError::DuplicateKey(_)));
    assert_eq!(store.app_keys().len(), 2);
    assert!(matches!(
        drain(&mut rx).as_slice(),
        [ControllerEvent::Rejected { .. }]
    ));
}

#[test]
fn test_edit_to_existing_value_is_rejected() {
    let store = store_with_a_and_b();
    let mut screen = controller(&store, ScreenMode::ManageKeys);

    let err = screen.on_app_key_edited(0, &key(0xB2)).unwrap_err();
    assert!(matches!(err, ControllerError::DuplicateKey(_)));
    assert_eq!(store.app_keys()[0].key, key(0xA1));
}

#[test]
fn test_swipe_rejected_changes_nothing() {
    let store = store_with_a_and_b();
    let mut screen = controller(&store, ScreenMode::ManageKeys);
    let pending = screen.on_item_swipe_dismissed(0).unwrap();
    let (_, mut rx) = screen.subscribe();

    let view_before = screen.view_state().clone();
    let store_before = store.app_keys();
    for position in [0, 1, 99] {
        screen.on_swipe_dismiss_rejected(position);
    }

    assert_eq!(screen.view_state(), &view_before);
    assert_eq!(store.app_keys(), store_before);
    assert_eq!(screen.pending_removal(), Some(&pending));
    assert!(drain(&mut rx).is_empty());
}

#[test]
fn test_swipe_out_of_range_is_stale_reference() {
    let store = store_with_a_and_b();
    let mut screen = controller(&store, ScreenMode::ManageKeys);

    assert!(matches!(
        screen.on_item_swipe_dismissed(5),
        Err(ControllerError::StaleReference { position: 5, len: 2 })
    ));
    assert_eq!(store.app_keys().len(), 2);
    assert!(screen.pending_removal().is_none());
}

#[test]
fn test_unsubscribed_presenter_receives_nothing() {
    let store = store_with_a_and_b();
    let mut screen = controller(&store, ScreenMode::ManageKeys);
    let (id, mut rx) = screen.subscribe();
    assert!(screen.unsubscribe(id));

    screen.on_app_key_added(&key(0xC3)).unwrap();
    assert!(rx.try_recv().is_err());
}
