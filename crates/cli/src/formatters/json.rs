//! JSON formatter implementation.

use anyhow::Result;
use meshkeys_controller::{ControllerEvent, ScreenMode, ScreenResult, ViewState};
use meshkeys_store::{ApplicationKey, ProvisionedNode};
use serde_json::json;

use crate::formatters::Formatter;

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_view_state(&self, mode: &ScreenMode, view: &ViewState) -> Result<String> {
        let value = json!({
            "mode": mode.kind(),
            "title": mode.title(),
            "keys": view.keys,
            "empty_state": view.empty_state,
            "rationale": view.empty_state.map(|state| state.rationale()),
            "pending_removal": view.pending_removal,
        });
        Ok(serde_json::to_string_pretty(&value)?)
    }

    fn format_key(&self, key: &ApplicationKey) -> Result<String> {
        Ok(serde_json::to_string_pretty(key)?)
    }

    fn format_nodes(&self, nodes: &[ProvisionedNode]) -> Result<String> {
        Ok(serde_json::to_string_pretty(nodes)?)
    }

    fn format_result(&self, result: &ScreenResult) -> Result<String> {
        Ok(serde_json::to_string_pretty(result)?)
    }

    fn format_event(&self, event: &ControllerEvent) -> Result<String> {
        let value = match event {
            ControllerEvent::ViewStateChanged(view) => json!({
                "event": "view_state_changed",
                "keys": view.keys,
                "empty_state": view.empty_state,
                "pending_removal": view.pending_removal,
            }),
            ControllerEvent::EditRequested { position, key } => json!({
                "event": "edit_requested",
                "position": position,
                "key": key,
            }),
            ControllerEvent::UndoOffered(pending) => json!({
                "event": "undo_offered",
                "pending_removal": pending,
                "remaining_ms": pending.remaining().as_millis() as u64,
            }),
            ControllerEvent::RemovalFinalized(pending) => json!({
                "event": "removal_finalized",
                "pending_removal": pending,
            }),
            ControllerEvent::Rejected { reason } => json!({
                "event": "rejected",
                "reason": reason,
            }),
            ControllerEvent::Finished(result) => json!({
                "event": "finished",
                "result": result,
            }),
            ControllerEvent::ConfigurationError { reason } => json!({
                "event": "configuration_error",
                "reason": reason,
            }),
        };
        Ok(serde_json::to_string(&value)?)
    }
}
