//! Table formatter implementation.
//!
//! Responsibilities:
//! - Format keys and nodes as aligned tables.
//! - Format session events as one human-readable line each.
//!
//! Does NOT handle:
//! - Other output formats.

use anyhow::Result;
use meshkeys_controller::{ControllerEvent, ScreenMode, ScreenResult, ViewState};
use meshkeys_store::{ApplicationKey, ProvisionedNode};

use crate::formatters::Formatter;

/// Table formatter.
pub struct TableFormatter;

fn push_key_rows(output: &mut String, keys: &[ApplicationKey]) {
    output.push_str(&format!("{:<10} {:<7} {}\n", "POSITION", "INDEX", "KEY"));
    output.push_str(&format!("{:<10} {:<7} {}\n", "========", "=====", "==="));
    for (position, key) in keys.iter().enumerate() {
        output.push_str(&format!("{:<10} {:<7} {}\n", position, key.index.value(), key.key));
    }
}

impl Formatter for TableFormatter {
    fn format_view_state(&self, mode: &ScreenMode, view: &ViewState) -> Result<String> {
        let mut output = format!("{} ({} mode)\n\n", mode.title(), mode.kind());

        match view.empty_state {
            Some(state) => {
                output.push_str(state.rationale());
                output.push('\n');
            }
            None => push_key_rows(&mut output, &view.keys),
        }

        if let Some(pending) = &view.pending_removal {
            output.push_str(&format!(
                "\nKey {} was removed and can still be restored.\n",
                pending.key.index
            ));
        }

        Ok(output)
    }

    fn format_key(&self, key: &ApplicationKey) -> Result<String> {
        Ok(format!("Key {}: {}", key.index, key.key))
    }

    fn format_nodes(&self, nodes: &[ProvisionedNode]) -> Result<String> {
        let mut output = String::new();

        if nodes.is_empty() {
            output.push_str("No nodes found.\n");
            return Ok(output);
        }

        output.push_str(&format!("{:<8} {:<24} {}\n", "ADDRESS", "NAME", "APP KEYS"));
        output.push_str(&format!("{:<8} {:<24} {}\n", "=======", "====", "========"));

        for node in nodes {
            let keys = if node.added_app_key_indexes.is_empty() {
                "-".to_string()
            } else {
                node.added_app_key_indexes
                    .iter()
                    .map(|index| index.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            output.push_str(&format!(
                "0x{:04X}   {:<24} {}\n",
                node.unicast_address, node.name, keys
            ));
        }

        Ok(output)
    }

    fn format_result(&self, result: &ScreenResult) -> Result<String> {
        Ok(match result {
            ScreenResult::Selected { position, key } => format!(
                "Selected key {} at position {}: {}",
                key.index, position, key.key
            ),
            ScreenResult::KeyCount { count } => format!("{count} application keys"),
            ScreenResult::Cancelled => "Cancelled".to_string(),
        })
    }

    fn format_event(&self, event: &ControllerEvent) -> Result<String> {
        Ok(match event {
            ControllerEvent::ViewStateChanged(view) => {
                if let Some(state) = view.empty_state {
                    format!("keys: {}", state.rationale())
                } else {
                    let listed = view
                        .keys
                        .iter()
                        .enumerate()
                        .map(|(position, key)| format!("{position}:{}", key.index))
                        .collect::<Vec<_>>()
                        .join(" ");
                    format!("keys: {listed}")
                }
            }
            ControllerEvent::EditRequested { position, key } => {
                format!("edit requested for key {} at position {}", key.index, position)
            }
            ControllerEvent::UndoOffered(pending) => format!(
                "key {} removed from position {}; undo within {} ms",
                pending.key.index,
                pending.position,
                pending.remaining().as_millis()
            ),
            ControllerEvent::RemovalFinalized(pending) => {
                format!("removal of key {} is final", pending.key.index)
            }
            ControllerEvent::Rejected { reason } => format!("rejected: {reason}"),
            ControllerEvent::Finished(result) => {
                format!("finished: {}", self.format_result(result)?)
            }
            ControllerEvent::ConfigurationError { reason } => {
                format!("configuration error: {reason}")
            }
        })
    }
}
