//! Output formatters for CLI commands.
//!
//! Responsibilities:
//! - Provide table and JSON renderings of keys, nodes, screen results and
//!   controller events.
//!
//! Does NOT handle:
//! - Direct printing to stdout (returns formatted strings).
//!
//! Invariants:
//! - JSON output for one-shot commands is pretty-printed; session events are
//!   one compact JSON object per line so they can be streamed.
//! - An empty key list renders as the empty-state rationale in table output
//!   and as `"keys": []` plus `"empty_state"` in JSON.

use anyhow::Result;
use meshkeys_controller::{ControllerEvent, ScreenMode, ScreenResult, ViewState};
use meshkeys_store::{ApplicationKey, ProvisionedNode};

mod json;
mod table;

pub use json::JsonFormatter;
pub use table::TableFormatter;

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    /// Parse from string.
    pub fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => anyhow::bail!("Invalid output format: {}. Valid options: table, json", s),
        }
    }
}

/// Renders command output.
pub trait Formatter {
    /// Format the key list of a screen.
    fn format_view_state(&self, mode: &ScreenMode, view: &ViewState) -> Result<String>;

    /// Format a single key, e.g. after it was added or removed.
    fn format_key(&self, key: &ApplicationKey) -> Result<String>;

    /// Format provisioned nodes.
    fn format_nodes(&self, nodes: &[ProvisionedNode]) -> Result<String>;

    /// Format the result a screen finished with.
    fn format_result(&self, result: &ScreenResult) -> Result<String>;

    /// Format one controller event for the session stream.
    fn format_event(&self, event: &ControllerEvent) -> Result<String>;
}

/// Get a formatter for the given output format.
pub fn get_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}
