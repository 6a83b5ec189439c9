//! Configuration types.
//!
//! Responsibilities:
//! - Define the key list screen launch parameters (`LaunchMode`, `LaunchParams`).
//! - Define the resolved runtime `Config`.
//! - Parse unicast node addresses from user input.
//!
//! Does NOT handle:
//! - Loading values from the environment (see `loader`).
//! - Resolving a target node against the network (see the controller crate).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Which variant of the key list screen to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchMode {
    /// Add, edit and remove keys.
    #[default]
    Manage,
    /// Pick any key and return it to the caller.
    Add,
    /// Pick a key already added to the target node, for model binding.
    Bind,
    /// Pick a key already added to the target node, for model publication.
    Publication,
}

impl LaunchMode {
    /// Returns the canonical name of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manage => "manage",
            Self::Add => "add",
            Self::Bind => "bind",
            Self::Publication => "publication",
        }
    }

    /// True for the modes that only offer keys bound to a node.
    pub fn requires_target_node(&self) -> bool {
        matches!(self, Self::Bind | Self::Publication)
    }
}

impl fmt::Display for LaunchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LaunchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "manage" | "manage-keys" => Ok(Self::Manage),
            "add" | "add-key" => Ok(Self::Add),
            "bind" | "bind-key" => Ok(Self::Bind),
            "publication" | "publish" => Ok(Self::Publication),
            other => Err(format!(
                "unknown mode '{other}' (expected manage, add, bind or publication)"
            )),
        }
    }
}

/// Launch parameters for one key list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LaunchParams {
    pub mode: LaunchMode,
    /// Unicast address of the node whose bound keys are offered.
    pub target_node: Option<u16>,
}

impl LaunchParams {
    pub fn new(mode: LaunchMode) -> Self {
        Self {
            mode,
            target_node: None,
        }
    }

    pub fn with_target_node(mut self, address: u16) -> Self {
        self.target_node = Some(address);
        self
    }
}

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Location of the network document.
    pub network_path: PathBuf,
    /// How long a removed key can be restored.
    pub undo_window: Duration,
    pub launch: LaunchParams,
}

/// Parse a unicast address written as decimal or `0x`-prefixed hex.
///
/// # Errors
///
/// Returns a message if the value is not a number in 0x0001..=0x7FFF.
pub fn parse_unicast_address(raw: &str) -> Result<u16, String> {
    let trimmed = raw.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => trimmed.parse::<u16>(),
    }
    .map_err(|_| format!("'{trimmed}' is not a valid address"))?;

    if (0x0001..=0x7FFF).contains(&parsed) {
        Ok(parsed)
    } else {
        Err(format!(
            "0x{parsed:04X} is not a unicast address (expected 0x0001..=0x7FFF)"
        ))
    }
}
