//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Parse node addresses and launch modes from user input.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).
//! - Does not read environment variables; `ConfigLoader` applies them after
//!   the flags given here.

use clap::{Parser, Subcommand};
use meshkeys_config::{LaunchMode, parse_unicast_address};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "meshkeys")]
#[command(about = "Manage the application keys of a Bluetooth mesh network", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  meshkeys keys list\n  meshkeys keys add\n  meshkeys keys remove 0\n  meshkeys nodes add 0x0002 Light\n  meshkeys nodes bind 0x0002 0\n  meshkeys --mode bind --node 0x0002 keys select 0\n  meshkeys session < intents.txt\n\nEnvironment:\n  MESHKEYS_NETWORK_PATH, MESHKEYS_MODE, MESHKEYS_TARGET_NODE, MESHKEYS_UNDO_WINDOW_MS\n"
)]
pub struct Cli {
    /// Path to the network file (defaults to the platform data directory)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub network: Option<PathBuf>,

    /// Screen mode (manage, add, bind, publication)
    #[arg(short, long, global = true)]
    pub mode: Option<LaunchMode>,

    /// Unicast address of the target node for bind and publication modes (e.g. 0x0002)
    #[arg(long, global = true, value_name = "ADDR", value_parser = parse_unicast_address)]
    pub node: Option<u16>,

    /// Output format (table, json)
    #[arg(short, long, global = true, default_value = "table")]
    pub output: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List and edit application keys
    Keys {
        #[command(subcommand)]
        command: KeysCommand,
    },

    /// List provisioned nodes and the keys added to them
    Nodes {
        #[command(subcommand)]
        command: NodesCommand,
    },

    /// Drive the key list screen interactively, one intent per line on stdin
    ///
    /// Intents: list, add [KEY], edit N KEY, remove N, undo, finalize,
    /// select N, reject N, sync, quit.
    Session,
}

#[derive(Subcommand)]
pub enum KeysCommand {
    /// Show the key list for the current mode
    List,

    /// Add a key (a random key is generated when KEY is omitted)
    Add {
        /// 32 hex digits
        key: Option<String>,
    },

    /// Replace the value of the key at POSITION
    Edit {
        position: usize,
        /// 32 hex digits
        key: String,
    },

    /// Remove the key at POSITION
    Remove { position: usize },

    /// Select the key at POSITION (selection modes only)
    Select { position: usize },
}

#[derive(Subcommand)]
pub enum NodesCommand {
    /// List provisioned nodes
    List,

    /// Add a provisioned node
    Add {
        #[arg(value_parser = parse_unicast_address)]
        address: u16,
        name: String,
    },

    /// Add an application key to a node
    Bind {
        #[arg(value_parser = parse_unicast_address)]
        address: u16,
        /// Application key index
        #[arg(value_parser = clap::value_parser!(u16).range(0..=0x0FFF))]
        index: u16,
    },

    /// Remove an application key from a node
    Unbind {
        #[arg(value_parser = parse_unicast_address)]
        address: u16,
        /// Application key index
        #[arg(value_parser = clap::value_parser!(u16).range(0..=0x0FFF))]
        index: u16,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "meshkeys", "keys", "select", "1", "--mode", "bind", "--node", "0x0002",
        ])
        .unwrap();
        assert_eq!(cli.mode, Some(LaunchMode::Bind));
        assert_eq!(cli.node, Some(2));
        assert!(matches!(
            cli.command,
            Commands::Keys {
                command: KeysCommand::Select { position: 1 }
            }
        ));
    }

    #[test]
    fn test_group_address_rejected() {
        let result = Cli::try_parse_from(["meshkeys", "nodes", "add", "0xC000", "Group"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_add_key_is_optional() {
        let cli = Cli::try_parse_from(["meshkeys", "keys", "add"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Keys {
                command: KeysCommand::Add { key: None }
            }
        ));
    }
}
