//! Command dispatch logic.
//!
//! Responsibilities:
//! - Route parsed CLI arguments to appropriate command handlers.
//! - Open the network context every command works on.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//! - Configuration loading (see `main()`).

use anyhow::Result;
use meshkeys_config::Config;

use crate::args::{Cli, Commands};
use crate::commands;
use crate::context::NetworkContext;
use crate::formatters::OutputFormat;

/// Dispatch CLI commands to their respective handlers.
pub(crate) async fn run_command(cli: Cli, config: Config) -> Result<()> {
    let format = OutputFormat::from_str(&cli.output)?;
    let ctx = NetworkContext::open(config, format)?;

    match cli.command {
        Commands::Keys { command } => commands::keys::run(command, &ctx)?,
        Commands::Nodes { command } => commands::nodes::run(command, &ctx)?,
        Commands::Session => commands::session::run(&ctx).await?,
    }

    Ok(())
}
