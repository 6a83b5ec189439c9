//! meshkeys - Command-line front end for the application key list screen.
//!
//! Responsibilities:
//! - Parse command-line arguments and build the runtime configuration.
//! - Execute key and node commands against the network file.
//! - Format and display results as tables or JSON.
//!
//! Does NOT handle:
//! - Key list rules or view state (see `crates/controller`).
//! - Network storage and key index assignment (see `crates/store`).
//!
//! Invariants:
//! - `load_dotenv()` is called BEFORE CLI parsing so `.env` values are visible
//!   to the configuration loader.
//! - Flags take precedence over environment variables.
//! - Logs go to stderr; stdout carries command output only.

mod args;
mod commands;
mod context;
mod dispatch;
mod error;
mod formatters;

use args::Cli;
use clap::Parser;
use dispatch::run_command;
use error::{ExitCode, ExitCodeExt};
use meshkeys_config::{Config, ConfigError, ConfigLoader};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn build_config(cli: &Cli) -> Result<Config, ConfigError> {
    let mut loader = ConfigLoader::new();

    // Blank paths fall back to the environment
    if let Some(ref path) = cli.network
        && !path.as_os_str().is_empty()
    {
        loader = loader.with_network_path(path.clone());
    }
    if let Some(mode) = cli.mode {
        loader = loader.with_mode(mode);
    }
    if let Some(address) = cli.node {
        loader = loader.with_target_node(address);
    }

    loader.from_env()?.build()
}

#[tokio::main]
async fn main() {
    if let Err(e) = ConfigLoader::new().load_dotenv() {
        eprintln!("Failed to load environment: {}", e);
        std::process::exit(ExitCode::ConfigurationError.as_i32());
    }

    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to build configuration: {}", e);
            std::process::exit(ExitCode::ConfigurationError.as_i32());
        }
    };

    let exit_code = match run_command(cli, config).await {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            e.exit_code()
        }
    };

    std::process::exit(exit_code.as_i32());
}
