//! Network context shared by all commands.
//!
//! Responsibilities:
//! - Load the network file named by the configuration.
//! - Open key list controllers over the loaded store.
//! - Save the network after a mutating command.
//!
//! Invariants:
//! - A missing network file yields an empty network; it is created on the
//!   first save.

use anyhow::{Context, Result};
use meshkeys_config::Config;
use meshkeys_controller::AppKeyListController;
use meshkeys_store::{MeshNetworkStore, NetworkFile};
use std::sync::Arc;

use crate::formatters::{Formatter, OutputFormat, get_formatter};

pub struct NetworkContext {
    config: Config,
    file: NetworkFile,
    store: Arc<MeshNetworkStore>,
    formatter: Box<dyn Formatter>,
}

impl NetworkContext {
    pub fn open(config: Config, format: OutputFormat) -> Result<Self> {
        let file = NetworkFile::new(config.network_path.clone());
        let store = file
            .load()
            .with_context(|| format!("Failed to load network from {}", file.path().display()))?;
        Ok(Self {
            config,
            file,
            store: Arc::new(store),
            formatter: get_formatter(format),
        })
    }

    pub fn store(&self) -> &MeshNetworkStore {
        &self.store
    }

    pub fn formatter(&self) -> &dyn Formatter {
        self.formatter.as_ref()
    }

    /// Open the key list screen for the configured launch parameters.
    pub fn controller(&self) -> Result<AppKeyListController<MeshNetworkStore>> {
        let controller = AppKeyListController::new(
            Arc::clone(&self.store),
            &self.config.launch,
            self.config.undo_window,
        )?;
        Ok(controller)
    }

    pub fn save(&self) -> Result<()> {
        self.file
            .save(&self.store)
            .with_context(|| format!("Failed to save network to {}", self.file.path().display()))
    }
}
