//! Network file persistence.
//!
//! This module loads and saves the mesh network (application keys, nodes
//! and the key index counter) as a pretty-printed JSON document.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::network::{MeshNetworkStore, NetworkState};

/// Reads and writes a mesh network document on disk.
#[derive(Debug, Clone)]
pub struct NetworkFile {
    path: PathBuf,
}

impl NetworkFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the network file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the network from disk.
    ///
    /// A missing file yields an empty network.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Parse` if the file is not valid JSON, `StoreError::CorruptNetwork`
    /// if it violates a store invariant, or `StoreError::Io` for other read failures.
    pub fn load(&self) -> std::result::Result<MeshNetworkStore, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    path = %self.path.display(),
                    "Network file not found, starting with an empty network"
                );
                return Ok(MeshNetworkStore::new());
            }
            Err(e) => return Err(e.into()),
        };

        let state: NetworkState = serde_json::from_str(&content).map_err(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to parse network file");
            StoreError::Parse {
                path: self.path.clone(),
            }
        })?;
        MeshNetworkStore::from_state(state)
    }

    /// Save the network to disk.
    ///
    /// Writes to a temporary file next to the target, then renames it over the
    /// target, so an interrupted save leaves the previous file intact.
    ///
    /// # Errors
    /// Returns an error if the parent directory cannot be created
    /// or the file cannot be written.
    pub fn save(&self, store: &MeshNetworkStore) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create network directory")?;
        }

        let temp_path = self.path.with_extension("tmp");
        let content = serde_json::to_string_pretty(&store.snapshot())?;
        std::fs::write(&temp_path, content).context("Failed to write temporary network file")?;
        std::fs::rename(&temp_path, &self.path)
            .context("Failed to rename temporary network file")?;

        tracing::debug!(path = %self.path.display(), "Network saved successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkStore;

    #[test]
    fn test_missing_file_loads_empty_network() {
        let dir = tempfile::tempdir().unwrap();
        let file = NetworkFile::new(dir.path().join("missing.json"));
        let store = file.load().unwrap();
        assert!(store.app_keys().is_empty());
        assert!(store.nodes().is_empty());
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("network.json");
        let file = NetworkFile::new(&path);

        let store = MeshNetworkStore::new();
        store.add_app_key(&"5A".repeat(16)).unwrap();
        file.save(&store).unwrap();

        assert!(path.exists());
        let reloaded = file.load().unwrap();
        assert_eq!(reloaded.app_keys(), store.app_keys());
        assert_eq!(reloaded.snapshot().next_key_index, 1);
    }

    #[test]
    fn test_save_over_existing_file_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("network.json");
        let file = NetworkFile::new(&path);

        let store = MeshNetworkStore::new();
        store.add_app_key(&"5A".repeat(16)).unwrap();
        file.save(&store).unwrap();
        store.add_app_key(&"6B".repeat(16)).unwrap();
        file.save(&store).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let state: NetworkState = serde_json::from_str(&content).unwrap();
        assert_eq!(state.app_keys.len(), 2);

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("network.json")]);
    }

    #[test]
    fn test_invalid_json_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("network.json");
        std::fs::write(&path, "{ invalid json }").unwrap();

        match NetworkFile::new(&path).load() {
            Err(StoreError::Parse { path: reported }) => assert_eq!(reported, path),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
