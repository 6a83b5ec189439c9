//! Shared helpers for architecture tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Find the workspace root by looking for a Cargo.toml with `[workspace]`.
pub fn workspace_root() -> PathBuf {
    let start = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    start
        .ancestors()
        .find(|dir| {
            fs::read_to_string(dir.join("Cargo.toml"))
                .is_ok_and(|content| content.contains("[workspace]"))
        })
        .map(Path::to_path_buf)
        .unwrap_or(start)
}

/// All `.rs` files below `dir`, skipping build output and this crate.
pub fn rust_sources(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_entry(|entry| {
            let name = entry.file_name();
            name != "target" && name != "architecture-tests"
        })
        .filter_map(Result::ok)
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "rs"))
        .map(|entry| entry.into_path())
        .collect()
}
