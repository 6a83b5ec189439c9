//! Shared test utilities for meshkeys integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory that prevents dotenv loading.
//! - Point every command at a network file inside a temporary directory.
//!
//! Invariants / Assumptions:
//! - No test reads or writes the platform data directory.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const KEY_A: &str = "00112233445566778899AABBCCDDEEFF";
pub const KEY_B: &str = "FFEEDDCCBBAA99887766554433221100";
pub const KEY_C: &str = "0123456789ABCDEF0123456789ABCDEF";

/// Returns a hermetic `meshkeys` command.
///
/// It ensures:
/// - `DOTENV_DISABLED=1` is set to prevent local `.env` contamination.
/// - `MESHKEYS_*` variables from the host are cleared.
pub fn meshkeys_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("meshkeys");

    cmd.env("DOTENV_DISABLED", "1");
    cmd.env_remove("MESHKEYS_NETWORK_PATH")
        .env_remove("MESHKEYS_MODE")
        .env_remove("MESHKEYS_TARGET_NODE")
        .env_remove("MESHKEYS_UNDO_WINDOW_MS")
        .env_remove("RUST_LOG");

    cmd
}

/// A temporary network file location.
pub struct Network {
    _dir: TempDir,
    path: PathBuf,
}

impl Network {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("network.json");
        Self { _dir: dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A hermetic command bound to this network file.
    pub fn cmd(&self) -> Command {
        let mut cmd = meshkeys_cmd();
        cmd.arg("--network").arg(&self.path);
        cmd
    }

    /// Run a command that must succeed and return its stdout.
    pub fn run(&self, args: &[&str]) -> String {
        let output = self.cmd().args(args).assert().success();
        String::from_utf8(output.get_output().stdout.clone()).unwrap()
    }

    /// Run a command with `--output json` and parse its stdout.
    pub fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let output = self
            .cmd()
            .args(["--output", "json"])
            .args(args)
            .assert()
            .success();
        serde_json::from_slice(&output.get_output().stdout).unwrap()
    }

    pub fn document(&self) -> serde_json::Value {
        let content = std::fs::read_to_string(&self.path).unwrap();
        serde_json::from_str(&content).unwrap()
    }
}
