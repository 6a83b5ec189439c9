//! Integration tests for configuration loading from the CLI entrypoint.
//!
//! These tests verify end-to-end config loading behavior through the public
//! `meshkeys_config` API.

use meshkeys_config::{ConfigError, ConfigLoader, LaunchMode, LaunchParams, env_var_or_none};
use serial_test::serial;
use std::path::PathBuf;
use std::time::Duration;

/// Builder values (CLI args) > env vars > defaults.
#[test]
#[serial]
fn test_config_loader_cli_overrides() {
    temp_env::with_vars(
        [
            ("MESHKEYS_NETWORK_PATH", Some("/env/network.json")),
            ("MESHKEYS_UNDO_WINDOW_MS", Some("1000")),
        ],
        || {
            let config = ConfigLoader::new()
                .with_network_path(PathBuf::from("/cli/network.json"))
                .from_env()
                .expect("env should parse")
                .build()
                .expect("should build with CLI overrides");
            assert_eq!(config.network_path, PathBuf::from("/cli/network.json"));
            assert_eq!(config.undo_window, Duration::from_secs(1));
        },
    );
}

#[test]
#[serial]
fn test_launch_params_from_env() {
    temp_env::with_vars(
        [
            ("MESHKEYS_MODE", Some("publication")),
            ("MESHKEYS_TARGET_NODE", Some("0x0010")),
        ],
        || {
            let config = ConfigLoader::new()
                .with_network_path(PathBuf::from("/tmp/network.json"))
                .from_env()
                .unwrap()
                .build()
                .unwrap();
            assert_eq!(
                config.launch,
                LaunchParams::new(LaunchMode::Publication).with_target_node(0x10)
            );
        },
    );
}

#[test]
#[serial]
fn test_invalid_undo_window_env() {
    temp_env::with_vars([("MESHKEYS_UNDO_WINDOW_MS", Some("soon"))], || {
        let err = ConfigLoader::new().from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert!(err.to_string().contains("MESHKEYS_UNDO_WINDOW_MS"));
    });
}

/// env_var_or_none is part of the public API.
#[test]
fn test_env_var_or_none_exported() {
    let _result: Option<String> = env_var_or_none("MESHKEYS_NETWORK_PATH");
}
