use std::fs;
use std::path::PathBuf;

use rdbmsctl_core::config::{Config, ConfigError};
use rdbmsctl_core::{Completer, ConfiguredDefault, Engine};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// 1. Missing or empty config file
// ---------------------------------------------------------------------------

#[test]
fn load_from_nonexistent_path_returns_default_config() {
    let path = PathBuf::from("/tmp/rdbmsctl-test-nonexistent/does/not/exist/config.toml");
    assert!(!path.exists());

    let config = Config::load_from_path(&path).expect("missing file should load as default");

    assert_eq!(config, Config::default());
    assert!(
        config
            .configured_default(ConfiguredDefault::Location)
            .is_none()
    );
}

#[test]
fn load_empty_config_file_returns_default_config() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "").unwrap();

    let config = Config::load_from_path(&config_path).expect("empty file should parse as default");

    assert_eq!(config, Config::default());
}

// ---------------------------------------------------------------------------
// 2. Corrupt TOML
// ---------------------------------------------------------------------------

#[test]
fn load_corrupt_toml_returns_parse_error() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "[[[broken").unwrap();

    let err = Config::load_from_path(&config_path).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError(_)));
    assert!(err.to_string().contains("parse"), "got: {err}");
}

#[test]
fn resource_entry_without_name_is_rejected() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        "[[resources]]\ntype = \"Microsoft.DBForMySQL/servers\"\n",
    )
    .unwrap();

    assert!(Config::load_from_path(&config_path).is_err());
}

// ---------------------------------------------------------------------------
// 3. Save / load round trip
// ---------------------------------------------------------------------------

#[test]
fn save_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("nested").join("dir").join("config.toml");

    let mut config = Config::default();
    config.set_default("location", "westus2").unwrap();
    config.set_default("subscription", "sub-1").unwrap();
    config.save_to_path(&config_path).unwrap();

    let loaded = Config::load_from_path(&config_path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(
        loaded
            .configured_default(ConfiguredDefault::Location)
            .as_deref(),
        Some("westus2")
    );
}

#[test]
fn cleared_defaults_are_not_written() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");

    let mut config = Config::default();
    config.set_default("resource_group", "rg1").unwrap();
    config.set_default("resource_group", "").unwrap();
    config.save_to_path(&config_path).unwrap();

    let content = fs::read_to_string(&config_path).unwrap();
    assert!(!content.contains("resource_group"), "got: {content}");
}

// ---------------------------------------------------------------------------
// 4. Completion data
// ---------------------------------------------------------------------------

#[test]
fn server_completion_reads_resources_from_file() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
locations = ["westus", "westeurope"]

[[resources]]
type = "Microsoft.DBForPostgreSQL/servers"
name = "analytics"
resource_group = "rg1"

[[resources]]
type = "Microsoft.DBForPostgreSQL/servers"
name = "archive"
resource_group = "rg2"

[[resources]]
type = "Microsoft.DBForMySQL/servers"
name = "orders"
resource_group = "rg1"
"#,
    )
    .unwrap();
    let config = Config::load_from_path(&config_path).unwrap();

    let servers = Engine::Postgres.descriptor().server_completer;
    assert_eq!(
        servers.complete(&config, "a", None),
        vec!["analytics", "archive"]
    );
    assert_eq!(servers.complete(&config, "A", Some("rg2")), vec!["archive"]);

    assert_eq!(
        Completer::Location.complete(&config, "west", None),
        vec!["westeurope", "westus"]
    );
    assert_eq!(
        Completer::ResourceGroup.complete(&config, "", None),
        vec!["rg1", "rg2"]
    );
}
