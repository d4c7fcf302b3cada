use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

/// Helper to create a test command isolated from the user's configuration
fn rdbmsctl(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("rdbmsctl").unwrap();
    cmd.env("RDBMSCTL_CONFIG_FILE", dir.path().join("config.toml"))
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

#[test]
fn test_help_flag() {
    let dir = TempDir::new().unwrap();
    rdbmsctl(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Azure Database for MySQL and PostgreSQL",
        ))
        .stdout(predicate::str::contains("EXAMPLES:"));
}

#[test]
fn test_version_flag() {
    let dir = TempDir::new().unwrap();
    rdbmsctl(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rdbmsctl"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_no_args_shows_help() {
    let dir = TempDir::new().unwrap();
    rdbmsctl(&dir)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_invalid_subcommand() {
    let dir = TempDir::new().unwrap();
    rdbmsctl(&dir)
        .arg("sqlserver")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_create_help_shows_admin_aliases() {
    let dir = TempDir::new().unwrap();
    for engine in ["mysql", "postgres"] {
        rdbmsctl(&dir)
            .args([engine, "server", "create", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--admin-user"))
            .stdout(predicate::str::contains("--admin-password"))
            .stdout(predicate::str::contains("Authentication"))
            .stdout(predicate::str::contains("--sku-name").not());
    }
}

#[test]
fn test_restore_help_hides_tags_and_location() {
    let dir = TempDir::new().unwrap();
    rdbmsctl(&dir)
        .args(["postgres", "server", "restore", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--source-server <SOURCE_SERVER_ID>"))
        .stdout(predicate::str::contains("--tags").not())
        .stdout(predicate::str::contains("--location").not());
}

#[test]
fn test_server_create_prints_request() {
    let dir = TempDir::new().unwrap();
    let request = stdout_json(rdbmsctl(&dir).args([
        "mysql",
        "server",
        "create",
        "-g",
        "rg1",
        "-n",
        "orders",
        "-u",
        "admin",
        "-p",
        "secret",
        "-l",
        "westus",
        "--version",
        "5.7",
        "--tags",
        "env=prod",
    ]));

    assert_eq!(request["command"], "mysql server create");
    assert_eq!(request["operation"], "create");
    let parameters = &request["parameters"]["parameters"];
    assert_eq!(parameters["location"], "westus");
    assert_eq!(parameters["tags"]["env"], "prod");
    assert_eq!(parameters["properties"]["createMode"], "Default");
    assert_eq!(parameters["properties"]["administratorLogin"], "admin");
    assert_eq!(parameters["properties"]["version"], "5.7");
}

#[test]
fn test_restore_builds_source_server_id() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        "[defaults]\nsubscription = \"sub-1\"\n",
    )
    .unwrap();

    let request = stdout_json(rdbmsctl(&dir).args([
        "mysql",
        "server",
        "restore",
        "-g",
        "rg1",
        "-n",
        "orders-restored",
        "--source-server",
        "orders",
        "--restore-point-in-time",
        "2017-04-26T02:10:00+08:00",
    ]));
    assert_eq!(
        request["parameters"]["parameters"]["properties"]["sourceServerId"],
        "/subscriptions/sub-1/resourceGroups/rg1/providers/Microsoft.DBForMySQL/servers/orders"
    );
}

#[test]
fn test_server_create_requires_admin_user() {
    let dir = TempDir::new().unwrap();
    rdbmsctl(&dir)
        .args([
            "postgres",
            "server",
            "create",
            "-g",
            "rg1",
            "-n",
            "analytics",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("--admin-user/-u"));
}

#[test]
fn test_configured_defaults_fill_group_and_location() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        "[defaults]\nresource_group = \"rg-default\"\nlocation = \"eastus\"\n",
    )
    .unwrap();

    let request = stdout_json(
        rdbmsctl(&dir).args(["mysql", "server", "create", "-n", "orders", "-u", "admin"]),
    );
    assert_eq!(request["parameters"]["resource_group_name"], "rg-default");
    assert_eq!(request["parameters"]["parameters"]["location"], "eastus");
}

#[test]
fn test_firewall_rule_rejects_invalid_ip() {
    let dir = TempDir::new().unwrap();
    rdbmsctl(&dir)
        .args([
            "mysql",
            "server",
            "firewall-rule",
            "create",
            "-g",
            "rg1",
            "-s",
            "orders",
            "-n",
            "office",
            "--start-ip-address",
            "10.0.0.256",
            "--end-ip-address",
            "10.0.0.1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be an IPv4 address"));
}

#[test]
fn test_firewall_rule_accepts_azure_wildcard() {
    let dir = TempDir::new().unwrap();
    let request = stdout_json(rdbmsctl(&dir).args([
        "postgres",
        "server",
        "firewall-rule",
        "create",
        "-g",
        "rg1",
        "-s",
        "analytics",
        "-n",
        "azure",
        "--start-ip-address",
        "0.0.0.0",
        "--end-ip-address",
        "0.0.0.0",
    ]));
    assert_eq!(request["parameters"]["start_ip_address"], "0.0.0.0");
}

#[test]
fn test_configuration_set_without_value_uses_default() {
    let dir = TempDir::new().unwrap();
    let request = stdout_json(rdbmsctl(&dir).args([
        "mysql",
        "server",
        "configuration",
        "set",
        "-g",
        "rg1",
        "-s",
        "orders",
        "-n",
        "wait_timeout",
    ]));
    assert_eq!(request["parameters"]["source"], "system-default");
    assert!(request["parameters"].get("value").is_none());
}

#[test]
fn test_vnet_rule_create_builds_subnet_id() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        "[defaults]\nsubscription = \"sub-1\"\n",
    )
    .unwrap();

    let request = stdout_json(rdbmsctl(&dir).args([
        "postgres",
        "server",
        "vnet-rule",
        "create",
        "-g",
        "rg1",
        "-s",
        "analytics",
        "-n",
        "rule1",
        "--subnet",
        "default",
        "--vnet-name",
        "vnet1",
    ]));
    assert_eq!(
        request["parameters"]["virtual_network_subnet_id"],
        "/subscriptions/sub-1/resourceGroups/rg1/providers/Microsoft.Network/virtualNetworks/vnet1/subnets/default"
    );
    assert!(request["parameters"].get("vnet_name").is_none());
}

#[test]
fn test_vnet_rule_subnet_name_needs_vnet_name() {
    let dir = TempDir::new().unwrap();
    rdbmsctl(&dir)
        .args([
            "postgres",
            "server",
            "vnet-rule",
            "create",
            "-g",
            "rg1",
            "-s",
            "analytics",
            "-n",
            "rule1",
            "--subnet",
            "default",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("incorrect usage"));
}

#[test]
fn test_mysql_has_no_vnet_rule() {
    let dir = TempDir::new().unwrap();
    rdbmsctl(&dir)
        .args(["mysql", "server", "vnet-rule", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_ids_supply_resource_names() {
    let dir = TempDir::new().unwrap();
    let request = stdout_json(rdbmsctl(&dir).args([
        "mysql",
        "server",
        "firewall-rule",
        "show",
        "--ids",
        "/subscriptions/sub/resourceGroups/rg1/providers/Microsoft.DBForMySQL/servers/orders/firewallRules/office",
    ]));
    assert_eq!(request["parameters"]["resource_group_name"], "rg1");
    assert_eq!(request["parameters"]["server_name"], "orders");
    assert_eq!(request["parameters"]["firewall_rule_name"], "office");
}

#[test]
fn test_ids_conflict_with_names() {
    let dir = TempDir::new().unwrap();
    rdbmsctl(&dir)
        .args([
            "mysql",
            "server",
            "show",
            "-n",
            "orders",
            "--ids",
            "/subscriptions/sub/resourceGroups/rg1/providers/Microsoft.DBForMySQL/servers/orders",
        ])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_invalid_id_is_reported() {
    let dir = TempDir::new().unwrap();
    rdbmsctl(&dir)
        .args(["mysql", "server", "show", "--ids", "orders"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a valid resource ID"));
}

#[test]
fn test_registry_show_command() {
    let dir = TempDir::new().unwrap();
    let resolved = stdout_json(rdbmsctl(&dir).args([
        "registry",
        "show",
        "mysql server create",
        "-q",
        "arguments[?dest==`administrator_login`] | [0]",
    ]));
    assert_eq!(
        resolved["options"],
        serde_json::json!(["--admin-user", "-u"])
    );
    assert_eq!(resolved["required"], true);
}

#[test]
fn test_registry_commands_table() {
    let dir = TempDir::new().unwrap();
    rdbmsctl(&dir)
        .args(["registry", "commands", "postgres", "-o", "table"])
        .assert()
        .success()
        .stdout(predicate::str::contains("postgres server vnet-rule create"))
        .stdout(predicate::str::contains("mysql").not());
}

#[test]
fn test_config_set_default_round_trip() {
    let dir = TempDir::new().unwrap();
    rdbmsctl(&dir)
        .args(["config", "set-default", "location", "westeurope"])
        .assert()
        .success();

    let config = stdout_json(rdbmsctl(&dir).args(["config", "show"]));
    assert_eq!(config["defaults"]["location"], "westeurope");

    rdbmsctl(&dir)
        .args(["config", "set-default", "region", "westeurope"])
        .assert()
        .failure();
}

#[test]
fn test_complete_locations() {
    let dir = TempDir::new().unwrap();
    rdbmsctl(&dir)
        .args(["__complete", "mysql server create", "--location", "westc"])
        .assert()
        .success()
        .stdout("westcentralus\n");
}

#[test]
fn test_complete_server_names_from_config() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        r#"
[[resources]]
type = "Microsoft.DBForMySQL/servers"
name = "orders"
resource_group = "rg1"

[[resources]]
type = "Microsoft.DBForPostgreSQL/servers"
name = "analytics"
resource_group = "rg1"
"#,
    )
    .unwrap();

    rdbmsctl(&dir)
        .args(["__complete", "mysql db list", "--server-name"])
        .assert()
        .success()
        .stdout("orders\n");
}

#[test]
fn test_completions_bash() {
    let dir = TempDir::new().unwrap();
    rdbmsctl(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rdbmsctl"));
}
