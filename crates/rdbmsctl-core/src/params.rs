//! Argument registrations for the `mysql` and `postgres` command groups
//!
//! Registration order matters only within a scope. Across scopes the
//! narrower scope always wins, so the shared per-engine procedure can run
//! first and the broad per-group overrides after it without clobbering
//! anything the procedure declared on command scopes.

use tracing::debug;

use crate::commands::CommandTable;
use crate::engine::{Engine, EngineDescriptor};
use crate::error::Result;
use crate::registry::{ArgumentRegistry, RegistryBuilder};
use crate::scope::Scope;
use crate::settings::{ArgSettings, IdPart, Nargs, ValueType, arg_types};
use crate::validators::Validator;

/// Engines whose `server vnet-rule` scope receives the vnet-rule overrides.
///
/// Both members are PostgreSQL. The pair is kept verbatim rather than
/// collapsed so the repeated entry stays visible; registering the same
/// engine twice merges identical settings and changes nothing.
pub const VNET_RULE_SCOPE_ENGINES: [Engine; 2] = [Engine::Postgres, Engine::Postgres];

const FIREWALL_IP_HELP: &str =
    "Must be IPv4 format. Use value '0.0.0.0' to represent all Azure-internal IP addresses.";

/// Build and validate the argument registry for `table`
pub fn load_arguments(table: &CommandTable) -> Result<ArgumentRegistry> {
    let registry = build_registry();
    registry.validate(table)?;
    debug!(
        "Loaded argument registry with {} scopes",
        registry.scopes().len()
    );
    Ok(registry)
}

/// Run every registration without checking it against a command table
pub fn build_registry() -> ArgumentRegistry {
    let mut builder = RegistryBuilder::new();

    register_framework_defaults(&mut builder);

    for engine in Engine::ALL {
        register_complex_params(&mut builder, &engine.descriptor());
    }

    for engine in Engine::ALL {
        register_engine_overrides(&mut builder, &engine.descriptor());
    }

    for engine in VNET_RULE_SCOPE_ENGINES {
        register_vnet_rule(&mut builder, engine);
    }

    builder.build()
}

/// Arguments every command shares regardless of engine
fn register_framework_defaults(builder: &mut RegistryBuilder) {
    builder
        .argument_context(Scope::global())
        .argument("resource_group_name", arg_types::resource_group_name())
        .argument("location", arg_types::location());
}

/// Expansion of the create/restore request objects, identical for both engines
fn register_complex_params(builder: &mut RegistryBuilder, descriptor: &EngineDescriptor) {
    let models = &descriptor.models;
    let server = Scope::new(descriptor.engine, &["server"]);

    builder
        .argument_context(server.child("create"))
        .expand("sku", models.sku())
        .ignore(&["name", "family", "size"])
        .expand("properties", models.server_properties_for_default_create())
        .argument(
            "administrator_login",
            ArgSettings::new()
                .required(true)
                .arg_group("Authentication"),
        )
        .argument(
            "administrator_login_password",
            ArgSettings::new().arg_group("Authentication"),
        )
        .expand("parameters", models.server_for_create())
        .argument("location", arg_types::location().required(false));

    builder
        .argument_context(server.child("restore"))
        .expand("sku", models.sku())
        .ignore(&["name", "family", "size", "tier", "capacity"])
        .expand("properties", models.server_properties_for_restore())
        .ignore(&["version", "ssl_enforcement", "storage_mb"])
        .expand("parameters", models.server_for_create())
        .ignore(&["tags", "location"])
        .argument(
            "source_server_id",
            ArgSettings::new()
                .options(["--source-server", "-s"])
                .help("The name or ID of the source server to restore from.")
                .validator(Validator::SourceServer(descriptor.engine)),
        )
        .argument(
            "restore_point_in_time",
            ArgSettings::new().help(
                "The point in time to restore from (ISO8601 format), e.g., 2017-04-26T02:10:00+08:00",
            ),
        );

    builder
        .argument_context(server.child("configuration").child("set"))
        .argument(
            "value",
            ArgSettings::new()
                .help(
                    "Value of the configuration. If not provided, configuration value will be set to default.",
                )
                .validator(Validator::ConfigurationValue),
        )
        .ignore(&["source"]);
}

/// Overrides shared by both engines, broadest scope first
fn register_engine_overrides(builder: &mut RegistryBuilder, descriptor: &EngineDescriptor) {
    let engine = descriptor.engine;
    let root = Scope::engine(engine);

    builder
        .argument_context(root.clone())
        .argument("name", ArgSettings::new().options(["--sku-name"]))
        .argument(
            "server_name",
            ArgSettings::new()
                .completer(descriptor.server_completer.clone())
                .options(["--server-name", "-s"]),
        );

    let server = root.child("server");
    builder
        .argument_context(server.clone())
        .argument(
            "server_name",
            ArgSettings::new()
                .options(["--name", "-n"])
                .id_part(IdPart::Name)
                .help("Name of the server."),
        )
        .argument(
            "administrator_login",
            ArgSettings::new().options(["--admin-user", "-u"]),
        )
        .argument(
            "administrator_login_password",
            ArgSettings::new()
                .options(["--admin-password", "-p"])
                .required(false)
                .help("The password of the administrator login."),
        )
        .argument(
            "ssl_enforcement",
            arg_types::enumeration(["Enabled", "Disabled"])
                .options(["--ssl-enforcement"])
                .help("Enable ssl enforcement or not when connect to server."),
        )
        .argument(
            "tier",
            arg_types::enumeration(["Basic", "Standard"])
                .options(["--performance-tier"])
                .help("The performance tier of the server."),
        )
        .argument(
            "capacity",
            ArgSettings::new()
                .options(["--compute-units"])
                .value_type(ValueType::Int)
                .help("Number of compute units."),
        )
        .argument(
            "storage_mb",
            ArgSettings::new()
                .options(["--storage-size"])
                .value_type(ValueType::Int)
                .help("The max storage size of the server, unit is MB."),
        )
        .argument("tags", arg_types::tags());

    builder
        .argument_context(root.child("server-logs"))
        .argument(
            "file_name",
            ArgSettings::new()
                .options(["--name", "-n"])
                .nargs(Nargs::OneOrMore),
        )
        .argument(
            "max_file_size",
            ArgSettings::new().value_type(ValueType::Int),
        )
        .argument(
            "file_last_written",
            ArgSettings::new().value_type(ValueType::Int),
        );

    builder
        .argument_context(root.child("db"))
        .argument(
            "database_name",
            ArgSettings::new().options(["--name", "-n"]),
        );

    builder
        .argument_context(server.child("firewall-rule"))
        .argument(
            "server_name",
            ArgSettings::new().options(["--server-name", "-s"]),
        )
        .argument(
            "firewall_rule_name",
            ArgSettings::new()
                .options(["--name", "-n"])
                .id_part(IdPart::ChildName1)
                .help("The name of the firewall rule."),
        )
        .argument(
            "start_ip_address",
            ArgSettings::new()
                .options(["--start-ip-address"])
                .validator(Validator::Ipv4Address)
                .help(format!(
                    "The start IP address of the firewall rule. {}",
                    FIREWALL_IP_HELP
                )),
        )
        .argument(
            "end_ip_address",
            ArgSettings::new()
                .options(["--end-ip-address"])
                .validator(Validator::Ipv4Address)
                .help(format!(
                    "The end IP address of the firewall rule. {}",
                    FIREWALL_IP_HELP
                )),
        );

    builder
        .argument_context(server.child("configuration"))
        .argument(
            "server_name",
            ArgSettings::new().options(["--server-name", "-s"]),
        )
        .argument(
            "configuration_name",
            ArgSettings::new()
                .id_part(IdPart::ChildName1)
                .options(["--name", "-n"]),
        );
}

fn register_vnet_rule(builder: &mut RegistryBuilder, engine: Engine) {
    let vnet_rule = Scope::new(engine, &["server", "vnet-rule"]);

    builder
        .argument_context(vnet_rule.clone())
        .argument(
            "server_name",
            ArgSettings::new().options(["--server-name", "-s"]),
        )
        .argument(
            "virtual_network_rule_name",
            ArgSettings::new()
                .options(["--name", "-n"])
                .id_part(IdPart::ChildName1)
                .help("The name of the vnet rule."),
        )
        .argument(
            "virtual_network_subnet_id",
            ArgSettings::new().options(["--subnet"]).help(
                "Name or ID of the subnet that allows access to an Azure Postgres Server. If subnet name is provided, --vnet-name must be provided.",
            ),
        );

    builder.argument_context(vnet_rule.child("create")).extra(
        "vnet_name",
        ArgSettings::new()
            .options(["--vnet-name"])
            .help("The virtual network name")
            .validator(Validator::Subnet),
    );
}
