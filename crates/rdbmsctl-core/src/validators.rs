//! Argument validators
//!
//! Validators run after parsing, in argument order, and may rewrite the
//! namespace: fill in derived values, normalize shapes, or drop helper
//! arguments that only exist on the command line.

use serde::Serialize;
use serde_json::{Map, Value};
use std::net::Ipv4Addr;
use tracing::debug;

use crate::engine::Engine;
use crate::error::ValidationError;
use crate::resource_id::ResourceId;
use crate::values::ArgValues;

/// Ambient facts validators may need
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationContext {
    pub subscription: Option<String>,
}

impl ValidationContext {
    pub fn new(subscription: Option<String>) -> Self {
        Self { subscription }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Validator {
    /// Maps an empty configuration value to the server default
    ConfigurationValue,
    /// Resolves `--subnet NAME --vnet-name NAME` into a subnet resource id
    Subnet,
    /// Resolves a bare source server name into a server resource id
    SourceServer(Engine),
    /// Turns `key[=value]` items into an object
    Tags,
    /// Requires a dotted-quad IPv4 address
    Ipv4Address,
}

impl Validator {
    pub fn name(&self) -> &'static str {
        match self {
            Validator::ConfigurationValue => "configuration_value",
            Validator::Subnet => "subnet",
            Validator::SourceServer(_) => "source_server",
            Validator::Tags => "tags",
            Validator::Ipv4Address => "ipv4_address",
        }
    }

    /// Validate the argument stored under `dest`; `option` names it in errors
    pub fn validate(
        &self,
        dest: &str,
        option: &str,
        values: &mut ArgValues,
        ctx: &ValidationContext,
    ) -> Result<(), ValidationError> {
        debug!("Running {} validator for {}", self.name(), dest);
        match self {
            Validator::ConfigurationValue => configuration_value(dest, values),
            Validator::Subnet => subnet(values, ctx),
            Validator::SourceServer(engine) => source_server(*engine, dest, values, ctx),
            Validator::Tags => tags(dest, values),
            Validator::Ipv4Address => ipv4_address(dest, option, values),
        }
    }
}

fn configuration_value(dest: &str, values: &mut ArgValues) -> Result<(), ValidationError> {
    let provided = values
        .get_str(dest)
        .is_some_and(|value| !value.trim().is_empty());
    if provided {
        values.set("source", "user-override");
    } else {
        values.set(dest, Value::Null);
        values.set("source", "system-default");
    }
    Ok(())
}

fn subnet(values: &mut ArgValues, ctx: &ValidationContext) -> Result<(), ValidationError> {
    let subnet = values
        .get_str("virtual_network_subnet_id")
        .map(str::to_string);
    let vnet = values.get_str("vnet_name").map(str::to_string);
    let subnet_is_id = subnet.as_deref().is_some_and(ResourceId::is_valid);

    match (subnet, vnet) {
        (Some(_), None) if subnet_is_id => {}
        (None, None) => {}
        (Some(subnet), Some(vnet)) if !subnet_is_id => {
            let subscription = ctx
                .subscription
                .clone()
                .ok_or(ValidationError::MissingSubscription)?;
            let resource_group = resource_group(values)?;
            let id = ResourceId::new(
                subscription,
                resource_group,
                "Microsoft.Network",
                "virtualNetworks",
                vnet,
            )
            .with_child("subnets", subnet);
            debug!("Resolved subnet to {}", id);
            values.set("virtual_network_subnet_id", id.to_string());
        }
        _ => {
            return Err(ValidationError::IncorrectUsage(
                "[--subnet ID | --subnet NAME --vnet-name NAME]".to_string(),
            ));
        }
    }

    values.remove("vnet_name");
    Ok(())
}

fn source_server(
    engine: Engine,
    dest: &str,
    values: &mut ArgValues,
    ctx: &ValidationContext,
) -> Result<(), ValidationError> {
    let Some(name) = values.get_str(dest) else {
        return Ok(());
    };
    if ResourceId::is_valid(name) {
        return Ok(());
    }

    let subscription = ctx
        .subscription
        .clone()
        .ok_or(ValidationError::MissingSubscription)?;
    let id = ResourceId::new(
        subscription,
        resource_group(values)?,
        engine.provider_namespace(),
        "servers",
        name,
    );
    debug!("Resolved source server to {}", id);
    values.set(dest, id.to_string());
    Ok(())
}

fn resource_group(values: &ArgValues) -> Result<&str, ValidationError> {
    values
        .get_str("resource_group_name")
        .ok_or_else(|| ValidationError::MissingRequired {
            options: "--resource-group/-g".to_string(),
        })
}

fn tags(dest: &str, values: &mut ArgValues) -> Result<(), ValidationError> {
    let Some(Value::Array(items)) = values.get(dest) else {
        return Ok(());
    };

    let mut parsed = Map::new();
    for item in items {
        let Some(item) = item.as_str() else {
            continue;
        };
        if item.is_empty() {
            continue;
        }
        match item.split_once('=') {
            Some((key, value)) => parsed.insert(key.to_string(), Value::from(value)),
            None => parsed.insert(item.to_string(), Value::from("")),
        };
    }
    values.set(dest, Value::Object(parsed));
    Ok(())
}

fn ipv4_address(dest: &str, option: &str, values: &mut ArgValues) -> Result<(), ValidationError> {
    let Some(raw) = values.get_str(dest) else {
        return Ok(());
    };
    raw.parse::<Ipv4Addr>()
        .map(|_| ())
        .map_err(|_| ValidationError::InvalidValue {
            option: option.to_string(),
            value: raw.to_string(),
            reason: "must be an IPv4 address".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx() -> ValidationContext {
        ValidationContext::new(Some("sub-1".to_string()))
    }

    #[test]
    fn test_configuration_value_empty_uses_system_default() {
        let mut values: ArgValues = [("value", "   ")].into_iter().collect();
        Validator::ConfigurationValue
            .validate("value", "--value", &mut values, &ctx())
            .unwrap();
        assert!(!values.contains("value"));
        assert_eq!(values.get_str("source"), Some("system-default"));

        let mut values = ArgValues::new();
        Validator::ConfigurationValue
            .validate("value", "--value", &mut values, &ctx())
            .unwrap();
        assert_eq!(values.get_str("source"), Some("system-default"));
    }

    #[test]
    fn test_configuration_value_user_override() {
        let mut values: ArgValues = [("value", "ON")].into_iter().collect();
        Validator::ConfigurationValue
            .validate("value", "--value", &mut values, &ctx())
            .unwrap();
        assert_eq!(values.get_str("value"), Some("ON"));
        assert_eq!(values.get_str("source"), Some("user-override"));
    }

    #[test]
    fn test_subnet_name_and_vnet_build_id() {
        let mut values: ArgValues = [
            ("virtual_network_subnet_id", "default"),
            ("vnet_name", "vnet1"),
            ("resource_group_name", "rg1"),
        ]
        .into_iter()
        .collect();
        Validator::Subnet
            .validate("vnet_name", "--vnet-name", &mut values, &ctx())
            .unwrap();
        let expected = "/subscriptions/sub-1/resourceGroups/rg1/providers/Microsoft.Network/virtualNetworks/vnet1/subnets/default";
        assert_eq!(values.get_str("virtual_network_subnet_id"), Some(expected));
        assert!(values.get("vnet_name").is_none());
    }

    #[test]
    fn test_subnet_id_alone_passes() {
        let id = "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Network/virtualNetworks/v/subnets/a";
        let mut values: ArgValues = [("virtual_network_subnet_id", id)].into_iter().collect();
        Validator::Subnet
            .validate("vnet_name", "--vnet-name", &mut values, &ctx())
            .unwrap();
        assert_eq!(values.get_str("virtual_network_subnet_id"), Some(id));
    }

    #[test]
    fn test_subnet_incorrect_usage() {
        let id = "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Network/virtualNetworks/v/subnets/a";
        let cases = [
            vec![("virtual_network_subnet_id", "default")],
            vec![("vnet_name", "vnet1")],
            vec![("virtual_network_subnet_id", id), ("vnet_name", "vnet1")],
        ];
        for case in cases {
            let mut values: ArgValues = case.into_iter().collect();
            let err = Validator::Subnet
                .validate("vnet_name", "--vnet-name", &mut values, &ctx())
                .unwrap_err();
            assert_eq!(
                err.to_string(),
                "incorrect usage: [--subnet ID | --subnet NAME --vnet-name NAME]"
            );
        }
    }

    #[test]
    fn test_subnet_requires_subscription() {
        let mut values: ArgValues = [
            ("virtual_network_subnet_id", "default"),
            ("vnet_name", "vnet1"),
            ("resource_group_name", "rg1"),
        ]
        .into_iter()
        .collect();
        let err = Validator::Subnet
            .validate(
                "vnet_name",
                "--vnet-name",
                &mut values,
                &ValidationContext::default(),
            )
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingSubscription);
    }

    #[test]
    fn test_source_server_name_builds_id() {
        let mut values: ArgValues = [
            ("source_server_id", "orders"),
            ("resource_group_name", "rg1"),
        ]
        .into_iter()
        .collect();
        Validator::SourceServer(Engine::MySql)
            .validate("source_server_id", "--source-server", &mut values, &ctx())
            .unwrap();
        let expected =
            "/subscriptions/sub-1/resourceGroups/rg1/providers/Microsoft.DBForMySQL/servers/orders";
        assert_eq!(values.get_str("source_server_id"), Some(expected));
    }

    #[test]
    fn test_source_server_id_passes_through() {
        let id =
            "/subscriptions/s/resourceGroups/other/providers/Microsoft.DBForPostgreSQL/servers/pg";
        let mut values: ArgValues = [("source_server_id", id)].into_iter().collect();
        Validator::SourceServer(Engine::Postgres)
            .validate("source_server_id", "--source-server", &mut values, &ctx())
            .unwrap();
        assert_eq!(values.get_str("source_server_id"), Some(id));
    }

    #[test]
    fn test_source_server_name_needs_group_and_subscription() {
        let mut values: ArgValues = [("source_server_id", "orders")].into_iter().collect();
        let err = Validator::SourceServer(Engine::MySql)
            .validate("source_server_id", "--source-server", &mut values, &ctx())
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingRequired {
                options: "--resource-group/-g".to_string(),
            }
        );

        let mut values: ArgValues = [
            ("source_server_id", "orders"),
            ("resource_group_name", "rg1"),
        ]
        .into_iter()
        .collect();
        let err = Validator::SourceServer(Engine::MySql)
            .validate(
                "source_server_id",
                "--source-server",
                &mut values,
                &ValidationContext::default(),
            )
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingSubscription);
    }

    #[test]
    fn test_tags_parse() {
        let mut values = ArgValues::new();
        values.set("tags", json!(["env=prod", "owner", "", "cost=a=b"]));
        Validator::Tags
            .validate("tags", "--tags", &mut values, &ctx())
            .unwrap();
        assert_eq!(
            values.get("tags"),
            Some(&json!({ "env": "prod", "owner": "", "cost": "a=b" }))
        );
    }

    #[test]
    fn test_ipv4_address() {
        let mut values: ArgValues = [("start_ip_address", "0.0.0.0")].into_iter().collect();
        Validator::Ipv4Address
            .validate(
                "start_ip_address",
                "--start-ip-address",
                &mut values,
                &ctx(),
            )
            .unwrap();

        let mut values: ArgValues = [("start_ip_address", "10.0.0.256")].into_iter().collect();
        let err = Validator::Ipv4Address
            .validate(
                "start_ip_address",
                "--start-ip-address",
                &mut values,
                &ctx(),
            )
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "argument --start-ip-address: invalid value '10.0.0.256': must be an IPv4 address"
        );
    }
}
