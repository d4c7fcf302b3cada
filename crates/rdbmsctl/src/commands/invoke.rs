//! Running `mysql ...` / `postgres ...` commands
//!
//! Parsed flags become an [`ArgValues`] namespace, `--ids` and configured
//! defaults fill the gaps, and the finalized request is printed. No
//! request is sent.

use clap::ArgMatches;
use clap::parser::MatchesError;
use rdbmsctl_core::{
    ArgValues, Config, Engine, OperationRequest, ResolvedArgument, ResolvedCommand, ResourceId,
    Scope, ValidationContext, ValueType,
};
use serde_json::Value;
use tracing::{debug, info};

use super::AppContext;
use crate::cli::engine::IDS_ARG;
use crate::error::{RdbmsCtlError, Result};

pub fn handle_engine_command(engine: Engine, matches: &ArgMatches, ctx: &AppContext) -> Result<()> {
    let (scope, leaf) = leaf_scope(engine, matches);
    info!("Command: {}", scope);

    let command = ctx
        .table
        .command(&scope)
        .ok_or_else(|| RdbmsCtlError::UnknownCommand {
            command: scope.to_string(),
        })?;
    let resolved = ctx.registry.resolve(command)?;

    let values = collect_values(&resolved, leaf)?;
    let validation = ValidationContext::new(ctx.config.defaults.subscription.clone());

    let ids: Vec<String> = if resolved.accepts_ids() {
        leaf.try_get_many::<String>(IDS_ARG)
            .map_err(matches_error)?
            .map(|ids| ids.cloned().collect())
            .unwrap_or_default()
    } else {
        Vec::new()
    };

    if ids.is_empty() {
        let request = finish(&resolved, values, &ctx.config, &validation)?;
        return ctx.print(request);
    }

    let requests = ids
        .iter()
        .map(|raw| {
            let id = ResourceId::parse(raw)?;
            let mut values = values.clone();
            resolved.apply_resource_id(&id, &mut values);
            finish(&resolved, values, &ctx.config, &validation)
        })
        .collect::<Result<Vec<_>>>()?;

    match requests.as_slice() {
        [single] => ctx.print(single),
        _ => ctx.print(&requests),
    }
}

/// Walk the subcommand chain down to the leaf
fn leaf_scope(engine: Engine, matches: &ArgMatches) -> (Scope, &ArgMatches) {
    let mut scope = Scope::engine(engine);
    let mut current = matches;
    while let Some((name, sub)) = current.subcommand() {
        scope = scope.child(name);
        current = sub;
    }
    (scope, current)
}

fn finish(
    resolved: &ResolvedCommand,
    mut values: ArgValues,
    config: &Config,
    validation: &ValidationContext,
) -> Result<OperationRequest> {
    resolved.apply_configured_defaults(&mut values, |key| config.configured_default(key));
    debug!("Finalizing {} with {} values", resolved.scope, values.len());
    Ok(resolved.finalize(values, validation)?)
}

/// Copy every flag given on the command line into a namespace keyed by dest
pub fn collect_values(resolved: &ResolvedCommand, matches: &ArgMatches) -> Result<ArgValues> {
    let mut values = ArgValues::new();
    for argument in resolved.visible_arguments() {
        if let Some(value) = read_value(argument, matches)? {
            values.set(argument.dest.clone(), value);
        }
    }
    Ok(values)
}

fn read_value(argument: &ResolvedArgument, matches: &ArgMatches) -> Result<Option<Value>> {
    let dest = argument.dest.as_str();
    let multiple = argument.nargs.is_multiple();

    let value = match &argument.value_type {
        ValueType::Int if multiple => matches
            .try_get_many::<i64>(dest)
            .map_err(matches_error)?
            .map(|items| Value::from(items.copied().collect::<Vec<_>>())),
        ValueType::Int => matches
            .try_get_one::<i64>(dest)
            .map_err(matches_error)?
            .map(|item| Value::from(*item)),
        ValueType::Object { .. } => matches
            .try_get_one::<Value>(dest)
            .map_err(matches_error)?
            .cloned(),
        value_type if multiple => matches
            .try_get_many::<String>(dest)
            .map_err(matches_error)?
            .map(|items| {
                Value::from(
                    items
                        .map(|item| canonical(value_type, item))
                        .collect::<Vec<_>>(),
                )
            }),
        value_type => matches
            .try_get_one::<String>(dest)
            .map_err(matches_error)?
            .map(|item| Value::from(canonical(value_type, item))),
    };
    Ok(value)
}

/// Enum values match case-insensitively but are sent as declared
fn canonical(value_type: &ValueType, raw: &str) -> String {
    if let ValueType::Enum { values } = value_type
        && let Some(declared) = values.iter().find(|value| value.eq_ignore_ascii_case(raw))
    {
        return declared.clone();
    }
    raw.to_string()
}

fn matches_error(err: MatchesError) -> RdbmsCtlError {
    RdbmsCtlError::InvalidInput {
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::engine::engine_command;
    use rdbmsctl_core::{CommandTable, load_arguments};
    use serde_json::json;

    fn parse(args: &[&str]) -> (ResolvedCommand, ArgValues) {
        let table = CommandTable::standard();
        let registry = load_arguments(&table).unwrap();
        let engine = Engine::from_command_group(args[0]).unwrap();
        let matches = engine_command(engine, &table, &registry)
            .unwrap()
            .try_get_matches_from(args)
            .unwrap();
        let (scope, leaf) = leaf_scope(engine, &matches);
        let resolved = registry.resolve(table.command(&scope).unwrap()).unwrap();
        let values = collect_values(&resolved, leaf).unwrap();
        (resolved, values)
    }

    #[test]
    fn test_collects_typed_values() {
        let (resolved, values) = parse(&[
            "mysql",
            "server",
            "create",
            "-g",
            "rg1",
            "-n",
            "orders",
            "--compute-units",
            "100",
            "--performance-tier",
            "standard",
            "--tags",
            "env=prod",
            "team",
        ]);
        assert_eq!(resolved.scope.to_string(), "mysql server create");
        assert_eq!(values.get("capacity"), Some(&json!(100)));
        assert_eq!(values.get_str("tier"), Some("Standard"));
        assert_eq!(values.get("tags"), Some(&json!(["env=prod", "team"])));
        assert!(!values.contains("location"));
    }

    #[test]
    fn test_download_collects_file_list() {
        let (_, values) = parse(&[
            "postgres",
            "server-logs",
            "download",
            "-g",
            "rg1",
            "-s",
            "analytics",
            "-n",
            "a.log",
            "b.log",
        ]);
        assert_eq!(values.get("file_name"), Some(&json!(["a.log", "b.log"])));
    }

    #[test]
    fn test_ids_fill_parts_before_defaults() {
        let (resolved, values) = parse(&["mysql", "server", "show"]);
        let id = ResourceId::parse(
            "/subscriptions/sub/resourceGroups/rg-from-id/providers/Microsoft.DBForMySQL/servers/orders",
        )
        .unwrap();
        let mut values = values;
        resolved.apply_resource_id(&id, &mut values);

        let mut config = Config::default();
        config.set_default("resource_group", "rg-default").unwrap();
        let request = finish(
            &resolved,
            values,
            &config,
            &ValidationContext::default(),
        )
        .unwrap();
        assert_eq!(
            request.parameters["resource_group_name"],
            json!("rg-from-id")
        );
        assert_eq!(request.parameters["server_name"], json!("orders"));
    }
}
