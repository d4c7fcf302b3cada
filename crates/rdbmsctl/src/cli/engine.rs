//! clap command trees for the `mysql` and `postgres` groups
//!
//! Each leaf gets one clap argument per visible resolved argument, keyed
//! by dest. Arguments are never marked required here: `--ids`, configured
//! defaults and validators can all supply values after parsing, so the
//! required check runs on the finished namespace instead.

use clap::builder::{PossibleValue, PossibleValuesParser};
use clap::{Arg, ArgAction, Command};
use rdbmsctl_core::{
    ArgumentRegistry, CommandTable, Engine, Nargs, RegistryError, ResolvedArgument,
    ResolvedCommand, Scope, ValueType,
};
use serde_json::Value;

/// Argument id of the `--ids` flag
pub const IDS_ARG: &str = "ids";

pub fn engine_command(
    engine: Engine,
    table: &CommandTable,
    registry: &ArgumentRegistry,
) -> Result<Command, RegistryError> {
    group_command(&Scope::engine(engine), table, registry)
}

fn group_command(
    scope: &Scope,
    table: &CommandTable,
    registry: &ArgumentRegistry,
) -> Result<Command, RegistryError> {
    let name = scope.name().unwrap_or_default().to_string();
    let mut command = Command::new(name)
        .subcommand_required(true)
        .arg_required_else_help(true);
    if let Some(group) = table.group(scope) {
        command = command.about(group.summary);
    }

    for child in table.children(scope) {
        let sub = match table.command(&child) {
            Some(spec) => leaf_command(&registry.resolve(spec)?),
            None => group_command(&child, table, registry)?,
        };
        command = command.subcommand(sub);
    }

    Ok(command)
}

fn leaf_command(resolved: &ResolvedCommand) -> Command {
    let name = resolved.scope.name().unwrap_or_default().to_string();
    let mut command = Command::new(name).about(resolved.summary.clone());

    for argument in resolved.visible_arguments() {
        command = command.arg(clap_arg(argument));
    }

    if resolved.accepts_ids() {
        let id_dests: Vec<String> = resolved
            .visible_arguments()
            .filter(|argument| argument.id_part.is_some())
            .map(|argument| argument.dest.clone())
            .collect();
        command = command.arg(
            Arg::new(IDS_ARG)
                .long("ids")
                .help(
                    "One or more resource IDs (space-delimited). If provided, no other \
                     'Resource Id' arguments should be specified.",
                )
                .help_heading("Resource Id")
                .num_args(1..)
                .action(ArgAction::Append)
                .conflicts_with_all(id_dests),
        );
    }

    command
}

fn clap_arg(argument: &ResolvedArgument) -> Arg {
    let mut arg = Arg::new(argument.dest.clone()).value_name(argument.dest.to_uppercase());

    if let Some(long) = argument.long() {
        arg = arg.long(long.trim_start_matches("--").to_string());
    }
    let aliases: Vec<String> = argument
        .long_aliases()
        .into_iter()
        .map(|alias| alias.trim_start_matches("--").to_string())
        .collect();
    if !aliases.is_empty() {
        arg = arg.visible_aliases(aliases);
    }
    if let Some(short) = argument.short() {
        arg = arg.short(short);
    }
    if let Some(help) = &argument.help {
        arg = arg.help(help.clone());
    }
    if let Some(group) = &argument.arg_group {
        arg = arg.help_heading(group.clone());
    } else if argument.id_part.is_some() {
        arg = arg.help_heading("Resource Id");
    }

    arg = match &argument.value_type {
        ValueType::Int => arg.value_parser(clap::value_parser!(i64)),
        ValueType::Enum { values } => arg
            .value_parser(PossibleValuesParser::new(
                values.iter().map(|value| PossibleValue::new(value.clone())),
            ))
            .ignore_case(true),
        ValueType::Object { .. } => arg
            .value_parser(|raw: &str| serde_json::from_str::<Value>(raw))
            .value_name("JSON"),
        ValueType::String | ValueType::Dict => arg,
    };

    match argument.nargs {
        Nargs::One => arg.action(ArgAction::Set),
        Nargs::ZeroOrMore => arg.num_args(0..).action(ArgAction::Append),
        Nargs::OneOrMore => arg.num_args(1..).action(ArgAction::Append),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdbmsctl_core::load_arguments;

    fn engine(engine: Engine) -> Command {
        let table = CommandTable::standard();
        let registry = load_arguments(&table).unwrap();
        engine_command(engine, &table, &registry).unwrap()
    }

    fn find<'a>(command: &'a Command, path: &[&str]) -> &'a Command {
        path.iter().fold(command, |command, word| {
            command
                .find_subcommand(word)
                .unwrap_or_else(|| panic!("missing subcommand {word}"))
        })
    }

    #[test]
    fn test_engine_tree_builds() {
        for e in Engine::ALL {
            engine(e).debug_assert();
        }
    }

    #[test]
    fn test_create_arguments() {
        let mysql = engine(Engine::MySql);
        let create = find(&mysql, &["server", "create"]);
        let login = create
            .get_arguments()
            .find(|arg| arg.get_id() == "administrator_login")
            .unwrap();
        assert_eq!(login.get_long(), Some("admin-user"));
        assert_eq!(login.get_short(), Some('u'));
        assert!(!login.is_required_set());
        assert!(create.get_arguments().all(|arg| arg.get_id() != "sku"));
        assert!(create.get_arguments().all(|arg| arg.get_id() != IDS_ARG));
    }

    #[test]
    fn test_value_name_is_upper_dest() {
        let mysql = engine(Engine::MySql);
        let create = find(&mysql, &["server", "firewall-rule", "create"]);
        let start = create
            .get_arguments()
            .find(|arg| arg.get_id() == "start_ip_address")
            .unwrap();
        let names: Vec<String> = start
            .get_value_names()
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(names, vec!["START_IP_ADDRESS"]);
    }

    #[test]
    fn test_ids_on_show() {
        let postgres = engine(Engine::Postgres);
        let show = find(&postgres, &["server", "vnet-rule", "show"]);
        assert!(show.get_arguments().any(|arg| arg.get_id() == IDS_ARG));
    }

    #[test]
    fn test_vnet_rule_only_under_postgres() {
        assert!(
            engine(Engine::MySql)
                .find_subcommand("server")
                .unwrap()
                .find_subcommand("vnet-rule")
                .is_none()
        );
    }
}
