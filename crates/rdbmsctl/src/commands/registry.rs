//! `registry` commands: inspect registrations and resolved arguments

use rdbmsctl_core::{CommandKind, Engine, ResolvedCommand};
use serde::Serialize;
use tracing::debug;

use super::AppContext;
use crate::cli::RegistryCommands;
use crate::error::Result;

/// One row of `registry commands`
#[derive(Debug, Serialize)]
struct CommandRow {
    command: String,
    operation: CommandKind,
    accepts_ids: bool,
    summary: &'static str,
}

pub fn handle_registry_command(cmd: &RegistryCommands, ctx: &AppContext) -> Result<()> {
    match cmd {
        RegistryCommands::Show { scope: None } => ctx.print(&ctx.registry),
        RegistryCommands::Show { scope: Some(words) } => handle_show(words, ctx),
        RegistryCommands::Commands { engine } => handle_commands(*engine, ctx),
    }
}

fn handle_show(words: &str, ctx: &AppContext) -> Result<()> {
    let scope = ctx.command_scope(words)?;

    if let Some(command) = ctx.table.command(&scope) {
        return ctx.print(ctx.registry.resolve(command)?);
    }

    let resolved = ctx
        .table
        .commands_under(&scope)
        .map(|command| ctx.registry.resolve(command))
        .collect::<std::result::Result<Vec<ResolvedCommand>, _>>()?;
    debug!("Resolved {} commands under '{}'", resolved.len(), scope);
    ctx.print(resolved)
}

fn handle_commands(engine: Option<Engine>, ctx: &AppContext) -> Result<()> {
    let mut rows = Vec::new();
    for command in ctx.table.commands() {
        if engine.is_some_and(|engine| command.scope.engine_id() != Some(engine)) {
            continue;
        }
        rows.push(CommandRow {
            command: command.scope.to_string(),
            operation: command.kind,
            accepts_ids: ctx.registry.resolve(command)?.accepts_ids(),
            summary: command.summary,
        });
    }
    ctx.print(rows)
}
