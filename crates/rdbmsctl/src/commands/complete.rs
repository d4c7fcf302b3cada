//! Hidden `__complete` command used by shell completion scripts

use super::AppContext;
use crate::error::{RdbmsCtlError, Result};

pub fn handle_complete(
    command: &str,
    option: &str,
    prefix: &str,
    resource_group: Option<&str>,
    ctx: &AppContext,
) -> Result<()> {
    let scope = ctx.command_scope(command)?;
    let spec = ctx
        .table
        .command(&scope)
        .ok_or_else(|| RdbmsCtlError::UnknownCommand {
            command: command.to_string(),
        })?;
    let resolved = ctx.registry.resolve(spec)?;

    let no_completer = || RdbmsCtlError::NoCompleter {
        command: command.to_string(),
        option: option.to_string(),
    };
    let completer = resolved
        .visible_arguments()
        .find(|argument| argument.dest == option || argument.options.iter().any(|o| o == option))
        .ok_or_else(no_completer)?
        .completer
        .as_ref()
        .ok_or_else(no_completer)?;

    for candidate in completer.complete(&ctx.config, prefix, resource_group) {
        println!("{}", candidate);
    }
    Ok(())
}
