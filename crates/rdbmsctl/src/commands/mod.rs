//! Command implementations

use rdbmsctl_core::{ArgumentRegistry, CommandTable, Config, Scope};
use serde::Serialize;
use std::path::PathBuf;

use crate::error::{RdbmsCtlError, Result};
use crate::output::{self, OutputFormat};

pub mod complete;
pub mod config;
pub mod invoke;
pub mod registry;

/// Everything a command handler needs, loaded once in `main`
pub struct AppContext {
    pub table: CommandTable,
    pub registry: ArgumentRegistry,
    pub config: Config,
    /// Explicit `--config-file`, if any
    pub config_path: Option<PathBuf>,
    pub output: OutputFormat,
    pub query: Option<String>,
}

impl AppContext {
    /// Print `data` in the selected format, applying `--query`
    pub fn print<T: Serialize>(&self, data: T) -> Result<()> {
        output::print_output(data, self.output, self.query.as_deref())?;
        Ok(())
    }

    /// Parse a command scope given as words, e.g. `"mysql server show"`
    pub fn command_scope(&self, words: &str) -> Result<Scope> {
        let unknown = || RdbmsCtlError::UnknownCommand {
            command: words.trim().to_string(),
        };
        let scope = Scope::parse(words).map_err(|_| unknown())?;
        if self.table.has_scope(&scope) {
            Ok(scope)
        } else {
            Err(unknown())
        }
    }
}
