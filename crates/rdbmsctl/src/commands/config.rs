//! `config` commands

use rdbmsctl_core::Config;
use serde_json::json;
use tracing::info;

use super::AppContext;
use crate::cli::ConfigCommands;
use crate::error::Result;

pub fn handle_config_command(cmd: &ConfigCommands, ctx: &AppContext) -> Result<()> {
    match cmd {
        ConfigCommands::Show => ctx.print(&ctx.config),
        ConfigCommands::Path => {
            let path = match &ctx.config_path {
                Some(path) => path.clone(),
                None => Config::config_path()?,
            };
            ctx.print(json!({ "path": path.display().to_string() }))
        }
        ConfigCommands::SetDefault { key, value } => {
            let mut config = ctx.config.clone();
            config.set_default(key, value)?;
            match &ctx.config_path {
                Some(path) => config.save_to_path(path)?,
                None => config.save()?,
            }
            if value.is_empty() {
                info!("Cleared default '{}'", key);
            } else {
                info!("Set default '{}' to '{}'", key, value);
            }
            ctx.print(&config.defaults)
        }
    }
}
