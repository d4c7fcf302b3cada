//! CLI structure and command definitions
//!
//! The fixed part of the interface (global flags, `registry`, `config`,
//! `completions`, `version`) is declared with clap derive. The `mysql`
//! and `postgres` trees are generated from the command table and the
//! argument registry, see [`engine`].

use clap::{Args, Command, Subcommand};
use rdbmsctl_core::{ArgumentRegistry, CommandTable, Engine, RegistryError};

use crate::output::OutputFormat;

pub mod engine;

const ABOUT: &str = "Manage Azure Database for MySQL and PostgreSQL servers";

const LONG_ABOUT: &str = "
Manage Azure Database for MySQL and PostgreSQL servers

Commands print the management request they would send instead of
sending it, which makes them useful for checking flags and defaults.

EXAMPLES:
    # Create a MySQL server
    rdbmsctl mysql server create -g rg1 -n orders -u admin -p secret -l westus

    # Allow every Azure-internal address through the firewall
    rdbmsctl postgres server firewall-rule create -g rg1 -s analytics -n azure \\
        --start-ip-address 0.0.0.0 --end-ip-address 0.0.0.0

    # Address an existing resource by id
    rdbmsctl mysql server show --ids /subscriptions/SUB/resourceGroups/rg1/providers/Microsoft.DBForMySQL/servers/orders

    # Inspect the arguments of one command
    rdbmsctl registry show 'mysql server create'

    # Store a default resource group
    rdbmsctl config set-default resource_group rg1

For more help on a specific command, run:
    rdbmsctl <command> --help
";

/// Global options shared by every command
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Path to alternate configuration file
    #[arg(long, global = true, env = "RDBMSCTL_CONFIG_FILE")]
    pub config_file: Option<String>,

    /// Output format
    #[arg(long, short = 'o', global = true, value_enum, default_value = "json")]
    pub output: OutputFormat,

    /// JMESPath query to filter output
    #[arg(long, short = 'q', global = true)]
    pub query: Option<String>,

    /// Enable verbose logging
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Top-level commands that do not depend on the registry
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect the argument registry
    #[command(subcommand)]
    #[command(after_help = "EXAMPLES:
    # Dump every registration
    rdbmsctl registry show

    # Effective arguments of one command
    rdbmsctl registry show 'postgres server vnet-rule create'

    # All commands of one engine as a table
    rdbmsctl registry commands mysql -o table
")]
    Registry(RegistryCommands),

    /// Configuration file management
    #[command(subcommand)]
    #[command(after_help = "EXAMPLES:
    # Show where the configuration lives
    rdbmsctl config path

    # Set defaults used when -g/--resource-group or -l/--location is omitted
    rdbmsctl config set-default resource_group rg1
    rdbmsctl config set-default location westus

    # Subscription used to build subnet ids from --subnet NAME --vnet-name NAME
    rdbmsctl config set-default subscription 00000000-0000-0000-0000-000000000000
")]
    Config(ConfigCommands),

    /// Version information
    #[command(visible_alias = "ver")]
    Version,

    /// Generate shell completions
    #[command(visible_alias = "comp")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Complete an option value from the configuration file
    #[command(name = "__complete", hide = true)]
    Complete {
        /// Command words, e.g. "mysql server show"
        command: String,

        /// Option being completed, e.g. "--name"
        #[arg(allow_hyphen_values = true)]
        option: String,

        /// Text typed so far
        #[arg(default_value = "", allow_hyphen_values = true)]
        prefix: String,

        /// Resource group already given on the command line
        #[arg(long)]
        resource_group: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum RegistryCommands {
    /// Show registrations, or the effective arguments under a scope
    Show {
        /// Command scope, e.g. "mysql server create"
        scope: Option<String>,
    },

    /// List commands
    Commands {
        /// Only list commands of this engine
        #[arg(value_enum)]
        engine: Option<Engine>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the loaded configuration
    Show,

    /// Show the configuration file path
    Path,

    /// Set a default (subscription, resource_group or location); an empty value clears it
    SetDefault {
        key: String,
        #[arg(default_value = "")]
        value: String,
    },
}

/// Supported shells for completion generation
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bourne Again Shell
    Bash,
    /// Z Shell
    Zsh,
    /// Friendly Interactive Shell
    Fish,
    /// PowerShell
    #[value(name = "powershell", alias = "power-shell")]
    PowerShell,
    /// Elvish
    Elvish,
}

/// The complete command line: fixed commands plus one tree per engine
pub fn build_cli(
    table: &CommandTable,
    registry: &ArgumentRegistry,
) -> Result<Command, RegistryError> {
    let mut cli = Command::new("rdbmsctl")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true);
    cli = GlobalArgs::augment_args(cli);
    cli = <Commands as Subcommand>::augment_subcommands(cli);
    // The derive applies the enums' doc comments as about text; set ours last.
    cli = cli.about(ABOUT).long_about(LONG_ABOUT);

    for engine in Engine::ALL {
        cli = cli.subcommand(engine::engine_command(engine, table, registry)?);
    }

    Ok(cli)
}
