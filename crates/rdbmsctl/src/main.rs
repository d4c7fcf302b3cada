use anyhow::Result;
use clap::{ArgMatches, Command, FromArgMatches};
use clap_complete::{generate, shells};
use rdbmsctl_core::{CommandTable, Config, Engine, load_arguments};
use tracing::{debug, info, trace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod error;
mod output;

use cli::{Commands, ConfigCommands, GlobalArgs, RegistryCommands};
use commands::AppContext;
use error::RdbmsCtlError;

fn main() -> Result<()> {
    let table = CommandTable::standard();
    let registry = load_arguments(&table)?;
    let cli = cli::build_cli(&table, &registry)?;
    let matches = cli.clone().get_matches();
    let globals = GlobalArgs::from_arg_matches(&matches)?;

    // Initialize tracing based on verbosity level
    init_tracing(globals.verbose);

    // Load configuration from specified path or default location
    let (config, config_path) = if let Some(config_file) = &globals.config_file {
        let path = std::path::PathBuf::from(config_file);
        debug!("Loading config from explicit path: {:?}", path);
        let config = Config::load_from_path(&path)?;
        (config, Some(path))
    } else {
        debug!("Loading config from default location");
        (Config::load()?, None)
    };

    let ctx = AppContext {
        table,
        registry,
        config,
        config_path,
        output: globals.output,
        query: globals.query,
    };

    if let Err(e) = execute_command(&matches, &ctx, cli) {
        e.print_diagnostic();
        std::process::exit(1);
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    // Check for RUST_LOG env var first, then fall back to verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "rdbmsctl=warn,rdbmsctl_core=warn",
            1 => "rdbmsctl=info,rdbmsctl_core=info",
            2 => "rdbmsctl=debug,rdbmsctl_core=debug",
            _ => "rdbmsctl=trace,rdbmsctl_core=trace",
        };
        tracing_subscriber::EnvFilter::new(level)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact(),
        )
        .init();

    debug!("Tracing initialized with verbosity level: {}", verbose);
}

fn execute_command(
    matches: &ArgMatches,
    ctx: &AppContext,
    cli: Command,
) -> Result<(), RdbmsCtlError> {
    let start = std::time::Instant::now();

    let result = if let Some((name, sub)) = matches.subcommand()
        && let Some(engine) = Engine::from_command_group(name)
    {
        commands::invoke::handle_engine_command(engine, sub, ctx)
    } else {
        let command = Commands::from_arg_matches(matches)?;
        trace!("Executing command: {:?}", command);
        info!("Command: {}", format_command(&command));
        run_fixed_command(&command, ctx, cli)
    };

    debug!("Command completed in {:?}", start.elapsed());
    result
}

fn run_fixed_command(
    command: &Commands,
    ctx: &AppContext,
    cli: Command,
) -> Result<(), RdbmsCtlError> {
    match command {
        Commands::Version => {
            debug!("Showing version information");
            match ctx.output {
                output::OutputFormat::Table => {
                    println!("rdbmsctl {}", env!("CARGO_PKG_VERSION"));
                    Ok(())
                }
                _ => ctx.print(serde_json::json!({
                    "version": env!("CARGO_PKG_VERSION"),
                    "name": env!("CARGO_PKG_NAME"),
                })),
            }
        }
        Commands::Completions { shell } => {
            debug!("Generating completions for {:?}", shell);
            generate_completions(cli, *shell);
            Ok(())
        }
        Commands::Registry(cmd) => commands::registry::handle_registry_command(cmd, ctx),
        Commands::Config(cmd) => commands::config::handle_config_command(cmd, ctx),
        Commands::Complete {
            command,
            option,
            prefix,
            resource_group,
        } => commands::complete::handle_complete(
            command,
            option,
            prefix,
            resource_group.as_deref(),
            ctx,
        ),
    }
}

fn generate_completions(mut cmd: Command, shell: cli::Shell) {
    let name = cmd.get_name().to_string();

    match shell {
        cli::Shell::Bash => generate(shells::Bash, &mut cmd, name, &mut std::io::stdout()),
        cli::Shell::Zsh => generate(shells::Zsh, &mut cmd, name, &mut std::io::stdout()),
        cli::Shell::Fish => generate(shells::Fish, &mut cmd, name, &mut std::io::stdout()),
        cli::Shell::PowerShell => {
            generate(shells::PowerShell, &mut cmd, name, &mut std::io::stdout())
        }
        cli::Shell::Elvish => generate(shells::Elvish, &mut cmd, name, &mut std::io::stdout()),
    }
}

/// Format command for human-readable logging
fn format_command(command: &Commands) -> String {
    match command {
        Commands::Version => "version".to_string(),
        Commands::Completions { shell } => format!("completions {:?}", shell),
        Commands::Registry(RegistryCommands::Show { scope }) => match scope {
            Some(scope) => format!("registry show '{}'", scope),
            None => "registry show".to_string(),
        },
        Commands::Registry(RegistryCommands::Commands { engine }) => match engine {
            Some(engine) => format!("registry commands {}", engine),
            None => "registry commands".to_string(),
        },
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => "config show".to_string(),
            ConfigCommands::Path => "config path".to_string(),
            ConfigCommands::SetDefault { key, .. } => format!("config set-default {}", key),
        },
        Commands::Complete {
            command, option, ..
        } => format!("__complete '{}' {}", command, option),
    }
}
