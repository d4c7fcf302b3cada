//! Error types for rdbmsctl
//!
//! Defines structured error types using thiserror and prints them as
//! cargo-style diagnostics.

use colored::Colorize;
use rdbmsctl_core::{ConfigError, CoreError, RegistryError, ResourceIdError, ValidationError};
use thiserror::Error;

/// Cargo-style diagnostic formatter for CLI errors.
///
/// Produces structured output like:
/// ```text
/// error: the following arguments are required: --admin-user/-u
///
///   tip: see the arguments of this command:
///       rdbmsctl <command> --help
/// ```
pub struct CliDiagnostic {
    message: String,
    detail: Option<String>,
    tips: Vec<(String, Vec<String>)>,
}

impl CliDiagnostic {
    /// Start a new error diagnostic with the given message.
    pub fn error(message: &str) -> Self {
        Self {
            message: message.to_string(),
            detail: None,
            tips: Vec::new(),
        }
    }

    /// Add a detail line below the error message.
    pub fn detail(mut self, text: &str) -> Self {
        self.detail = Some(text.to_string());
        self
    }

    /// Add a tip with optional example commands.
    pub fn tip(mut self, description: &str, commands: &[&str]) -> Self {
        self.tips.push((
            description.to_string(),
            commands.iter().map(|s| s.to_string()).collect(),
        ));
        self
    }

    /// Print the diagnostic to stderr with colored formatting.
    pub fn print(&self) {
        eprint!("{}{}", "error".red().bold(), ": ".bold());
        eprintln!("{}", self.message);

        if let Some(detail) = &self.detail {
            eprintln!("  {}", detail);
        }

        for (description, commands) in &self.tips {
            eprintln!();
            eprint!("  {}{}", "tip".yellow().bold(), ": ".bold());
            eprintln!("{}", description);
            for cmd in commands {
                eprintln!("      {}", cmd);
            }
        }
    }
}

/// Main error type for the rdbmsctl application
#[derive(Error, Debug)]
pub enum RdbmsCtlError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Argument registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    InvalidResourceId(#[from] ResourceIdError),

    #[error("Command '{command}' not found")]
    UnknownCommand { command: String },

    #[error("Option '{option}' of '{command}' has no completion source")]
    NoCompleter { command: String, option: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Output formatting error: {message}")]
    OutputError { message: String },
}

/// Result type for rdbmsctl operations
pub type Result<T> = std::result::Result<T, RdbmsCtlError>;

impl RdbmsCtlError {
    /// Get helpful suggestions for resolving this error
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            RdbmsCtlError::Validation(ValidationError::MissingRequired { .. }) => vec![
                "Check the command syntax: rdbmsctl <command> --help".to_string(),
                "Store defaults for -g/--resource-group and -l/--location: rdbmsctl config set-default <key> <value>".to_string(),
            ],
            RdbmsCtlError::Validation(ValidationError::MissingSubscription) => vec![
                "Set a subscription: rdbmsctl config set-default subscription <id>".to_string(),
                "Or pass a full subnet resource id to --subnet".to_string(),
            ],
            RdbmsCtlError::Validation(ValidationError::IncorrectUsage(_)) => vec![
                "Check the command syntax: rdbmsctl <command> --help".to_string(),
            ],
            RdbmsCtlError::InvalidResourceId(_) => vec![
                "Resource ids look like /subscriptions/<sub>/resourceGroups/<group>/providers/<namespace>/<type>/<name>".to_string(),
                "Or name the resource directly, e.g. -g <group> -n <name>".to_string(),
            ],
            RdbmsCtlError::Configuration(_) => vec![
                "Check the configuration file: rdbmsctl config path".to_string(),
                "Verify the file is valid TOML".to_string(),
            ],
            RdbmsCtlError::UnknownCommand { .. } => vec![
                "List available commands: rdbmsctl registry commands".to_string(),
            ],
            _ => vec![],
        }
    }

    /// Print a cargo-style diagnostic to stderr using colored formatting.
    pub fn print_diagnostic(&self) {
        let mut diag = CliDiagnostic::error(&format!("{}", self));

        if matches!(self, RdbmsCtlError::Registry(_)) {
            diag = diag.detail(
                "The built-in argument registrations are inconsistent with the command table.",
            );
        }

        for suggestion in self.suggestions() {
            diag = diag.tip(&suggestion, &[]);
        }

        diag.print();
    }
}

impl From<ConfigError> for RdbmsCtlError {
    fn from(err: ConfigError) -> Self {
        RdbmsCtlError::Configuration(err.to_string())
    }
}

impl From<CoreError> for RdbmsCtlError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Registry(err) => RdbmsCtlError::Registry(err),
            CoreError::Validation(err) => RdbmsCtlError::Validation(err),
            CoreError::Config(err) => RdbmsCtlError::from(err),
        }
    }
}

impl From<clap::Error> for RdbmsCtlError {
    fn from(err: clap::Error) -> Self {
        RdbmsCtlError::InvalidInput {
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for RdbmsCtlError {
    fn from(err: anyhow::Error) -> Self {
        RdbmsCtlError::OutputError {
            message: format!("{:#}", err),
        }
    }
}
