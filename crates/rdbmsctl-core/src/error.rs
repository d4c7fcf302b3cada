//! Unified error handling for rdbmsctl-core
//!
//! Registration mistakes (a misspelt scope, a dest no command takes, two
//! arguments fighting over one option string) surface as
//! [`RegistryError`] when the registry is loaded. Bad user input surfaces
//! as [`ValidationError`] when a command is finalized.

use thiserror::Error;

use crate::config::ConfigError;
use crate::resource_id::ResourceIdError;

/// Problems found while checking the registry against the command table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Unknown command scope '{scope}'")]
    UnknownScope { scope: String },

    #[error("Command '{scope}' not found")]
    UnknownCommand { scope: String },

    #[error("Argument '{dest}' registered on '{scope}' matches no command parameter")]
    UnknownArgument { scope: String, dest: String },

    #[error("Extra argument '{dest}' registered on '{scope}', which is not a command")]
    ExtraOnGroup { scope: String, dest: String },

    #[error("Option '{option}' is used by both '{first}' and '{second}' in '{command}'")]
    ConflictingOption {
        command: String,
        option: String,
        first: String,
        second: String,
    },
}

/// Invalid argument values, reported to the user
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("incorrect usage: {0}")]
    IncorrectUsage(String),

    #[error("argument {option}: invalid value '{value}': {reason}")]
    InvalidValue {
        option: String,
        value: String,
        reason: String,
    },

    #[error("the following arguments are required: {options}")]
    MissingRequired { options: String },

    #[error("No subscription configured. Set 'subscription' under [defaults] in the config file.")]
    MissingSubscription,

    #[error(transparent)]
    ResourceId(#[from] ResourceIdError),
}

/// Core error type
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
