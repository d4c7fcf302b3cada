//! # rdbmsctl-core
//!
//! Argument metadata for a CLI managing MySQL and PostgreSQL servers.
//!
//! The crate maps CLI flags onto management-API request fields. It does
//! not talk to the API; it describes, for every command, which flags
//! exist, what they are called, which ones are required or hidden, how
//! their values are checked and completed, and how the parsed values fold
//! back into the request body.
//!
//! ## Pieces
//!
//! - [`CommandTable`] - the command tree and each operation's parameters
//! - [`RegistryBuilder`] / [`ArgumentRegistry`] - scoped registrations
//!   (`argument`, `expand`, `ignore`, `extra`)
//! - [`load_arguments`] - the registration pass for both engines,
//!   validated against the command table
//! - [`ResolvedCommand`] - one command's final argument list, plus
//!   validation and request assembly
//! - [`Config`] - defaults and completion data from the config file
//!
//! ```rust
//! use rdbmsctl_core::{CommandTable, Engine, Scope, load_arguments};
//!
//! let table = CommandTable::standard();
//! let registry = load_arguments(&table).unwrap();
//! let create = table
//!     .command(&Scope::new(Engine::MySql, &["server", "create"]))
//!     .unwrap();
//! let resolved = registry.resolve(create).unwrap();
//! let login = resolved.argument("administrator_login").unwrap();
//! assert_eq!(login.options, vec!["--admin-user", "-u"]);
//! assert!(login.required);
//! ```

pub mod commands;
pub mod completers;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod params;
pub mod registry;
pub mod resolve;
pub mod resource_id;
pub mod scope;
pub mod settings;
pub mod validators;
pub mod values;

pub use commands::{CommandKind, CommandSpec, CommandTable, GroupSpec, ParamSpec};
pub use completers::{Completer, CompletionSource};
pub use config::{Config, ConfigError};
pub use engine::{Engine, EngineDescriptor};
pub use error::{CoreError, RegistryError, Result, ValidationError};
pub use models::{FieldSpec, ModelNamespace, ModelRef, ModelType};
pub use params::{VNET_RULE_SCOPE_ENGINES, build_registry, load_arguments};
pub use registry::{ArgumentContext, ArgumentRegistry, RegistryBuilder};
pub use resolve::{ArgOrigin, OperationRequest, ResolvedArgument, ResolvedCommand};
pub use resource_id::{ResourceId, ResourceIdError};
pub use scope::Scope;
pub use settings::{ArgSettings, ConfiguredDefault, IdPart, Nargs, ValueType, arg_types};
pub use validators::{ValidationContext, Validator};
pub use values::ArgValues;
