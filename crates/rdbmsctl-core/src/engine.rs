//! Database engines and their per-engine descriptors

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::completers::Completer;
use crate::models::ModelNamespace;

/// Supported database engines
#[derive(
    Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    #[value(name = "mysql")]
    #[serde(rename = "mysql")]
    MySql,
    Postgres,
}

impl Engine {
    /// All engines in registration order
    pub const ALL: [Engine; 2] = [Engine::MySql, Engine::Postgres];

    /// Top-level command group for this engine
    pub fn command_group(&self) -> &'static str {
        match self {
            Engine::MySql => "mysql",
            Engine::Postgres => "postgres",
        }
    }

    /// Look up an engine by its command group name
    pub fn from_command_group(name: &str) -> Option<Engine> {
        Engine::ALL
            .into_iter()
            .find(|engine| engine.command_group() == name)
    }

    /// Resource provider namespace in the management API
    pub fn provider_namespace(&self) -> &'static str {
        match self {
            Engine::MySql => "Microsoft.DBForMySQL",
            Engine::Postgres => "Microsoft.DBForPostgreSQL",
        }
    }

    /// Fully qualified resource type of a server
    pub fn server_resource_type(&self) -> String {
        format!("{}/servers", self.provider_namespace())
    }

    /// Server versions accepted by `--version`
    pub fn server_versions(&self) -> &'static [&'static str] {
        match self {
            Engine::MySql => &["5.6", "5.7"],
            Engine::Postgres => &["9.5", "9.6"],
        }
    }

    /// Descriptor consumed by the shared registration procedure
    pub fn descriptor(&self) -> EngineDescriptor {
        EngineDescriptor {
            engine: *self,
            models: ModelNamespace::new(*self),
            server_completer: Completer::resource_name(self.server_resource_type()),
        }
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.command_group())
    }
}

/// Everything the registration pass needs to know about one engine.
///
/// Field names and types come from `models`, so both engines share one
/// registration procedure without duplicating schema knowledge.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineDescriptor {
    pub engine: Engine,
    pub models: ModelNamespace,
    pub server_completer: Completer,
}
