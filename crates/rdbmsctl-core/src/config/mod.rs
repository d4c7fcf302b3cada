#![allow(clippy::module_inception)]

//! Configuration for the rdbmsctl CLI
//!
//! Holds the defaults that fill `--resource-group` and `--location` when
//! they are omitted, the subscription used to build resource ids, and the
//! known resources that feed shell completion.

pub mod config;
pub mod error;

pub use config::{Config, Defaults, ResourceEntry};
pub use error::{ConfigError, Result};
