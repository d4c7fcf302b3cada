//! Configuration management for rdbmsctl
//!
//! Configuration is stored in TOML format:
//!
//! ```toml
//! locations = ["westus", "eastus"]
//!
//! [defaults]
//! subscription = "${AZURE_SUBSCRIPTION_ID}"
//! resource_group = "rg1"
//! location = "westus"
//!
//! [[resources]]
//! type = "Microsoft.DBForMySQL/servers"
//! name = "orders"
//! resource_group = "rg1"
//! ```

#[cfg(target_os = "macos")]
use directories::BaseDirs;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::error::{ConfigError, Result};
use crate::completers::CompletionSource;
use crate::settings::ConfiguredDefault;

/// Locations offered for completion when the config lists none
const KNOWN_LOCATIONS: &[&str] = &[
    "australiaeast",
    "brazilsouth",
    "canadacentral",
    "centralindia",
    "centralus",
    "eastasia",
    "eastus",
    "eastus2",
    "francecentral",
    "japaneast",
    "koreacentral",
    "northcentralus",
    "northeurope",
    "southcentralus",
    "southeastasia",
    "uksouth",
    "westcentralus",
    "westeurope",
    "westus",
    "westus2",
];

/// Main configuration structure
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Locations offered by `--location` completion
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<String>,
    /// Values used when an argument is omitted
    #[serde(default)]
    pub defaults: Defaults,
    /// Known resources, used for completion
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<ResourceEntry>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Defaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResourceEntry {
    /// Fully qualified type, e.g. `Microsoft.DBForPostgreSQL/servers`
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
}

impl Config {
    /// Value configured for an argument default
    pub fn configured_default(&self, key: ConfiguredDefault) -> Option<String> {
        match key {
            ConfiguredDefault::ResourceGroup => self.defaults.resource_group.clone(),
            ConfiguredDefault::Location => self.defaults.location.clone(),
        }
    }

    /// Set one of the `[defaults]` keys; an empty value clears it
    pub fn set_default(&mut self, key: &str, value: &str) -> Result<()> {
        let value = (!value.is_empty()).then(|| value.to_string());
        let slot = match key {
            "subscription" => &mut self.defaults.subscription,
            "resource_group" | "group" => &mut self.defaults.resource_group,
            "location" => &mut self.defaults.location,
            _ => {
                return Err(ConfigError::UnknownKey {
                    key: key.to_string(),
                });
            }
        };
        *slot = value;
        Ok(())
    }

    /// Load configuration from the standard location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::LoadError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        // Expand environment variables in the config content
        let expanded_content = Self::expand_env_vars(&content);

        let config: Config = toml::from_str(&expanded_content)?;

        Ok(config)
    }

    /// Save configuration to the standard location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to_path(&config_path)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        // Create parent directories if they don't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::SaveError {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        fs::write(config_path, content).map_err(|e| ConfigError::SaveError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        Ok(())
    }

    /// Get the path to the configuration file
    ///
    /// On macOS, `~/.config/rdbmsctl/config.toml` is used when it (or its
    /// directory) exists, otherwise the platform location.
    ///
    /// On Linux: ~/.config/rdbmsctl/config.toml
    /// On Windows: %APPDATA%\rdbmsctl\rdbmsctl\config.toml
    pub fn config_path() -> Result<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            if let Some(base_dirs) = BaseDirs::new() {
                let linux_style_path = base_dirs
                    .home_dir()
                    .join(".config")
                    .join("rdbmsctl")
                    .join("config.toml");

                if linux_style_path.exists()
                    || linux_style_path
                        .parent()
                        .map(|p| p.exists())
                        .unwrap_or(false)
                {
                    return Ok(linux_style_path);
                }
            }
        }

        let proj_dirs =
            ProjectDirs::from("com", "rdbmsctl", "rdbmsctl").ok_or(ConfigError::ConfigDirError)?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Expand environment variables in configuration content
    ///
    /// Supports ${VAR} and ${VAR:-default}. Unset variables without a
    /// default are left as written.
    fn expand_env_vars(content: &str) -> String {
        let expanded =
            shellexpand::env_with_context_no_errors(content, |var| std::env::var(var).ok());
        expanded.to_string()
    }
}

impl CompletionSource for Config {
    fn resource_names(&self, resource_type: &str, resource_group: Option<&str>) -> Vec<String> {
        self.resources
            .iter()
            .filter(|entry| entry.resource_type.eq_ignore_ascii_case(resource_type))
            .filter(|entry| match (resource_group, entry.resource_group.as_deref()) {
                (Some(wanted), Some(actual)) => wanted.eq_ignore_ascii_case(actual),
                (Some(_), None) => false,
                (None, _) => true,
            })
            .map(|entry| entry.name.clone())
            .collect()
    }

    fn locations(&self) -> Vec<String> {
        if self.locations.is_empty() {
            KNOWN_LOCATIONS.iter().map(|l| l.to_string()).collect()
        } else {
            self.locations.clone()
        }
    }

    fn resource_groups(&self) -> Vec<String> {
        self.defaults
            .resource_group
            .iter()
            .chain(
                self.resources
                    .iter()
                    .filter_map(|entry| entry.resource_group.as_ref()),
            )
            .cloned()
            .collect()
    }
}
