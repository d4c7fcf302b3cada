//! Shell completion providers
//!
//! A [`Completer`] only names where candidates come from. The candidates
//! themselves are looked up through a [`CompletionSource`], which the
//! configuration file implements.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Completer {
    /// Names of resources of one type, e.g. `Microsoft.DBForMySQL/servers`
    ResourceName { resource_type: String },
    Location,
    ResourceGroup,
}

/// Where completion candidates come from
pub trait CompletionSource {
    /// Names of resources of `resource_type`, optionally limited to one group
    fn resource_names(&self, resource_type: &str, resource_group: Option<&str>) -> Vec<String>;

    fn locations(&self) -> Vec<String>;

    fn resource_groups(&self) -> Vec<String>;
}

impl Completer {
    pub fn resource_name(resource_type: impl Into<String>) -> Self {
        Completer::ResourceName {
            resource_type: resource_type.into(),
        }
    }

    /// Sorted, de-duplicated candidates starting with `prefix` (case-insensitive)
    pub fn complete(
        &self,
        source: &dyn CompletionSource,
        prefix: &str,
        resource_group: Option<&str>,
    ) -> Vec<String> {
        let mut candidates = match self {
            Completer::ResourceName { resource_type } => {
                source.resource_names(resource_type, resource_group)
            }
            Completer::Location => source.locations(),
            Completer::ResourceGroup => source.resource_groups(),
        };

        let prefix = prefix.to_lowercase();
        candidates.retain(|candidate| candidate.to_lowercase().starts_with(&prefix));
        candidates.sort();
        candidates.dedup();
        candidates
    }
}
