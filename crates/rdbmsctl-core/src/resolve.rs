//! Resolved commands
//!
//! A [`ResolvedCommand`] is what a parser needs to expose one command:
//! the final argument list after layering, expansion and suppression.
//! After parsing it also turns the flat values back into the nested
//! request the operation expects.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

use crate::commands::CommandKind;
use crate::completers::Completer;
use crate::error::{RegistryError, ValidationError};
use crate::models::{ModelRef, ModelType};
use crate::resource_id::ResourceId;
use crate::scope::Scope;
use crate::settings::{ArgSettings, ConfiguredDefault, IdPart, Nargs, ValueType};
use crate::validators::{ValidationContext, Validator};
use crate::values::ArgValues;

/// Where a resolved argument came from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArgOrigin {
    /// A parameter of the operation
    Parameter,
    /// A field of an expanded model
    Field { parent: String, model: ModelType },
    /// A CLI-only argument
    Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedArgument {
    pub dest: String,
    pub options: Vec<String>,
    pub required: bool,
    pub value_type: ValueType,
    pub nargs: Nargs,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arg_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validator: Option<Validator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completer: Option<Completer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_part: Option<IdPart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configured_default: Option<ConfiguredDefault>,
    pub ignored: bool,
    pub origin: ArgOrigin,
}

impl ResolvedArgument {
    pub(crate) fn new(dest: &str, settings: ArgSettings, origin: ArgOrigin) -> Self {
        let ignored = settings.ignored.unwrap_or(false);
        Self {
            dest: dest.to_string(),
            options: settings
                .options
                .unwrap_or_else(|| vec![format!("--{}", dest.replace('_', "-"))]),
            required: settings.required.unwrap_or(false) && !ignored,
            value_type: settings.value_type.unwrap_or(ValueType::String),
            nargs: settings.nargs.unwrap_or_default(),
            arg_group: settings.arg_group,
            help: settings.help,
            validator: settings.validator,
            completer: settings.completer,
            id_part: settings.id_part,
            configured_default: settings.configured_default,
            ignored,
            origin,
        }
    }

    /// First `--long` option
    pub fn long(&self) -> Option<&str> {
        self.long_options().next()
    }

    /// `--long` options after the first
    pub fn long_aliases(&self) -> Vec<&str> {
        self.long_options().skip(1).collect()
    }

    /// First single-character `-x` option
    pub fn short(&self) -> Option<char> {
        self.options.iter().find_map(|option| {
            let rest = option.strip_prefix('-')?;
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c != '-' => Some(c),
                _ => None,
            }
        })
    }

    /// Options joined for messages: `--admin-user/-u`
    pub fn display_options(&self) -> String {
        self.options.join("/")
    }

    fn long_options(&self) -> impl Iterator<Item = &str> {
        self.options
            .iter()
            .map(String::as_str)
            .filter(|option| option.starts_with("--"))
    }
}

/// A model dest that was flattened into its fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpandedParam {
    pub dest: String,
    pub model: ModelRef,
}

/// The request a command would send
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationRequest {
    pub command: String,
    pub operation: CommandKind,
    pub parameters: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedCommand {
    pub scope: Scope,
    pub kind: CommandKind,
    pub summary: String,
    /// Operation parameter dests, in signature order
    pub parameters: Vec<String>,
    pub arguments: Vec<ResolvedArgument>,
    /// Expanded dests, innermost first
    pub expansions: Vec<ExpandedParam>,
}

impl ResolvedCommand {
    pub fn argument(&self, dest: &str) -> Option<&ResolvedArgument> {
        self.arguments.iter().find(|arg| arg.dest == dest)
    }

    /// Arguments exposed on the command line
    pub fn visible_arguments(&self) -> impl Iterator<Item = &ResolvedArgument> {
        self.arguments.iter().filter(|arg| !arg.ignored)
    }

    /// Whether `--ids` can stand in for the id-part arguments
    pub fn accepts_ids(&self) -> bool {
        self.kind.accepts_ids()
            && self
                .visible_arguments()
                .any(|arg| matches!(arg.id_part, Some(IdPart::Name | IdPart::ChildName1)))
    }

    pub(crate) fn check_option_conflicts(&self) -> Result<(), RegistryError> {
        let mut seen: HashMap<&str, &str> = HashMap::new();
        for arg in self.visible_arguments() {
            for option in &arg.options {
                if let Some(first) = seen.insert(option.as_str(), arg.dest.as_str()) {
                    return Err(RegistryError::ConflictingOption {
                        command: self.scope.to_string(),
                        option: option.clone(),
                        first: first.to_string(),
                        second: arg.dest.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Fill the id-part arguments from a resource id
    pub fn apply_resource_id(&self, id: &ResourceId, values: &mut ArgValues) {
        for arg in self.visible_arguments() {
            if let Some(part) = arg.id_part.and_then(|part| id.part(part)) {
                debug!("Taking {} = {} from resource id", arg.dest, part);
                values.set(arg.dest.clone(), part);
            }
        }
    }

    /// Fill unset arguments that have a configured default
    pub fn apply_configured_defaults(
        &self,
        values: &mut ArgValues,
        lookup: impl Fn(ConfiguredDefault) -> Option<String>,
    ) {
        for arg in self.visible_arguments() {
            if let Some(key) = arg.configured_default
                && !values.contains(&arg.dest)
                && let Some(default) = lookup(key)
            {
                debug!("Using configured default {} = {}", arg.dest, default);
                values.set(arg.dest.clone(), default);
            }
        }
    }

    /// Error listing every required argument that has no value
    pub fn check_required(&self, values: &ArgValues) -> Result<(), ValidationError> {
        let missing: Vec<String> = self
            .visible_arguments()
            .filter(|arg| arg.required && !values.contains(&arg.dest))
            .map(ResolvedArgument::display_options)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingRequired {
                options: missing.join(", "),
            })
        }
    }

    /// Run validators and assemble the request
    pub fn finalize(
        &self,
        mut values: ArgValues,
        ctx: &ValidationContext,
    ) -> Result<OperationRequest, ValidationError> {
        self.check_required(&values)?;

        for arg in &self.arguments {
            if let Some(validator) = arg.validator {
                validator.validate(&arg.dest, &arg.display_options(), &mut values, ctx)?;
            }
        }

        Ok(self.assemble(values))
    }

    fn assemble(&self, mut values: ArgValues) -> OperationRequest {
        for expansion in &self.expansions {
            let mut object = Map::new();
            for (key, value) in expansion.model.constants() {
                object.insert(key.to_string(), Value::from(*value));
            }
            for field in expansion.model.fields() {
                if let Some(value) = values.remove(field.dest)
                    && !value.is_null()
                {
                    object.insert(field.key.to_string(), value);
                }
            }
            values.set(expansion.dest.clone(), Value::Object(object));
        }

        let mut parameters = Map::new();
        for dest in &self.parameters {
            if let Some(value) = values.remove(dest)
                && !value.is_null()
            {
                parameters.insert(dest.clone(), value);
            }
        }
        if !values.is_empty() {
            debug!(
                "Dropping values no parameter consumes: {:?}",
                values.iter().map(|(dest, _)| dest).collect::<Vec<_>>()
            );
        }

        OperationRequest {
            command: self.scope.to_string(),
            operation: self.kind,
            parameters,
        }
    }
}
