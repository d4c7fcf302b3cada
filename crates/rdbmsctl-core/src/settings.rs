//! Argument registration records
//!
//! [`ArgSettings`] holds every attribute a registration can set. All of
//! them are optional: a record registered on a broad scope is merged with
//! records from narrower scopes, and a narrower record only replaces the
//! attributes it actually sets.

use serde::Serialize;

use crate::completers::Completer;
use crate::models::ModelType;
use crate::validators::Validator;

/// Value domain of an argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueType {
    /// Free text
    String,
    /// Integer
    Int,
    /// One of a fixed set of values
    Enum { values: Vec<String> },
    /// `key[=value]` pairs
    Dict,
    /// A complex model; only usable as JSON unless expanded
    Object { model: ModelType },
}

impl ValueType {
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ValueType::Enum {
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// How many values an argument takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Nargs {
    #[default]
    One,
    ZeroOrMore,
    OneOrMore,
}

impl Nargs {
    pub fn is_multiple(&self) -> bool {
        !matches!(self, Nargs::One)
    }
}

/// Which component of a resource id an argument supplies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IdPart {
    #[serde(rename = "resource_group")]
    ResourceGroup,
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "child_name_1")]
    ChildName1,
}

impl std::fmt::Display for IdPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdPart::ResourceGroup => write!(f, "resource_group"),
            IdPart::Name => write!(f, "name"),
            IdPart::ChildName1 => write!(f, "child_name_1"),
        }
    }
}

/// Configuration keys that can supply an argument's default value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfiguredDefault {
    ResourceGroup,
    Location,
}

/// Settings registered for one argument dest on one scope
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArgSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_type: Option<ValueType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nargs: Option<Nargs>,
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignored: Option<bool>,
}

impl ArgSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Option strings, long form first: `["--admin-user", "-u"]`
    #[must_use]
    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    #[must_use]
    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }

    #[must_use]
    pub fn nargs(mut self, nargs: Nargs) -> Self {
        self.nargs = Some(nargs);
        self
    }

    #[must_use]
    pub fn arg_group(mut self, group: impl Into<String>) -> Self {
        self.arg_group = Some(group.into());
        self
    }

    #[must_use]
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    #[must_use]
    pub fn validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    #[must_use]
    pub fn completer(mut self, completer: Completer) -> Self {
        self.completer = Some(completer);
        self
    }

    #[must_use]
    pub fn id_part(mut self, id_part: IdPart) -> Self {
        self.id_part = Some(id_part);
        self
    }

    #[must_use]
    pub fn configured_default(mut self, key: ConfiguredDefault) -> Self {
        self.configured_default = Some(key);
        self
    }

    #[must_use]
    pub fn ignored(mut self) -> Self {
        self.ignored = Some(true);
        self
    }

    /// Overlay `other` onto `self`; attributes `other` leaves unset survive
    pub fn merge(&mut self, other: &ArgSettings) {
        fn overlay<T: Clone>(target: &mut Option<T>, source: &Option<T>) {
            if let Some(value) = source {
                *target = Some(value.clone());
            }
        }

        overlay(&mut self.options, &other.options);
        overlay(&mut self.required, &other.required);
        overlay(&mut self.value_type, &other.value_type);
        overlay(&mut self.nargs, &other.nargs);
        overlay(&mut self.arg_group, &other.arg_group);
        overlay(&mut self.help, &other.help);
        overlay(&mut self.validator, &other.validator);
        overlay(&mut self.completer, &other.completer);
        overlay(&mut self.id_part, &other.id_part);
        overlay(&mut self.configured_default, &other.configured_default);
        overlay(&mut self.ignored, &other.ignored);
    }

    /// `self` with `other` merged on top
    #[must_use]
    pub fn merged(mut self, other: &ArgSettings) -> Self {
        self.merge(other);
        self
    }
}

/// Reusable argument types shared by many commands
pub mod arg_types {
    use super::*;

    /// Space separated `key[=value]` tags
    pub fn tags() -> ArgSettings {
        ArgSettings::new()
            .value_type(ValueType::Dict)
            .nargs(Nargs::ZeroOrMore)
            .validator(Validator::Tags)
            .help("space-separated tags in 'key[=value]' format. Use \"\" to clear existing tags.")
    }

    /// Location, defaulting to the configured location
    pub fn location() -> ArgSettings {
        ArgSettings::new()
            .options(["--location", "-l"])
            .completer(Completer::Location)
            .configured_default(ConfiguredDefault::Location)
            .help(
                "Location. You can configure the default location using `rdbmsctl config set-default location <location>`.",
            )
    }

    /// Resource group name, defaulting to the configured group
    pub fn resource_group_name() -> ArgSettings {
        ArgSettings::new()
            .options(["--resource-group", "-g"])
            .completer(Completer::ResourceGroup)
            .id_part(IdPart::ResourceGroup)
            .configured_default(ConfiguredDefault::ResourceGroup)
            .help(
                "Name of resource group. You can configure the default group using `rdbmsctl config set-default resource_group <name>`.",
            )
    }

    /// Case-insensitive choice among `values`
    pub fn enumeration<I, S>(values: I) -> ArgSettings
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ArgSettings::new().value_type(ValueType::enumeration(values))
    }

    /// Hidden from the command line
    pub fn ignore() -> ArgSettings {
        ArgSettings::new().ignored()
    }
}
