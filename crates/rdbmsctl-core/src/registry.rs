//! Argument registry and its builder
//!
//! The registry is built once by [`crate::params::load_arguments`] and then
//! handed, read-only, to whatever renders commands from it. Registrations
//! are keyed by `(scope, dest)`; repeated registrations on the same key
//! merge attribute by attribute, later ones winning.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::trace;

use crate::commands::{CommandSpec, CommandTable};
use crate::error::RegistryError;
use crate::models::ModelRef;
use crate::resolve::{ArgOrigin, ExpandedParam, ResolvedArgument, ResolvedCommand};
use crate::scope::Scope;
use crate::settings::{ArgSettings, arg_types};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArgumentRegistry {
    arguments: BTreeMap<Scope, BTreeMap<String, ArgSettings>>,
    expansions: BTreeMap<Scope, BTreeMap<String, ModelRef>>,
    extras: BTreeMap<Scope, BTreeMap<String, ArgSettings>>,
}

impl ArgumentRegistry {
    /// Settings registered for `dest` on exactly `scope`
    pub fn argument(&self, scope: &Scope, dest: &str) -> Option<&ArgSettings> {
        self.arguments.get(scope).and_then(|args| args.get(dest))
    }

    /// Expansion declared for `dest` on exactly `scope`
    pub fn expansion(&self, scope: &Scope, dest: &str) -> Option<&ModelRef> {
        self.expansions.get(scope).and_then(|exps| exps.get(dest))
    }

    /// Extra arguments declared on exactly `scope`
    pub fn extras(&self, scope: &Scope) -> impl Iterator<Item = (&String, &ArgSettings)> {
        self.extras.get(scope).into_iter().flatten()
    }

    /// Scopes that carry at least one registration
    pub fn scopes(&self) -> Vec<&Scope> {
        let mut scopes: Vec<&Scope> = self
            .arguments
            .keys()
            .chain(self.expansions.keys())
            .chain(self.extras.keys())
            .collect();
        scopes.sort();
        scopes.dedup();
        scopes
    }

    /// `base` with every registration for `dest` from the global scope down to `scope` merged in
    pub fn effective(&self, scope: &Scope, dest: &str, base: ArgSettings) -> ArgSettings {
        scope
            .ancestors()
            .iter()
            .fold(base, |acc, ancestor| match self.argument(ancestor, dest) {
                Some(settings) => acc.merged(settings),
                None => acc,
            })
    }

    /// Expansion for `dest` as seen from `scope`; the narrowest declaration wins
    pub fn effective_expansion(&self, scope: &Scope, dest: &str) -> Option<ModelRef> {
        scope
            .ancestors()
            .iter()
            .rev()
            .find_map(|ancestor| self.expansion(ancestor, dest).copied())
    }

    /// Stable JSON rendering, used to compare registries
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Effective argument list of one command
    pub fn resolve(&self, command: &CommandSpec) -> Result<ResolvedCommand, RegistryError> {
        let mut arguments = Vec::new();
        let mut expansions = Vec::new();

        for param in &command.parameters {
            let mut base = ArgSettings::new()
                .value_type(param.value_type.clone())
                .required(param.required);
            if let Some(help) = param.help {
                base = base.help(help);
            }
            self.resolve_dest(
                &command.scope,
                param.dest,
                base,
                ArgOrigin::Parameter,
                &mut arguments,
                &mut expansions,
            );
        }

        for (dest, settings) in self.extras(&command.scope) {
            let merged = self
                .effective(&command.scope, dest, ArgSettings::new())
                .merged(settings);
            arguments.push(ResolvedArgument::new(dest, merged, ArgOrigin::Extra));
        }

        let resolved = ResolvedCommand {
            scope: command.scope.clone(),
            kind: command.kind,
            summary: command.summary.to_string(),
            parameters: command
                .parameters
                .iter()
                .map(|param| param.dest.to_string())
                .collect(),
            arguments,
            expansions,
        };
        resolved.check_option_conflicts()?;
        Ok(resolved)
    }

    fn resolve_dest(
        &self,
        scope: &Scope,
        dest: &str,
        base: ArgSettings,
        origin: ArgOrigin,
        arguments: &mut Vec<ResolvedArgument>,
        expansions: &mut Vec<ExpandedParam>,
    ) {
        let Some(model) = self.effective_expansion(scope, dest) else {
            let settings = self.effective(scope, dest, base);
            arguments.push(ResolvedArgument::new(dest, settings, origin));
            return;
        };

        // The expanded dest itself never reaches the command line.
        arguments.push(ResolvedArgument::new(dest, base.ignored(), origin));
        for field in model.fields() {
            let base = ArgSettings::new()
                .value_type(field.value_type.clone())
                .required(field.required)
                .help(field.help);
            let origin = ArgOrigin::Field {
                parent: dest.to_string(),
                model: model.model,
            };
            self.resolve_dest(scope, field.dest, base, origin, arguments, expansions);
        }
        expansions.push(ExpandedParam {
            dest: dest.to_string(),
            model,
        });
    }

    /// Check every registration against the command table
    pub fn validate(&self, table: &CommandTable) -> Result<(), RegistryError> {
        let resolved = table
            .commands()
            .iter()
            .map(|command| self.resolve(command))
            .collect::<Result<Vec<_>, _>>()?;

        let known = |scope: &Scope, dest: &str| {
            resolved
                .iter()
                .filter(|command| scope.covers(&command.scope))
                .any(|command| command.argument(dest).is_some())
        };

        let registered = self
            .arguments
            .iter()
            .map(|(scope, args)| (scope, args.keys().collect::<Vec<_>>()))
            .chain(
                self.expansions
                    .iter()
                    .map(|(scope, exps)| (scope, exps.keys().collect::<Vec<_>>())),
            );
        for (scope, dests) in registered {
            if !table.has_scope(scope) {
                return Err(RegistryError::UnknownScope {
                    scope: scope.to_string(),
                });
            }
            if let Some(dest) = dests.into_iter().find(|dest| !known(scope, dest)) {
                return Err(RegistryError::UnknownArgument {
                    scope: scope.to_string(),
                    dest: dest.clone(),
                });
            }
        }

        for (scope, extras) in &self.extras {
            if table.command(scope).is_some() {
                continue;
            }
            if !table.has_scope(scope) {
                return Err(RegistryError::UnknownCommand {
                    scope: scope.to_string(),
                });
            }
            if let Some(dest) = extras.keys().next() {
                return Err(RegistryError::ExtraOnGroup {
                    scope: scope.to_string(),
                    dest: dest.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Builds an [`ArgumentRegistry`] through scoped registration sessions
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    registry: ArgumentRegistry,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a registration session for `scope`
    pub fn argument_context(&mut self, scope: Scope) -> ArgumentContext<'_> {
        trace!("Entering argument context '{}'", scope);
        ArgumentContext {
            registry: &mut self.registry,
            scope,
        }
    }

    pub fn build(self) -> ArgumentRegistry {
        self.registry
    }
}

/// Registration session bound to one scope
#[derive(Debug)]
pub struct ArgumentContext<'a> {
    registry: &'a mut ArgumentRegistry,
    scope: Scope,
}

impl ArgumentContext<'_> {
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Declare or refine an argument
    pub fn argument(&mut self, dest: &str, settings: ArgSettings) -> &mut Self {
        trace!("Registering '{}' on '{}'", dest, self.scope);
        self.registry
            .arguments
            .entry(self.scope.clone())
            .or_default()
            .entry(dest.to_string())
            .or_default()
            .merge(&settings);
        self
    }

    /// Flatten the fields of `model` into arguments in place of `dest`
    pub fn expand(&mut self, dest: &str, model: ModelRef) -> &mut Self {
        trace!(
            "Expanding '{}' as {} on '{}'",
            dest,
            model.model,
            self.scope
        );
        self.registry
            .expansions
            .entry(self.scope.clone())
            .or_default()
            .insert(dest.to_string(), model);
        self
    }

    /// Hide arguments from the command line
    pub fn ignore(&mut self, dests: &[&str]) -> &mut Self {
        for dest in dests {
            self.argument(dest, arg_types::ignore());
        }
        self
    }

    /// Add an argument that no operation parameter backs
    pub fn extra(&mut self, dest: &str, settings: ArgSettings) -> &mut Self {
        trace!("Registering extra '{}' on '{}'", dest, self.scope);
        self.registry
            .extras
            .entry(self.scope.clone())
            .or_default()
            .entry(dest.to_string())
            .or_default()
            .merge(&settings);
        self
    }
}
