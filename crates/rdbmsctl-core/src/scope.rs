//! Command scopes
//!
//! A scope names a command or command group: `mysql`, `mysql server`,
//! `mysql server create`. Argument registrations attach to a scope and
//! apply to every command beneath it. Ancestry is decided word by word,
//! so `mysql server` covers `mysql server firewall-rule list` but not
//! `mysql server-logs list`.

use serde::{Serialize, Serializer};
use std::fmt;

use crate::engine::Engine;
use crate::error::RegistryError;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Scope {
    engine: Option<Engine>,
    path: Vec<String>,
}

impl Scope {
    /// The scope every command lives under
    pub fn global() -> Self {
        Self::default()
    }

    /// Root scope of an engine, e.g. `mysql`
    pub fn engine(engine: Engine) -> Self {
        Self {
            engine: Some(engine),
            path: Vec::new(),
        }
    }

    /// Scope below an engine root, e.g. `Scope::new(Engine::MySql, &["server", "create"])`
    pub fn new(engine: Engine, path: &[&str]) -> Self {
        Self {
            engine: Some(engine),
            path: path.iter().map(|word| word.to_string()).collect(),
        }
    }

    /// Parse a space separated command string
    pub fn parse(input: &str) -> Result<Self, RegistryError> {
        let mut words = input.split_whitespace();
        let Some(first) = words.next() else {
            return Ok(Self::global());
        };
        let engine = Engine::from_command_group(first).ok_or_else(|| RegistryError::UnknownScope {
            scope: input.trim().to_string(),
        })?;
        Ok(Self {
            engine: Some(engine),
            path: words.map(str::to_string).collect(),
        })
    }

    /// Scope one level deeper
    #[must_use]
    pub fn child(&self, word: &str) -> Self {
        let mut path = self.path.clone();
        path.push(word.to_string());
        Self {
            engine: self.engine,
            path,
        }
    }

    pub fn engine_id(&self) -> Option<Engine> {
        self.engine
    }

    pub fn is_global(&self) -> bool {
        self.engine.is_none()
    }

    /// True when `self` equals `other` or is one of its ancestors
    pub fn covers(&self, other: &Scope) -> bool {
        match self.engine {
            None => true,
            Some(engine) => {
                other.engine == Some(engine)
                    && other.path.len() >= self.path.len()
                    && other.path[..self.path.len()] == self.path[..]
            }
        }
    }

    /// Every scope from the global scope down to `self`, broadest first
    pub fn ancestors(&self) -> Vec<Scope> {
        let mut chain = vec![Scope::global()];
        if let Some(engine) = self.engine {
            let mut current = Scope::engine(engine);
            chain.push(current.clone());
            for word in &self.path {
                current = current.child(word);
                chain.push(current.clone());
            }
        }
        chain
    }

    /// The enclosing scope, `None` for the global scope
    pub fn parent(&self) -> Option<Scope> {
        match self.engine {
            None => None,
            Some(_) if self.path.is_empty() => Some(Scope::global()),
            Some(engine) => Some(Scope {
                engine: Some(engine),
                path: self.path[..self.path.len() - 1].to_vec(),
            }),
        }
    }

    /// Last word of the scope
    pub fn name(&self) -> Option<&str> {
        match (self.path.last(), self.engine) {
            (Some(word), _) => Some(word.as_str()),
            (None, Some(engine)) => Some(engine.command_group()),
            (None, None) => None,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(engine) = self.engine {
            write!(f, "{}", engine.command_group())?;
            for word in &self.path {
                write!(f, " {}", word)?;
            }
        }
        Ok(())
    }
}

// Scopes key JSON objects, so they serialize as their command string.
impl Serialize for Scope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let scope = Scope::parse("mysql server  firewall-rule").unwrap();
        assert_eq!(
            scope,
            Scope::new(Engine::MySql, &["server", "firewall-rule"])
        );
        assert_eq!(scope.to_string(), "mysql server firewall-rule");
        assert_eq!(Scope::parse("").unwrap(), Scope::global());
    }

    #[test]
    fn test_parse_rejects_unknown_engine() {
        let err = Scope::parse("postgresql server vnet-rule create").unwrap_err();
        assert!(
            err.to_string()
                .contains("postgresql server vnet-rule create")
        );
    }

    #[test]
    fn test_covers_is_word_wise() {
        let server = Scope::new(Engine::MySql, &["server"]);
        assert!(server.covers(&Scope::new(Engine::MySql, &["server", "create"])));
        assert!(server.covers(&server));
        assert!(!server.covers(&Scope::new(Engine::MySql, &["server-logs", "list"])));
        assert!(!server.covers(&Scope::new(Engine::Postgres, &["server", "create"])));
        assert!(Scope::global().covers(&server));
    }

    #[test]
    fn test_ancestors_broadest_first() {
        let scope = Scope::new(Engine::Postgres, &["server", "vnet-rule"]);
        let chain: Vec<String> = scope.ancestors().iter().map(|s| s.to_string()).collect();
        assert_eq!(
            chain,
            vec![
                "",
                "postgres",
                "postgres server",
                "postgres server vnet-rule",
            ]
        );
    }

    #[test]
    fn test_parent_chain() {
        let scope = Scope::new(Engine::MySql, &["db"]);
        assert_eq!(scope.parent(), Some(Scope::engine(Engine::MySql)));
        assert_eq!(Scope::engine(Engine::MySql).parent(), Some(Scope::global()));
        assert_eq!(Scope::global().parent(), None);
    }
}
