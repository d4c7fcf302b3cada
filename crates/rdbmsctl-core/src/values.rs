//! Parsed argument values, keyed by dest

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Namespace of parsed values handed to validators
///
/// Unset arguments are simply absent; a validator may also store `null`
/// to mark a value as explicitly cleared.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ArgValues(BTreeMap<String, Value>);

impl ArgValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, dest: &str) -> Option<&Value> {
        self.0.get(dest).filter(|value| !value.is_null())
    }

    pub fn get_str(&self, dest: &str) -> Option<&str> {
        self.get(dest).and_then(Value::as_str)
    }

    pub fn contains(&self, dest: &str) -> bool {
        self.get(dest).is_some()
    }

    pub fn set(&mut self, dest: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(dest.into(), value.into());
    }

    pub fn remove(&mut self, dest: &str) -> Option<Value> {
        self.0.remove(dest)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ArgValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_counts_as_unset() {
        let mut values = ArgValues::new();
        values.set("value", Value::Null);
        assert!(!values.contains("value"));
        assert_eq!(values.get_str("value"), None);
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn test_collect_from_pairs() {
        let values: ArgValues = [("location", "westus")].into_iter().collect();
        assert_eq!(values.get("location"), Some(&json!("westus")));
        assert!(!values.is_empty());
    }
}
