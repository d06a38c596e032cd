//! String-keyed value sets attached to every deployable resource.

use std::collections::BTreeMap;

use derive_more::Deref;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The value set of a deployable resource.
///
/// Keys map to arbitrary JSON values (ports, URLs, nested arrays of
/// credentials). Constructors populate static entries up front; post-deploy
/// hooks fill in the runtime-dependent remainder during resolution. Consumers
/// should only read a value set through a resolved view, never while a hook
/// may still be writing it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Deref)]
#[serde(transparent)]
pub struct ValueSet {
    #[deref]
    entries: BTreeMap<String, Value>,
}

impl ValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an entry.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Read an entry as a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Value::as_str)
    }

    /// Read an entry as an unsigned integer.
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.entries.get(key).and_then(Value::as_u64)
    }

    /// Read an entry as an array.
    pub fn get_array(&self, key: &str) -> Option<&Vec<Value>> {
        self.entries.get(key).and_then(Value::as_array)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ValueSet {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors() {
        let mut values = ValueSet::new();
        values.insert("rpcPort", 8545u16);
        values.insert("clusterURL", "ws://10.0.0.1:8545");

        assert_eq!(values.get_u64("rpcPort"), Some(8545));
        assert_eq!(values.get_str("clusterURL"), Some("ws://10.0.0.1:8545"));
        assert_eq!(values.get_str("rpcPort"), None);
        assert!(values.get_array("missing").is_none());
    }

    #[test]
    fn test_clones_are_independent() {
        let mut a = ValueSet::new();
        a.insert("apiPort", 6060u16);
        let mut b = a.clone();
        b.insert("apiPort", 7070u16);

        assert_eq!(a.get_u64("apiPort"), Some(6060));
        assert_eq!(b.get_u64("apiPort"), Some(7070));
    }
}
