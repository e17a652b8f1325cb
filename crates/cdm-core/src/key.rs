//! # Attribute Keys and String-Keyed Mappings
//!
//! Dataset layers are not required to use string keys: a decoded file may
//! carry integer, boolean, or null names. [`AttrKey`] keeps whatever the
//! provider supplied; [`SanitisedMap`] is the string-keyed view produced by
//! the sanitization step in `cdm-check`, and is the only mapping the checks
//! ever look up by name.

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A mapping key as supplied by the dataset layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrKey {
    /// A string key, usable as is.
    Name(String),
    /// Any other JSON value used as a key.
    Other(Value),
}

impl AttrKey {
    /// The key as a string, if it is one.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(s) => Some(s),
            Self::Other(_) => None,
        }
    }

    /// Printable representation used as the sanitized key.
    pub fn repr(&self) -> String {
        match self {
            Self::Name(s) => s.clone(),
            Self::Other(v) => v.to_string(),
        }
    }
}

impl From<&str> for AttrKey {
    fn from(s: &str) -> Self {
        Self::Name(s.to_string())
    }
}

impl From<String> for AttrKey {
    fn from(s: String) -> Self {
        Self::Name(s)
    }
}

impl From<Value> for AttrKey {
    fn from(v: Value) -> Self {
        match v {
            Value::String(s) => Self::Name(s),
            other => Self::Other(other),
        }
    }
}

/// Raw attribute mapping as supplied by the dataset layer, in source order.
pub type Attributes = Vec<(AttrKey, Value)>;

/// Insertion-ordered mapping with string keys. The first insertion of a
/// key wins.
#[derive(Debug, Clone, PartialEq)]
pub struct SanitisedMap<V> {
    entries: IndexMap<String, V>,
}

impl<V> Default for SanitisedMap<V> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<V> SanitisedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` under `key` unless the key is already present.
    ///
    /// Returns `false` when the key was already taken.
    pub fn insert_first(&mut self, key: String, value: V) -> bool {
        match self.entries.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl SanitisedMap<&Value> {
    /// Look up a string-valued attribute. Non-string values yield `None`.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.as_str())
    }
}
