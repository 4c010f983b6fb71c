//! Parsed key/value pairs

use crate::hash::hash;

/// One parsed `key = value` statement
///
/// The hashes are derived from the strings and recomputed whenever the
/// value changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    key: String,
    value: Option<String>,
    key_hash: u32,
    value_hash: u32,
}

impl Entry {
    pub(crate) fn new(key: String, value: Option<String>) -> Self {
        let key_hash = hash(Some(key.as_str()));
        let value_hash = hash(value.as_deref());
        Self {
            key,
            value,
            key_hash,
            value_hash,
        }
    }

    /// Entry key, never empty for parsed entries
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Entry value; `None` when nothing followed the `=`
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Hash of the key
    pub fn key_hash(&self) -> u32 {
        self.key_hash
    }

    /// Hash of the value (the hash seed when absent)
    pub fn value_hash(&self) -> u32 {
        self.value_hash
    }

    pub(crate) fn set_value(&mut self, value: String) {
        self.value_hash = hash(Some(value.as_str()));
        self.value = Some(value);
    }
}
