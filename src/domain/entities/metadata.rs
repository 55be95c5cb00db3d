use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Flat string-to-string metadata attached to payment provider objects
/// (checkout session, subscription, invoice) so downstream reporting can join
/// them on identical keys. Never persisted by this system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataBag(BTreeMap<String, String>);

impl MetadataBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert only when the value is non-empty after trimming. Empty customer
    /// fields would otherwise pollute every provider object with blank keys.
    pub fn insert_non_empty(&mut self, key: &str, value: &str) {
        let value = value.trim();
        if !value.is_empty() {
            self.0.insert(key.to_string(), value.to_string());
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copy every entry of `other` into `self`, overwriting existing keys.
    pub fn overwrite_with(&mut self, other: &MetadataBag) {
        for (key, value) in other.iter() {
            self.0.insert(key.to_string(), value.to_string());
        }
    }

    /// Copy entries of `other` only for keys absent from `self`.
    pub fn fill_missing_from(&mut self, other: &MetadataBag) {
        for (key, value) in other.iter() {
            self.0
                .entry(key.to_string())
                .or_insert_with(|| value.to_string());
        }
    }

    /// Read a Stripe-style `metadata` object (string values only) out of a
    /// JSON payload. Missing or non-object input yields an empty bag.
    pub fn from_json_object(value: &serde_json::Value) -> Self {
        let mut bag = Self::new();
        if let Some(map) = value.as_object() {
            for (key, val) in map {
                if let Some(s) = val.as_str() {
                    bag.insert_non_empty(key, s);
                }
            }
        }
        bag
    }
}

impl<const N: usize> From<[(&str, &str); N]> for MetadataBag {
    fn from(entries: [(&str, &str); N]) -> Self {
        let mut bag = Self::new();
        for (key, value) in entries {
            bag.insert_non_empty(key, value);
        }
        bag
    }
}
