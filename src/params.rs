//! Rule parameters
//!
//! A flat, ordered key/value map handed to a rule when it runs. Parameters are layered: theme
//! config at the bottom, registry defaults above it, caller supplied values on top.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleParameters(BTreeMap<String, String>);

impl RuleParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
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

    /// Layer `overrides` on top of `self`: overlapping keys take the override's value, all
    /// other keys of both maps are kept.
    pub fn overlaid_with(mut self, overrides: &RuleParameters) -> Self {
        for (key, value) in &overrides.0 {
            self.0.insert(key.clone(), value.clone());
        }
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RuleParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        RuleParameters(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<BTreeMap<String, String>> for RuleParameters {
    fn from(map: BTreeMap<String, String>) -> Self {
        RuleParameters(map)
    }
}
