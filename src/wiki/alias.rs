// src/wiki/alias.rs - Lookup tables where many spellings resolve to one value

use log::debug;
use std::collections::{HashMap, HashSet};

use super::{WikiError, WikiResult};

/// An immutable alias table.
///
/// Every alias key resolves to its canonical value, and canonical values added
/// through [`AliasDictBuilder::alias`] or [`AliasDictBuilder::unaliased`] are
/// keys of themselves. No alias key is ever equal to a canonical value.
#[derive(Debug, Clone, Default)]
pub struct AliasDict {
    entries: HashMap<String, String>,
}

impl AliasDict {
    pub fn builder() -> AliasDictBuilder {
        AliasDictBuilder::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

struct AliasGroup {
    keys: Vec<String>,
    value: String,
    self_mapped: bool,
}

/// Collects alias groups and validates them once in [`build`](Self::build).
#[derive(Default)]
pub struct AliasDictBuilder {
    groups: Vec<AliasGroup>,
    unaliased: Vec<String>,
}

impl AliasDictBuilder {
    /// Map every key in `keys` to `value`, and `value` to itself
    pub fn alias(mut self, keys: &[&str], value: &str) -> Self {
        self.push_group(keys, value, true);
        self
    }

    /// Map every key in `keys` to `value` without making `value` a key
    pub fn alias_only(mut self, keys: &[&str], value: &str) -> Self {
        self.push_group(keys, value, false);
        self
    }

    /// Add a value that only maps to itself
    pub fn unaliased(mut self, value: &str) -> Self {
        self.unaliased.push(value.to_string());
        self
    }

    fn push_group(&mut self, keys: &[&str], value: &str, self_mapped: bool) {
        self.groups.push(AliasGroup {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            value: value.to_string(),
            self_mapped,
        });
    }

    pub fn build(self) -> WikiResult<AliasDict> {
        let self_mapped: HashSet<&str> = self
            .groups
            .iter()
            .filter(|g| g.self_mapped)
            .map(|g| g.value.as_str())
            .chain(self.unaliased.iter().map(String::as_str))
            .collect();
        let canonical: HashSet<&str> = self
            .groups
            .iter()
            .map(|g| g.value.as_str())
            .chain(self_mapped.iter().copied())
            .collect();

        let mut entries: HashMap<String, String> = HashMap::new();
        for group in &self.groups {
            for key in &group.keys {
                if canonical.contains(key.as_str()) {
                    return Err(WikiError::AliasCollision { key: key.clone() });
                }
                match entries.get(key) {
                    Some(existing) if *existing != group.value => {
                        return Err(WikiError::DuplicateAlias {
                            key: key.clone(),
                            first: existing.clone(),
                            second: group.value.clone(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        entries.insert(key.clone(), group.value.clone());
                    }
                }
            }
        }

        for value in self_mapped {
            entries.insert(value.to_string(), value.to_string());
        }

        debug!("Built alias table with {} keys", entries.len());
        Ok(AliasDict { entries })
    }
}
