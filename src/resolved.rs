//! Output of a resolution pass
//!
//! A [`ResolvedMap`] holds, per category, the single value chosen for every
//! item that matched the active environment and configuration. Build settings
//! are kept apart in [`BuildSettings`] because they are partitioned into a
//! wildcard bucket and one bucket per build configuration.
//!
//! Both keep document order so that emitted artifacts are deterministic.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::config::Category;
use crate::value::Value;

/// Bucket name for build settings that apply to every configuration.
pub const WILDCARD: &str = "*";

/// A small insertion-ordered string map.
///
/// Re-inserting an existing key replaces the value in place, keeping the
/// key's original position.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    /// Get the value for `key`, inserting `V::default()` first if missing.
    pub fn get_or_default(&mut self, key: &str) -> &mut V
    where
        V: Default,
    {
        let idx = match self.entries.iter().position(|(k, _)| k == key) {
            Some(idx) => idx,
            None => {
                self.entries.push((key.to_string(), V::default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Build settings partitioned into the wildcard bucket and per-configuration
/// buckets.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct BuildSettings {
    buckets: OrderedMap<OrderedMap<String>>,
}

impl BuildSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key = value` in `bucket` (a configuration name or [`WILDCARD`]).
    pub fn set(&mut self, bucket: &str, key: impl Into<String>, value: impl Into<String>) {
        self.buckets.get_or_default(bucket).insert(key, value.into());
    }

    pub fn get(&self, bucket: &str, key: &str) -> Option<&str> {
        self.buckets
            .get(bucket)
            .and_then(|b| b.get(key))
            .map(String::as_str)
    }

    pub fn wildcard(&self) -> Option<&OrderedMap<String>> {
        self.buckets.get(WILDCARD)
    }

    pub fn bucket(&self, configuration: &str) -> Option<&OrderedMap<String>> {
        self.buckets.get(configuration)
    }

    pub fn buckets(&self) -> impl Iterator<Item = (&str, &OrderedMap<String>)> {
        self.buckets.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(|(_, b)| b.is_empty())
    }

    /// Overwrite every setting present in `other`.
    ///
    /// A key set in any bucket of `other` is first removed from every bucket
    /// of `self`, so a per-configuration value cannot outlive an override
    /// given for another bucket.
    pub fn apply_overrides(&mut self, other: BuildSettings) {
        let overridden: Vec<String> = other
            .buckets
            .iter()
            .flat_map(|(_, settings)| settings.keys().map(str::to_string))
            .collect();
        for (_, settings) in self.buckets.entries.iter_mut() {
            for key in &overridden {
                settings.remove(key);
            }
        }
        for (bucket, settings) in other.buckets.entries {
            let target = self.buckets.get_or_default(&bucket);
            for (key, value) in settings.entries {
                target.insert(key, value);
            }
        }
    }
}

/// Category → item → value, the result of a resolution pass.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct ResolvedMap {
    categories: OrderedMap<OrderedMap<Value>>,
    build_settings: BuildSettings,
}

impl ResolvedMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: &str, key: impl Into<String>, value: Value) {
        self.categories.get_or_default(category).insert(key, value);
    }

    pub fn get(&self, category: &str, key: &str) -> Option<&Value> {
        self.categories.get(category).and_then(|c| c.get(key))
    }

    pub fn category(&self, name: &str) -> Option<&OrderedMap<Value>> {
        self.categories.get(name)
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, &OrderedMap<Value>)> {
        self.categories.iter()
    }

    pub fn build_settings(&self) -> &BuildSettings {
        &self.build_settings
    }

    pub fn build_settings_mut(&mut self) -> &mut BuildSettings {
        &mut self.build_settings
    }

    /// Custom variables (the `variables` category) in document order.
    pub fn custom_variables(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.categories
            .get(Category::VARIABLES)
            .into_iter()
            .flat_map(|c| c.iter())
    }

    /// Categories whose entries are written into property-list files.
    pub fn plist_categories(&self) -> impl Iterator<Item = (&str, &OrderedMap<Value>)> {
        self.categories
            .iter()
            .filter(|(name, _)| Category::from_name(name).is_plist())
    }

    /// Overwrite every entry present in `overrides`, whatever the order in
    /// which the two maps were resolved.
    pub fn apply_overrides(&mut self, overrides: ResolvedMap) {
        for (category, entries) in overrides.categories.entries {
            let target = self.categories.get_or_default(&category);
            for (key, value) in entries.entries {
                target.insert(key, value);
            }
        }
        self.build_settings.apply_overrides(overrides.build_settings);
    }

    /// One `  [category] key = value` line per entry, for the run summary.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for (bucket, settings) in self.build_settings.buckets() {
            for (key, value) in settings.iter() {
                lines.push(format!("  [{}] {}:{} = {}", Category::XCCONFIG, key, bucket, value));
            }
        }
        for (category, entries) in self.categories() {
            for (key, value) in entries.iter() {
                lines.push(format!("  [{}] {} = {}", category, key, value));
            }
        }
        lines
    }
}
