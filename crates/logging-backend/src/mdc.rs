//! crates/logging-backend/src/mdc.rs
//! Mapped diagnostic context shared by every logger of a backend.

use std::collections::BTreeMap;
use std::sync::Arc;

use dashmap::DashMap;

/// Key/value store rendered into log lines by the `%X{key}` directive.
///
/// Cloning an `Mdc` yields another handle to the same store.
#[derive(Clone, Debug, Default)]
pub struct Mdc {
    values: Arc<DashMap<String, String>>,
}

impl Mdc {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, returning the previous value.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(key.into(), value.into())
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).map(|entry| entry.value().clone())
    }

    /// Removes `key`, returning its value.
    pub fn remove(&self, key: &str) -> Option<String> {
        self.values.remove(key).map(|(_, value)| value)
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.values.clear();
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Reports whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Copies the current entries, sorted by key.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.values
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }
}
