use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A map of non-zero integers.
/// - Mutating a key down to zero removes it
/// - Reading a missing key returns 0
///
/// Backed by a `BTreeMap` so iteration (and the serialized form) is ordered.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counter<K: Ord> {
    counts: BTreeMap<K, i32>,
}

impl<K: Ord> Default for Counter<K> {
    fn default() -> Self {
        Self { counts: BTreeMap::new() }
    }
}

impl<K: Ord + Clone> Counter<K> {
    /// Creates a new empty Counter
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the count for a key, 0 when absent
    pub fn get(&self, key: &K) -> i32 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Sets the count for a key, removing it if the value is 0
    pub fn set(&mut self, key: K, value: i32) {
        if value == 0 {
            self.counts.remove(&key);
        } else {
            self.counts.insert(key, value);
        }
    }

    /// Adds a (possibly negative) value to the count for a key
    pub fn add(&mut self, key: K, value: i32) {
        let current = self.get(&key);
        self.set(key, current + value);
    }

    /// Adds all counts from another Counter
    pub fn add_counter(&mut self, other: &Counter<K>) {
        for (key, value) in &other.counts {
            self.add(key.clone(), *value);
        }
    }

    pub fn sum_values(&self) -> i32 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterates over the non-zero entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&K, i32)> {
        self.counts.iter().map(|(k, v)| (k, *v))
    }
}

impl<K: Ord + fmt::Debug> fmt::Debug for Counter<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.counts.iter()).finish()
    }
}
