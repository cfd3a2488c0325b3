//! Bidirectional lookup tables for taxodb
//!
//! Hosts resolve human-readable label and category names to the engine's
//! integer ids and back. A [`Multimap`] keeps both directions in step:
//! inserting a pairing unlinks any stale pairing either side had before,
//! so the forward and reverse maps never disagree.

use std::collections::HashMap;
use std::hash::Hash;

/// Bidirectional map between keys and values.
///
/// Both directions are unique: a key maps to at most one value and a
/// value to at most one key.
#[derive(Debug, Clone, Default)]
pub struct Multimap<K, V> {
    forward: HashMap<K, V>,
    reverse: HashMap<V, K>,
}

impl<K, V> Multimap<K, V>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
{
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            forward: HashMap::new(),
            reverse: HashMap::new(),
        }
    }

    /// Number of pairings.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// `true` when no pairings exist.
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Inserts the pairing `key <-> value`.
    ///
    /// A stale value previously paired with `key`, and a stale key
    /// previously paired with `value`, are both unlinked first.
    pub fn insert(&mut self, key: K, value: V) {
        if let Some(stale_value) = self.forward.remove(&key) {
            self.reverse.remove(&stale_value);
        }
        if let Some(stale_key) = self.reverse.remove(&value) {
            self.forward.remove(&stale_key);
        }
        self.forward.insert(key.clone(), value.clone());
        self.reverse.insert(value, key);
    }

    /// Value paired with `key`.
    pub fn value_of(&self, key: &K) -> Option<&V> {
        self.forward.get(key)
    }

    /// Key paired with `value`.
    pub fn key_of(&self, value: &V) -> Option<&K> {
        self.reverse.get(value)
    }

    /// `true` when `key` has a pairing.
    pub fn contains_key(&self, key: &K) -> bool {
        self.forward.contains_key(key)
    }

    /// `true` when `value` has a pairing.
    pub fn contains_value(&self, value: &V) -> bool {
        self.reverse.contains_key(value)
    }

    /// Removes the pairing of `key`, returning its value.
    pub fn remove_key(&mut self, key: &K) -> Option<V> {
        let value = self.forward.remove(key)?;
        self.reverse.remove(&value);
        Some(value)
    }

    /// Every key, in no particular order.
    pub fn keys(&self) -> Vec<K> {
        self.forward.keys().cloned().collect()
    }

    /// Every value, in no particular order.
    pub fn values(&self) -> Vec<V> {
        self.reverse.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup_both_directions() {
        let mut map: Multimap<String, u32> = Multimap::new();
        map.insert("outcome".to_string(), 10);
        map.insert("reward".to_string(), 11);

        assert_eq!(map.value_of(&"outcome".to_string()), Some(&10));
        assert_eq!(map.key_of(&11), Some(&"reward".to_string()));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_reinsert_key_unlinks_stale_value() {
        let mut map: Multimap<String, u32> = Multimap::new();
        map.insert("outcome".to_string(), 10);
        map.insert("outcome".to_string(), 20);

        assert_eq!(map.value_of(&"outcome".to_string()), Some(&20));
        // the stale reverse entry is gone
        assert_eq!(map.key_of(&10), None);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_reinsert_value_unlinks_stale_key() {
        let mut map: Multimap<String, u32> = Multimap::new();
        map.insert("outcome".to_string(), 10);
        map.insert("reward".to_string(), 10);

        assert_eq!(map.key_of(&10), Some(&"reward".to_string()));
        assert_eq!(map.value_of(&"outcome".to_string()), None);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_remove_key() {
        let mut map: Multimap<String, u32> = Multimap::new();
        map.insert("outcome".to_string(), 10);

        assert_eq!(map.remove_key(&"outcome".to_string()), Some(10));
        assert!(map.is_empty());
        assert!(!map.contains_value(&10));
    }

    #[test]
    fn test_contains() {
        let mut map: Multimap<String, u32> = Multimap::new();
        map.insert("outcome".to_string(), 10);

        assert!(map.contains_key(&"outcome".to_string()));
        assert!(map.contains_value(&10));
        assert!(!map.contains_key(&"missing".to_string()));
        assert!(!map.contains_value(&11));
    }
}
