//! Insertion-ordered id → value map.

use std::fmt;
use std::hash::Hash;

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::RoomError;

/// One registry partition.
///
/// Keys are unique within the partition. Iteration follows insertion
/// order, which is what makes first-fit joining pick the earliest-created
/// open room. Removal shifts later entries down so that order survives.
#[derive(Debug)]
pub struct Partition<K, V> {
    entries: IndexMap<K, V>,
}

impl<K, V> Partition<K, V>
where
    K: Copy + Eq + Hash + fmt::Display,
{
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Inserts a new entry. Existing entries are never overwritten.
    ///
    /// # Errors
    /// [`RoomError::DuplicateId`] if `key` is already present.
    pub fn insert(&mut self, key: K, value: V) -> Result<&mut V, RoomError> {
        match self.entries.entry(key) {
            Entry::Occupied(_) => Err(RoomError::DuplicateId(key.to_string())),
            Entry::Vacant(slot) => Ok(slot.insert(value)),
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.shift_remove(key)
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    /// Returns the first key, in insertion order, whose value satisfies
    /// `pred`.
    pub fn find_first(&self, mut pred: impl FnMut(&V) -> bool) -> Option<K> {
        self.iter().find(|(_, v)| pred(v)).map(|(k, _)| k)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> Default for Partition<K, V>
where
    K: Copy + Eq + Hash + fmt::Display,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use matchforge_protocol::GameId;

    use super::*;

    #[test]
    fn test_iteration_follows_insertion_order() {
        let mut p = Partition::new();
        for id in [30, 10, 20] {
            p.insert(GameId(id), id).unwrap();
        }
        let keys: Vec<_> = p.iter().map(|(k, _)| k.0).collect();
        assert_eq!(keys, vec![30, 10, 20]);
    }

    #[test]
    fn test_insert_rejects_duplicate_without_overwriting() {
        let mut p = Partition::new();
        p.insert(GameId(1), "first").unwrap();

        let err = p.insert(GameId(1), "second").unwrap_err();
        assert!(matches!(err, RoomError::DuplicateId(_)));
        assert_eq!(p.get(&GameId(1)), Some(&"first"));
        assert_eq!(p.len(), 1);
    }

    #[test]
    fn test_remove_drops_key_from_order() {
        let mut p = Partition::new();
        p.insert(GameId(1), 'a').unwrap();
        p.insert(GameId(2), 'b').unwrap();

        assert_eq!(p.remove(&GameId(1)), Some('a'));
        assert_eq!(p.remove(&GameId(1)), None);
        assert_eq!(p.find_first(|_| true), Some(GameId(2)));

        // Re-inserting a removed key puts it at the back.
        p.insert(GameId(1), 'c').unwrap();
        let keys: Vec<_> = p.iter().map(|(k, _)| k.0).collect();
        assert_eq!(keys, vec![2, 1]);
    }

    #[test]
    fn test_remove_from_middle_keeps_first_fit_order() {
        let mut p = Partition::new();
        for id in [5, 3, 9, 7] {
            p.insert(GameId(id), id).unwrap();
        }

        p.remove(&GameId(3));
        let keys: Vec<_> = p.iter().map(|(k, _)| k.0).collect();
        assert_eq!(keys, vec![5, 9, 7]);
        assert_eq!(p.find_first(|v| *v > 5), Some(GameId(9)));
    }
}
