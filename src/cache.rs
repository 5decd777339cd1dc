//! A small bounded LRU cache shared by the parse, validation, property, and
//! template caches (§4.D, §4.E, §4.F, §4.G; §5 "Caches are LRU-bounded and
//! evict a single oldest entry on each over-cap insert").
//!
//! # Design rationale
//!
//! The source keeps one cache implementation and reuses it across all four
//! call sites; we do the same rather than pull in an external LRU crate,
//! since the eviction policy needed here is intentionally simple (evict
//! exactly one entry per over-cap insert, no segmented/weighted variants).
//! `indexmap::IndexMap` gives us both O(1) lookup and insertion-order
//! iteration, so "oldest entry" is just "first entry" after a touched key is
//! moved to the back.

use std::hash::Hash;

use indexmap::IndexMap;

#[derive(Debug, Clone)]
pub struct LruCache<K, V> {
    capacity: usize,
    entries: IndexMap<K, V>,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: IndexMap::new(),
        }
    }

    pub fn get(&mut self, key: &K) -> Option<&V> {
        if self.entries.contains_key(key) {
            self.touch(key);
        }
        self.entries.get(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserts or replaces an entry, evicting the single oldest entry if the
    /// cache is over capacity afterwards.
    pub fn insert(&mut self, key: K, value: V) {
        self.entries.insert(key.clone(), value);
        self.touch(&key);
        if self.entries.len() > self.capacity {
            self.entries.shift_remove_index(0);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Moves `key` to the most-recently-used position (the end of the map).
    fn touch(&mut self, key: &K) {
        if let Some(index) = self.entries.get_index_of(key) {
            let last = self.entries.len() - 1;
            self.entries.move_index(index, last);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_entry_over_capacity() {
        let mut cache: LruCache<&str, i32> = LruCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("c", 3);
        assert_eq!(cache.len(), 2);
        assert!(!cache.contains(&"a"));
        assert!(cache.contains(&"b"));
        assert!(cache.contains(&"c"));
    }

    #[test]
    fn get_refreshes_recency() {
        let mut cache: LruCache<&str, i32> = LruCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.get(&"a");
        cache.insert("c", 3);
        assert!(cache.contains(&"a"));
        assert!(!cache.contains(&"b"));
    }
}
