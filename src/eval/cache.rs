//! Memoizes primitive member-access results (§4.F "Safe property access...
//! Primitive results are memoized in a bounded LRU cache").

use ahash::AHasher;
use std::hash::{Hash, Hasher};

use crate::cache::LruCache;
use crate::value::Value;

#[derive(Debug, Clone)]
pub struct PropertyCache {
    entries: LruCache<u64, Value>,
}

impl PropertyCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Only primitive results (not arrays/objects) are worth memoizing —
    /// caching a compound value would let a stale clone leak past a context
    /// that has since changed.
    pub fn get(&mut self, object: &Value, property: &str) -> Option<Value> {
        if !is_primitive_container(object) {
            return None;
        }
        self.entries.get(&key(object, property)).cloned()
    }

    pub fn insert(&mut self, object: &Value, property: &str, result: Value) {
        if !is_primitive_container(object) || !matches!(result, Value::String(_) | Value::Number(_) | Value::Bool(_)) {
            return;
        }
        self.entries.insert(key(object, property), result);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn is_primitive_container(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Array(_) | Value::Object(_))
}

fn key(object: &Value, property: &str) -> u64 {
    let mut hasher = AHasher::default();
    format!("{object:?}").hash(&mut hasher);
    property.hash(&mut hasher);
    hasher.finish()
}
