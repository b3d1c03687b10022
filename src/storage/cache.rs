//! Reference cache for catalog records.
//!
//! Entries are only written on the caller side, after a store round trip
//! has completed; the worker never touches a cache.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::Result;

/// Keyed in-memory cache in front of the store
#[derive(Debug)]
pub struct ReferenceCache<V> {
    name: &'static str,
    entries: RwLock<HashMap<String, V>>,
}

impl<V: Clone> ReferenceCache<V> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn peek(&self, key: &str) -> Option<V> {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    /// Return the cached entry or fall through to `load` and remember the
    /// result. Misses that the store cannot resolve are not cached.
    pub fn get_or_load<F>(&self, key: &str, load: F) -> Result<Option<V>>
    where
        F: FnOnce() -> Result<Option<V>>,
    {
        if let Some(hit) = self.peek(key) {
            tracing::debug!("{} cache hit: {}", self.name, key);
            return Ok(Some(hit));
        }
        tracing::debug!("{} cache miss: {}", self.name, key);
        let loaded = load()?;
        if let Some(value) = &loaded {
            self.put(key, value.clone());
        }
        Ok(loaded)
    }

    pub fn put(&self, key: impl Into<String>, value: V) {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.into(), value);
    }

    pub fn put_all<'a, I>(&self, items: I, key_of: impl Fn(&V) -> &str)
    where
        I: IntoIterator<Item = &'a V>,
        V: 'a,
    {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for item in items {
            entries.insert(key_of(item).to_string(), item.clone());
        }
    }

    pub fn invalidate(&self) {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
        tracing::info!("{} cache cleared", self.name);
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_miss_loads_once() {
        let cache: ReferenceCache<String> = ReferenceCache::new("test");
        let calls = Cell::new(0);
        let load = || {
            calls.set(calls.get() + 1);
            Ok(Some("value".to_string()))
        };
        assert_eq!(cache.get_or_load("k", load).unwrap().as_deref(), Some("value"));
        assert_eq!(cache.get_or_load("k", load).unwrap().as_deref(), Some("value"));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_absent_is_not_cached() {
        let cache: ReferenceCache<String> = ReferenceCache::new("test");
        assert!(cache.get_or_load("k", || Ok(None)).unwrap().is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate_empties() {
        let cache: ReferenceCache<String> = ReferenceCache::new("test");
        let items = vec!["a".to_string(), "b".to_string()];
        cache.put_all(&items, |s| s.as_str());
        assert_eq!(cache.len(), 2);
        cache.invalidate();
        assert!(cache.peek("a").is_none());
    }
}
