// src/cache/memory.rs
use anyhow::Result;
use lru::LruCache;
use std::num::NonZeroUsize;

use crate::cache::ResponseCache;

const DEFAULT_CACHE_SIZE: usize = 10_000;

/// Process-local LRU cache. Used for dry runs and as the fake in tests.
pub struct MemoryResponseCache {
    entries: LruCache<String, String>,
    pub hits: usize,
    pub misses: usize,
}

impl MemoryResponseCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MemoryResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }
}

impl ResponseCache for MemoryResponseCache {
    fn get(&mut self, key: &str) -> Result<Option<String>> {
        match self.entries.get(key) {
            Some(value) => {
                self.hits += 1;
                Ok(Some(value.clone()))
            }
            None => {
                self.misses += 1;
                Ok(None)
            }
        }
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.put(key.to_string(), value.to_string());
        Ok(())
    }
}
