// src/cache/mod.rs
pub mod memory;
pub mod sqlite;

use anyhow::Result;

pub use memory::MemoryResponseCache;
pub use sqlite::SqliteResponseCache;

pub const DEFAULT_CACHE_TTL_DAYS: i64 = 30;

/// Key/value store for raw lookup responses, keyed by query string.
/// Expired entries are reported as absent.
pub trait ResponseCache {
    fn get(&mut self, key: &str) -> Result<Option<String>>;
    fn put(&mut self, key: &str, value: &str) -> Result<()>;
}
