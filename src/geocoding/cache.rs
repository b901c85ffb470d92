// src/geocoding/cache.rs - Coordinate cache keyed by geocoding query
use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use log::info;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;

pub type Coordinates = (f64, f64);

/// Stores both hits and negative results. A negative entry reads back as a
/// miss so the query is retried on a later run.
pub trait CoordinateCache {
    fn get(&mut self, query: &str) -> Result<Option<Coordinates>>;
    fn put(&mut self, query: &str, coords: Option<Coordinates>) -> Result<()>;
}

/// `geocode_cache(query TEXT PRIMARY KEY, lat REAL, lon REAL, created_at TEXT)`
pub struct SqliteGeocodeCache {
    conn: Connection,
}

impl SqliteGeocodeCache {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create cache directory {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open geocode cache at {}", path.display()))?;
        info!("Opened geocode cache at {}", path.display());
        Self::from_connection(conn)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory SQLite")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS geocode_cache (query TEXT PRIMARY KEY, lat REAL, lon REAL, created_at TEXT)",
            [],
        )
        .context("Failed to create geocode_cache table")?;
        Ok(Self { conn })
    }

    /// Rows including negative entries.
    pub fn len(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM geocode_cache", [], |row| row.get(0))
            .context("Failed to count geocode cache rows")?;
        Ok(count as usize)
    }
}

impl CoordinateCache for SqliteGeocodeCache {
    fn get(&mut self, query: &str) -> Result<Option<Coordinates>> {
        let row: Option<(Option<f64>, Option<f64>)> = self
            .conn
            .query_row(
                "SELECT lat, lon FROM geocode_cache WHERE query = ?1",
                params![query],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .with_context(|| format!("Failed to read geocode cache for '{}'", query))?;
        Ok(match row {
            Some((Some(lat), Some(lon))) => Some((lat, lon)),
            _ => None,
        })
    }

    fn put(&mut self, query: &str, coords: Option<Coordinates>) -> Result<()> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false);
        self.conn
            .execute(
                "INSERT OR REPLACE INTO geocode_cache (query, lat, lon, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![query, coords.map(|c| c.0), coords.map(|c| c.1), now],
            )
            .with_context(|| format!("Failed to write geocode cache for '{}'", query))?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryGeocodeCache {
    entries: HashMap<String, Option<Coordinates>>,
}

impl MemoryGeocodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, query: &str) -> bool {
        self.entries.contains_key(query)
    }
}

impl CoordinateCache for MemoryGeocodeCache {
    fn get(&mut self, query: &str) -> Result<Option<Coordinates>> {
        Ok(self.entries.get(query).copied().flatten())
    }

    fn put(&mut self, query: &str, coords: Option<Coordinates>) -> Result<()> {
        self.entries.insert(query.to_string(), coords);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_hit_and_negative_entry() {
        let mut cache = SqliteGeocodeCache::in_memory().unwrap();
        cache.put("Dallas, TX, US", Some((32.7767, -96.797))).unwrap();
        cache.put("Nowhere, ZZ, US", None).unwrap();

        assert_eq!(cache.get("Dallas, TX, US").unwrap(), Some((32.7767, -96.797)));
        assert_eq!(cache.get("Nowhere, ZZ, US").unwrap(), None);
        assert_eq!(cache.get("unknown").unwrap(), None);
        assert_eq!(cache.len().unwrap(), 2);
    }

    #[test]
    fn test_negative_entry_is_replaced_by_hit() {
        let mut cache = SqliteGeocodeCache::in_memory().unwrap();
        cache.put("q", None).unwrap();
        cache.put("q", Some((1.0, 2.0))).unwrap();
        assert_eq!(cache.get("q").unwrap(), Some((1.0, 2.0)));
        assert_eq!(cache.len().unwrap(), 1);
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scripts/.geocode_cache.db");
        {
            let mut cache = SqliteGeocodeCache::open(&path).unwrap();
            cache.put("Reno, NV, US", Some((39.5, -119.8))).unwrap();
        }
        let mut cache = SqliteGeocodeCache::open(&path).unwrap();
        assert_eq!(cache.get("Reno, NV, US").unwrap(), Some((39.5, -119.8)));
    }

    #[test]
    fn test_memory_cache_negative_is_miss() {
        let mut cache = MemoryGeocodeCache::new();
        cache.put("q", None).unwrap();
        assert!(cache.contains("q"));
        assert_eq!(cache.get("q").unwrap(), None);
    }
}
