// src/cache/sqlite.rs
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::cache::ResponseCache;

/// File-backed response cache: `cache(query TEXT PRIMARY KEY, response TEXT, created_at TEXT)`.
pub struct SqliteResponseCache {
    conn: Connection,
    ttl: Duration,
}

impl SqliteResponseCache {
    pub fn open(path: &Path, ttl_days: i64) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create cache directory {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open response cache at {}", path.display()))?;
        let cache = Self::from_connection(conn, ttl_days)?;
        info!(
            "Opened response cache at {} (ttl {} days)",
            path.display(),
            ttl_days
        );
        Ok(cache)
    }

    pub fn in_memory(ttl_days: i64) -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory SQLite")?;
        Self::from_connection(conn, ttl_days)
    }

    fn from_connection(conn: Connection, ttl_days: i64) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS cache (query TEXT PRIMARY KEY, response TEXT, created_at TEXT)",
            [],
        )
        .context("Failed to create cache table")?;
        Ok(Self {
            conn,
            ttl: Duration::days(ttl_days),
        })
    }

    /// Insert with an explicit creation time.
    pub fn put_at(&mut self, key: &str, value: &str, created_at: DateTime<Utc>) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO cache (query, response, created_at) VALUES (?1, ?2, ?3)",
                params![
                    key,
                    value,
                    created_at.to_rfc3339_opts(SecondsFormat::Micros, false)
                ],
            )
            .with_context(|| format!("Failed to store cache entry for '{}'", key))?;
        Ok(())
    }

    pub fn len(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM cache", [], |row| row.get(0))
            .context("Failed to count cache entries")?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl ResponseCache for SqliteResponseCache {
    fn get(&mut self, key: &str) -> Result<Option<String>> {
        let row: Option<(Option<String>, Option<String>)> = self
            .conn
            .query_row(
                "SELECT response, created_at FROM cache WHERE query = ?1",
                params![key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .with_context(|| format!("Failed to read cache entry for '{}'", key))?;

        let Some((response, created_at)) = row else {
            return Ok(None);
        };

        let cutoff = Utc::now() - self.ttl;
        let fresh = created_at
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map_or(false, |ts| ts.with_timezone(&Utc) > cutoff);
        if !fresh {
            debug!("Cache entry for '{}' expired", key);
            return Ok(None);
        }
        Ok(response)
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.put_at(key, value, Utc::now())
    }
}
