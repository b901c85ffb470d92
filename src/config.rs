// src/config.rs - Runtime settings for the enrichment job
use anyhow::{bail, Result};
use std::env;
use std::time::Duration;

use crate::cache::DEFAULT_CACHE_TTL_DAYS;

pub const API_KEY_VAR: &str = "GOOGLE_PLACES_API_KEY";

#[derive(Debug, Clone)]
pub struct EnrichConfig {
    pub api_key: String,
    /// Minimum gap between live Places calls
    pub rate_delay: Duration,
    pub cache_ttl_days: i64,
    pub http_timeout: Duration,
}

impl EnrichConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// A missing or blank API key is an error; everything else has a default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|k| k.trim().to_string())
            .unwrap_or_default();
        if api_key.is_empty() {
            bail!("{} is not set", API_KEY_VAR);
        }

        Ok(Self {
            api_key,
            rate_delay: Duration::from_millis(
                lookup("ENRICH_RATE_DELAY_MS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(100),
            ),
            cache_ttl_days: lookup("ENRICH_CACHE_TTL_DAYS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CACHE_TTL_DAYS),
            http_timeout: Duration::from_secs(
                lookup("ENRICH_HTTP_TIMEOUT_SECS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
            ),
        })
    }
}
