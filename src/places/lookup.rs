// src/places/lookup.rs - Cache-first place lookup
use anyhow::{Context, Result};
use log::{debug, warn};

use crate::cache::ResponseCache;
use crate::models::SearchResponse;
use crate::places::PlaceSearch;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupOutcome {
    pub response: SearchResponse,
    pub from_cache: bool,
}

/// What the orchestrator talks to. An `Err` is a failed live lookup; the
/// caller decides how to count it.
#[allow(async_fn_in_trait)]
pub trait PlaceLookup {
    async fn lookup(&mut self, query: &str) -> Result<LookupOutcome>;
}

pub struct CachedPlaceLookup<C, S> {
    cache: C,
    search: S,
}

impl<C: ResponseCache, S: PlaceSearch> CachedPlaceLookup<C, S> {
    pub fn new(cache: C, search: S) -> Self {
        Self { cache, search }
    }

    pub fn into_parts(self) -> (C, S) {
        (self.cache, self.search)
    }

    fn cached_response(&mut self, query: &str) -> Option<SearchResponse> {
        let raw = match self.cache.get(query) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Cache read failed for '{}': {:#}", query, e);
                return None;
            }
        };
        match serde_json::from_str::<SearchResponse>(&raw) {
            Ok(response) => Some(response),
            Err(e) => {
                warn!("Corrupt cache entry for '{}', will re-fetch ({})", query, e);
                None
            }
        }
    }
}

impl<C: ResponseCache, S: PlaceSearch> PlaceLookup for CachedPlaceLookup<C, S> {
    async fn lookup(&mut self, query: &str) -> Result<LookupOutcome> {
        if let Some(response) = self.cached_response(query) {
            debug!("Cache hit for '{}'", query);
            return Ok(LookupOutcome {
                response,
                from_cache: true,
            });
        }

        let raw = self.search.search_text(query).await?;
        let response: SearchResponse = serde_json::from_str(&raw)
            .with_context(|| format!("Malformed places response for '{}'", query))?;

        if let Err(e) = self.cache.put(query, &raw) {
            warn!("Cache write failed for '{}': {:#}", query, e);
        }
        Ok(LookupOutcome {
            response,
            from_cache: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryResponseCache;
    use anyhow::anyhow;

    struct ScriptedSearch {
        body: Option<String>,
        calls: usize,
    }

    impl PlaceSearch for ScriptedSearch {
        async fn search_text(&mut self, _query: &str) -> Result<String> {
            self.calls += 1;
            self.body.clone().ok_or_else(|| anyhow!("connection reset"))
        }
    }

    const BODY: &str = r#"{"places":[{"displayName":{"text":"Acme"}}]}"#;

    #[tokio::test]
    async fn test_second_lookup_is_served_from_cache() {
        let search = ScriptedSearch { body: Some(BODY.to_string()), calls: 0 };
        let mut lookup = CachedPlaceLookup::new(MemoryResponseCache::default(), search);

        let first = lookup.lookup("acme").await.unwrap();
        assert!(!first.from_cache);
        let second = lookup.lookup("acme").await.unwrap();
        assert!(second.from_cache);
        assert_eq!(first.response, second.response);

        let (_, search) = lookup.into_parts();
        assert_eq!(search.calls, 1);
    }

    #[tokio::test]
    async fn test_corrupt_cache_entry_triggers_refetch() {
        let mut cache = MemoryResponseCache::default();
        cache.put("acme", "{not json").unwrap();
        let search = ScriptedSearch { body: Some(BODY.to_string()), calls: 0 };
        let mut lookup = CachedPlaceLookup::new(cache, search);

        let outcome = lookup.lookup("acme").await.unwrap();
        assert!(!outcome.from_cache);
        assert_eq!(outcome.response.places.len(), 1);

        let (mut cache, search) = lookup.into_parts();
        assert_eq!(search.calls, 1);
        assert_eq!(cache.get("acme").unwrap().as_deref(), Some(BODY));
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_cached() {
        let search = ScriptedSearch { body: None, calls: 0 };
        let mut lookup = CachedPlaceLookup::new(MemoryResponseCache::default(), search);
        assert!(lookup.lookup("acme").await.is_err());
        let (cache, _) = lookup.into_parts();
        assert!(cache.is_empty());
    }
}
