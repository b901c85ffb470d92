// src/places/mod.rs
pub mod google;
pub mod lookup;

pub use google::GooglePlacesClient;
pub use lookup::{CachedPlaceLookup, LookupOutcome, PlaceLookup};

use anyhow::Result;

/// Live text search against a places provider. Returns the raw JSON body so
/// it can be cached verbatim.
#[allow(async_fn_in_trait)]
pub trait PlaceSearch {
    async fn search_text(&mut self, query: &str) -> Result<String>;
}
