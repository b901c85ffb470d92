// src/places/google.rs - Places API (New) text search client
use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::places::PlaceSearch;
use crate::utils::throttle::Throttle;

pub const PLACES_SEARCH_URL: &str = "https://places.googleapis.com/v1/places:searchText";

pub const FIELD_MASK: [&str; 12] = [
    "places.id",
    "places.displayName",
    "places.formattedAddress",
    "places.addressComponents",
    "places.location",
    "places.nationalPhoneNumber",
    "places.internationalPhoneNumber",
    "places.websiteUri",
    "places.regularOpeningHours",
    "places.rating",
    "places.userRatingCount",
    "places.reviews",
];

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TextSearchRequest<'a> {
    text_query: &'a str,
}

pub struct GooglePlacesClient {
    http_client: Client,
    api_key: String,
    endpoint: String,
    throttle: Throttle,
}

impl GooglePlacesClient {
    pub fn new(api_key: String, rate_delay: Duration, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build places HTTP client")?;
        Ok(Self {
            http_client,
            api_key,
            endpoint: PLACES_SEARCH_URL.to_string(),
            throttle: Throttle::new(rate_delay),
        })
    }

    /// Point the client at a different endpoint (local stubs).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl PlaceSearch for GooglePlacesClient {
    async fn search_text(&mut self, query: &str) -> Result<String> {
        self.throttle.wait().await;

        let result = self
            .http_client
            .post(&self.endpoint)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK.join(","))
            .json(&TextSearchRequest { text_query: query })
            .send()
            .await;
        self.throttle.mark();

        let response = result
            .with_context(|| format!("Places request failed for '{}'", query))?
            .error_for_status()
            .with_context(|| format!("Places API returned an error for '{}'", query))?;
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read places response for '{}'", query))?;
        debug!("Places response for '{}': {} bytes", query, body.len());
        Ok(body)
    }
}
