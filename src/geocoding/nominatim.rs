// src/geocoding/nominatim.rs - OpenStreetMap Nominatim search client
use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::geocoding::cache::Coordinates;
use crate::utils::throttle::Throttle;

pub const NOMINATIM_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const USER_AGENT: &str = "railhub-v2-geocoder";
/// Nominatim usage policy allows one request per second.
pub const NOMINATIM_MIN_INTERVAL: Duration = Duration::from_millis(1050);
pub const NOMINATIM_TIMEOUT: Duration = Duration::from_secs(10);

/// Free-text geocoding. `Ok(None)` means the service answered with no match.
#[allow(async_fn_in_trait)]
pub trait Geocoder {
    async fn geocode(&mut self, query: &str) -> Result<Option<Coordinates>>;
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

pub struct NominatimClient {
    http_client: Client,
    endpoint: String,
    throttle: Throttle,
}

impl NominatimClient {
    pub fn new() -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(NOMINATIM_TIMEOUT)
            .build()
            .context("Failed to build geocoder HTTP client")?;
        Ok(Self {
            http_client,
            endpoint: NOMINATIM_SEARCH_URL.to_string(),
            throttle: Throttle::new(NOMINATIM_MIN_INTERVAL),
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn search_url(&self, query: &str) -> Result<Url> {
        Url::parse_with_params(
            &self.endpoint,
            &[("q", query), ("format", "json"), ("limit", "1")],
        )
        .with_context(|| format!("Invalid geocoder endpoint {}", self.endpoint))
    }
}

fn parse_hits(body: &str) -> Result<Option<Coordinates>> {
    let hits: Vec<SearchHit> =
        serde_json::from_str(body).context("Malformed Nominatim response")?;
    let Some(hit) = hits.first() else {
        return Ok(None);
    };
    let lat = hit.lat.parse::<f64>().context("Non-numeric latitude")?;
    let lon = hit.lon.parse::<f64>().context("Non-numeric longitude")?;
    Ok(Some((lat, lon)))
}

impl Geocoder for NominatimClient {
    async fn geocode(&mut self, query: &str) -> Result<Option<Coordinates>> {
        let url = self.search_url(query)?;
        self.throttle.wait().await;
        let result = self.http_client.get(url).send().await;
        self.throttle.mark();

        let body = result
            .with_context(|| format!("Geocode request failed for '{}'", query))?
            .error_for_status()
            .with_context(|| format!("Nominatim returned an error for '{}'", query))?
            .text()
            .await
            .with_context(|| format!("Failed to read geocode response for '{}'", query))?;
        debug!("Nominatim response for '{}': {} bytes", query, body.len());
        parse_hits(&body)
    }
}
