// src/geocoding/mod.rs - Fill missing coordinates from address text
pub mod cache;
pub mod nominatim;

pub use cache::{CoordinateCache, Coordinates, MemoryGeocodeCache, SqliteGeocodeCache};
pub use nominatim::{Geocoder, NominatimClient};

use indicatif::ProgressBar;
use log::warn;
use serde::Serialize;

use crate::models::stats_models::GeocodeStats;
use crate::models::Facility;
use crate::utils::progress_bars::logging::{BatchJob, BatchLogger};
use crate::utils::progress_bars::progress_config::is_checkpoint;
use crate::utils::CancellationToken;

pub const DEFAULT_COUNTRY: &str = "US";
const GEOCODE_LOG_EVERY: usize = 50;

/// Candidate queries from most to least specific.
pub fn build_geocode_queries(facility: &Facility) -> Vec<String> {
    let text = |field: &str| {
        facility
            .location
            .as_ref()
            .and_then(|loc| loc.get_text(field))
            .unwrap_or("")
    };
    let street = text("street_address");
    let city = text("city");
    let state = text("state");
    let zip = text("zip_code");
    let country = match text("country") {
        "" => DEFAULT_COUNTRY,
        c => c,
    };

    let mut queries = Vec::new();
    if !street.is_empty() && !city.is_empty() && !state.is_empty() {
        queries.push(format!("{}, {}, {}, {}", street, city, state, country));
    }
    if !city.is_empty() && !state.is_empty() && !zip.is_empty() {
        queries.push(format!("{}, {} {}, {}", city, state, zip, country));
    }
    if !city.is_empty() && !state.is_empty() {
        queries.push(format!("{}, {}, {}", city, state, country));
    }
    if zip.chars().count() >= 5 {
        queries.push(format!("{}, {}", zip, country));
    }
    queries
}

pub fn needs_geocoding(facility: &Facility) -> bool {
    facility.latitude().is_none()
}

pub fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

/// What a dry run reports about the records missing coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeocodeBreakdown {
    pub total: usize,
    pub missing: usize,
    pub has_street: usize,
    pub has_city_state: usize,
    pub has_zip: usize,
    /// One live call per record at roughly one per second.
    pub estimated_seconds: usize,
}

pub fn geocode_breakdown(facilities: &[Facility]) -> GeocodeBreakdown {
    let mut breakdown = GeocodeBreakdown {
        total: facilities.len(),
        ..Default::default()
    };
    for facility in facilities.iter().filter(|f| needs_geocoding(f)) {
        breakdown.missing += 1;
        let Some(loc) = facility.location.as_ref() else {
            continue;
        };
        if loc.get_text("street_address").is_some() {
            breakdown.has_street += 1;
        }
        if loc.get_text("city").is_some() && loc.get_text("state").is_some() {
            breakdown.has_city_state += 1;
        }
        if loc.get_text("zip_code").is_some() {
            breakdown.has_zip += 1;
        }
    }
    breakdown.estimated_seconds = breakdown.missing;
    breakdown
}

/// Geocode every record without a latitude, in place. Any cached query wins
/// before the API is tried; API queries run in order until one resolves.
/// Cached results also count as geocoded.
pub async fn geocode_missing<C: CoordinateCache, G: Geocoder>(
    facilities: &mut [Facility],
    cache: &mut C,
    geocoder: &mut G,
    cancel: &CancellationToken,
    progress: Option<&ProgressBar>,
) -> GeocodeStats {
    let logger = BatchLogger::new(BatchJob::Geocode);
    let missing: Vec<usize> = facilities
        .iter()
        .enumerate()
        .filter(|(_, f)| needs_geocoding(f))
        .map(|(i, _)| i)
        .collect();
    let mut stats = GeocodeStats {
        total: facilities.len(),
        missing_coordinates: missing.len(),
        ..Default::default()
    };

    for (count, idx) in missing.iter().copied().enumerate() {
        if cancel.is_cancelled() {
            stats.interrupted = true;
            logger.log_interrupted(count, missing.len());
            break;
        }

        let facility = &mut facilities[idx];
        let queries = build_geocode_queries(facility);

        let mut result = first_cached(cache, &queries);
        if result.is_some() {
            stats.cached += 1;
        } else {
            for query in &queries {
                result = geocode_live(cache, geocoder, query).await;
                if result.is_some() {
                    break;
                }
            }
        }

        match result {
            Some((lat, lon)) => {
                let location = facility.location_mut();
                location.latitude = Some(round6(lat));
                location.longitude = Some(round6(lon));
                stats.geocoded += 1;
            }
            None => stats.failed += 1,
        }

        let position = count + 1;
        if let Some(pb) = progress {
            pb.inc(1);
        }
        if is_checkpoint(position, missing.len(), GEOCODE_LOG_EVERY) {
            logger.log_progress(
                position,
                missing.len(),
                &format!(
                    "{} geocoded, {} cached, {} failed",
                    stats.geocoded, stats.cached, stats.failed
                ),
            );
        }
    }

    if let Some(pb) = progress {
        pb.finish_with_message(format!("{} geocoded", stats.geocoded));
    }
    stats
}

fn first_cached<C: CoordinateCache>(cache: &mut C, queries: &[String]) -> Option<Coordinates> {
    queries.iter().find_map(|query| match cache.get(query) {
        Ok(hit) => hit,
        Err(e) => {
            warn!("Geocode cache read failed for '{}': {:#}", query, e);
            None
        }
    })
}

async fn geocode_live<C: CoordinateCache, G: Geocoder>(
    cache: &mut C,
    geocoder: &mut G,
    query: &str,
) -> Option<Coordinates> {
    let result = match geocoder.geocode(query).await {
        Ok(coords) => coords,
        Err(e) => {
            warn!("Geocode failed for '{}': {:#}", query, e);
            None
        }
    };
    if let Err(e) = cache.put(query, result) {
        warn!("Geocode cache write failed for '{}': {:#}", query, e);
    }
    result
}
